pub mod share;

pub use share::{generate_share, ShareArtifacts, ShareRequest};
