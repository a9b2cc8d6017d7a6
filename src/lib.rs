pub mod crypto;
pub mod error;
pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod relay;
pub mod settings;
pub mod utils;

// Re-export the main pipeline types for easier access
pub use error::{Error, Result};
pub use interfaces::{generate_share, ShareArtifacts, ShareRequest};
pub use models::RealityInbound;
pub use settings::Settings;
