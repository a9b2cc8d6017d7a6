pub mod system;
pub mod url;

// Re-export common utilities
pub use system::get_env;
pub use url::{url_decode, url_encode};
