//! Remote collaborators: fetching the server config and delivering the
//! generated link and QR image.

pub mod scp;
pub mod telegram;

use std::path::Path;

use log::info;
use thiserror::Error;

pub use scp::ScpFetcher;
pub use telegram::TelegramNotifier;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid endpoint: {0}")]
    Endpoint(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram {method} failed: HTTP {status}")]
    Status { method: &'static str, status: u16 },

    #[error("Command failed: {command}\n{output}")]
    Transfer { command: String, output: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Retrieves the raw server config from a remote host
pub trait ConfigFetcher {
    /// Download the config from `host` into `dest` and return its bytes.
    fn fetch(&self, host: &str, dest: &Path) -> Result<Vec<u8>, RelayError>;
}

/// Delivers text and photos to a chat
pub trait Notifier {
    fn send_message(&self, text: &str) -> Result<(), RelayError>;
    fn send_photo(&self, photo: &Path, caption: &str) -> Result<(), RelayError>;
}

/// Send the share link followed by its QR image
pub fn relay_artifacts<N: Notifier + ?Sized>(
    notifier: &N,
    link: &str,
    qr_path: &Path,
) -> Result<(), RelayError> {
    notifier.send_message(&format!("VLESS Reality link:\n{}", link))?;
    notifier.send_photo(qr_path, "VLESS Reality QR")?;
    info!("Delivered link and QR code");
    Ok(())
}
