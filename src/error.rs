use thiserror::Error;

use crate::crypto::DerivationError;
use crate::generator::RenderError;
use crate::parser::ExtractError;
use crate::relay::RelayError;
use crate::settings::SettingsError;

/// Any failure that ends a run
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

pub type Result<T> = std::result::Result<T, Error>;
