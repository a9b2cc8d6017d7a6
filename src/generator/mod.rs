pub mod qr;
pub mod vless;

// Re-export generators
pub use qr::{QrMatrix, RenderError, TerminalStyle};
pub use vless::build_vless_link;
