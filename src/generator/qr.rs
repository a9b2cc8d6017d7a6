//! QR-code rendering for share links.
//!
//! Uses the `qrcode` crate for the matrix at error-correction level M
//! (~15% damage tolerance) and lets it pick the smallest version that fits
//! the payload. The `image` crate turns the matrix into a PNG.

use std::path::Path;

use image::{GrayImage, ImageEncoder, Luma};
use log::info;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};
use thiserror::Error;

use crate::utils::system::stdout_supports_color;

pub const EC_LEVEL: EcLevel = EcLevel::M;
/// Pixels per module in the PNG output
const MODULE_PX: u32 = 10;
/// Quiet-zone border of the PNG, in modules
const PNG_QUIET_ZONE: u32 = 2;
/// Border of the terminal rendering, in modules
const TERMINAL_BORDER: usize = 1;

const ANSI_DARK: &str = "\x1b[40m  \x1b[0m";
const ANSI_LIGHT: &str = "\x1b[47m  \x1b[0m";
const ASCII_DARK: &str = "##";
const ASCII_LIGHT: &str = "  ";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("QR encode error: {0}")]
    Encode(#[from] QrError),

    #[error("PNG encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to write QR image {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// How dark/light modules are drawn in a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStyle {
    /// Black/white background colour blocks
    Ansi,
    /// `##` for dark modules, spaces for light ones
    Ascii,
}

impl TerminalStyle {
    pub fn detect() -> Self {
        if stdout_supports_color() {
            TerminalStyle::Ansi
        } else {
            TerminalStyle::Ascii
        }
    }

    fn cells(self) -> (&'static str, &'static str) {
        match self {
            TerminalStyle::Ansi => (ANSI_DARK, ANSI_LIGHT),
            TerminalStyle::Ascii => (ASCII_DARK, ASCII_LIGHT),
        }
    }
}

/// Square grid of QR modules, `true` meaning dark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    version: i16,
    modules: Vec<bool>,
}

impl QrMatrix {
    pub fn encode(payload: &str) -> Result<Self, RenderError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EC_LEVEL)?;
        let version = match code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        };
        Ok(QrMatrix {
            width: code.width(),
            version,
            modules: code
                .to_colors()
                .into_iter()
                .map(|c| c == Color::Dark)
                .collect(),
        })
    }

    /// Modules per side, without any quiet zone
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn version(&self) -> i16 {
        self.version
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }

    /// Lookup that treats everything outside the matrix as light
    fn is_dark_padded(&self, x: isize, y: isize) -> bool {
        let w = self.width as isize;
        if x < 0 || y < 0 || x >= w || y >= w {
            return false;
        }
        self.is_dark(x as usize, y as usize)
    }

    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let width = self.width as u32;
        let img_size = (width + PNG_QUIET_ZONE * 2) * MODULE_PX;
        let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

        for y in 0..width {
            for x in 0..width {
                if !self.is_dark(x as usize, y as usize) {
                    continue;
                }
                let px_x = (x + PNG_QUIET_ZONE) * MODULE_PX;
                let px_y = (y + PNG_QUIET_ZONE) * MODULE_PX;
                for dy in 0..MODULE_PX {
                    for dx in 0..MODULE_PX {
                        img.put_pixel(px_x + dx, px_y + dy, Luma([0u8]));
                    }
                }
            }
        }

        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf).write_image(
            img.as_raw(),
            img_size,
            img_size,
            image::ExtendedColorType::L8,
        )?;
        Ok(buf)
    }

    /// One string per row, two characters per module, with a one-module
    /// light border.
    pub fn to_terminal(&self, style: TerminalStyle) -> Vec<String> {
        let (dark, light) = style.cells();
        let border = TERMINAL_BORDER as isize;
        let end = self.width as isize + border;
        (-border..end)
            .map(|y| {
                (-border..end)
                    .map(|x| if self.is_dark_padded(x, y) { dark } else { light })
                    .collect::<String>()
            })
            .collect()
    }
}

/// Encode `payload` and return PNG bytes
pub fn to_png(payload: &str) -> Result<Vec<u8>, RenderError> {
    QrMatrix::encode(payload)?.to_png()
}

/// Encode `payload` and write it as a PNG file
pub fn write_png(payload: &str, path: &Path) -> Result<(), RenderError> {
    let png = to_png(payload)?;
    std::fs::write(path, &png).map_err(|source| RenderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("Wrote QR code to {}", path.display());
    Ok(())
}

/// Encode `payload` and render it as printable lines
pub fn to_terminal(payload: &str, style: TerminalStyle) -> Result<Vec<String>, RenderError> {
    Ok(QrMatrix::encode(payload)?.to_terminal(style))
}
