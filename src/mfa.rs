//! MFA enrollment codes
//!
//! Registration returns a provisioning value (an `otpauth://` URI) that the
//! user scans with an authenticator app. This renders it as a QR code for
//! the browser (SVG) and for terminals (Unicode half blocks).

use qrcode::render::{svg, unicode};
use qrcode::QrCode;
use thiserror::Error;

/// Rendered size of the SVG code in pixels
pub const QR_SIZE: u32 = 200;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MfaError {
    #[error("Empty provisioning value")]
    Empty,

    #[error("Provisioning value cannot be encoded as a QR code: {0}")]
    Encode(String),
}

/// A provisioning value ready to display
pub struct EnrollmentCode {
    value: String,
    code: QrCode,
}

impl EnrollmentCode {
    pub fn new(value: &str) -> Result<Self, MfaError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(MfaError::Empty);
        }
        let code = QrCode::new(value.as_bytes()).map_err(|e| MfaError::Encode(e.to_string()))?;
        Ok(Self {
            value: value.to_string(),
            code,
        })
    }

    /// Raw text form, shown under the code
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Modules per side
    pub fn width(&self) -> usize {
        self.code.width()
    }

    /// Standalone SVG document, at least [`QR_SIZE`] pixels wide
    pub fn to_svg(&self) -> String {
        self.code
            .render::<svg::Color>()
            .min_dimensions(QR_SIZE, QR_SIZE)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build()
    }

    /// Two rows of modules per text line, for terminal output
    pub fn to_terminal(&self) -> String {
        self.code
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .build()
    }
}
