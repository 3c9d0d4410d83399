use std::fmt;

#[derive(Debug)]
pub enum BandPressError {
    /// Capture source missing, zero-sized, or an image failed to decode
    /// before capture. Always raised before any output page exists.
    Capture(String),
    /// Header and footer bands consume the whole page; no body area remains.
    LayoutOverflow {
        header_pt: f32,
        footer_pt: f32,
        page_height_pt: f32,
    },
    Font(String),
    Asset(String),
    InvalidData(String),
    Pdf(String),
    Io(std::io::Error),
}

impl fmt::Display for BandPressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandPressError::Capture(message) => write!(f, "capture failed: {}", message),
            BandPressError::LayoutOverflow {
                header_pt,
                footer_pt,
                page_height_pt,
            } => write!(
                f,
                "header ({}pt) and footer ({}pt) bands leave no usable body area on a {}pt page",
                header_pt, footer_pt, page_height_pt
            ),
            BandPressError::Font(message) => write!(f, "font error: {}", message),
            BandPressError::Asset(message) => write!(f, "asset error: {}", message),
            BandPressError::InvalidData(message) => write!(f, "invalid data: {}", message),
            BandPressError::Pdf(message) => write!(f, "pdf error: {}", message),
            BandPressError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for BandPressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BandPressError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BandPressError {
    fn from(value: std::io::Error) -> Self {
        BandPressError::Io(value)
    }
}
