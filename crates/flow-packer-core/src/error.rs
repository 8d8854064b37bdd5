use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "image")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid spacing: horizontal={horizontal}, vertical={vertical} (must be finite and >= 0)")]
    InvalidSpacing { horizontal: f64, vertical: f64 },
    #[error("Invalid max width: {0} (must be finite and >= 0)")]
    InvalidMaxWidth(f64),
    #[error("Invalid item #{index}: {reason}")]
    InvalidItem { index: usize, reason: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
