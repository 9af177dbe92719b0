use thiserror::Error;

// Render errors
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("empty content")]
    EmptyContent,

    #[error("QR encoding failed: {0}")]
    Matrix(#[from] qrcode::types::QrError),

    #[error("invalid color literal {0:?}")]
    InvalidColor(String),

    /// The attached logo bytes could not be decoded as an image. Kept
    /// separate from other failures so callers can prompt for a new file.
    #[error("logo image could not be decoded: {0}")]
    LogoDecode(image::ImageError),

    #[error("PNG serialization failed: {0}")]
    PngEncode(image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;

// Tracking errors
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TrackError {
    /// Unknown identifier. Malformed tokens map here as well so the error
    /// message never leaks whether the input failed format validation or
    /// simply matched no record.
    #[error("QR code not found")]
    NotFound,

    #[error("no destination available for this QR code")]
    NoDestination,

    #[error("malformed URL: {0}")]
    MalformedUrl(#[from] url::ParseError),

    #[error("URL cannot carry path segments")]
    InvalidBase,

    #[error("tracking URL has no identifier segment")]
    MissingIdentifier,
}

pub type TrackResult<T> = Result<T, TrackError>;
