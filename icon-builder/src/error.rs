use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconBuildError {
    #[error("an I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode the source image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("the variant dimensions are invalid: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("an error occurred while encoding the PNG: {0}")]
    PngEncoding(#[from] png::EncodingError),

    #[error("the container holds {0} entries, but at most 65535 are allowed")]
    TooManyEntries(usize),

    #[error("the payload of {0} bytes does not fit into a container entry")]
    PayloadTooLarge(usize),

    #[error("the container is truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("the container header is invalid: {0}")]
    InvalidHeader(&'static str),
}
