use crate::image::BatchSize;

/// An error type for the image and filtering modules.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the host tensor is not 4-dimensional.
    #[error("expected a 4-dimensional tensor, got {0} dimensions")]
    InvalidRank(usize),

    /// Error when neither tensor layout exposes three color channels.
    #[error("expected 3 color channels, got {0}")]
    InvalidChannelCount(usize),

    /// Error when the data length does not match the batch shape.
    #[error("data length ({0}) does not match the batch shape ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the source and destination sizes do not match.
    #[error("source size {0} does not match destination size {1}")]
    InvalidBatchSize(BatchSize, BatchSize),

    /// Error when a channel index is out of bounds.
    #[error("channel index {0} out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a convolution kernel is empty.
    #[error("invalid kernel length ({0}, {1})")]
    InvalidKernelLength(usize, usize),
}
