use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelSimError {
    #[error("Signal and noisy signal must have the same size ({original} vs {noisy})")]
    LengthMismatch { original: usize, noisy: usize },

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Mean power is undefined for an empty signal")]
    EmptySignal,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ChannelSimError>;
