#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid temperature unit {token:?}: the value for 'unit' must be one of: {expected}")]
    InvalidUnit { token: String, expected: &'static str },

    #[error("core index {index} is out of range: must be between 1 and {max}")]
    OutOfRange { index: usize, max: usize },

    #[error("sensor group {0:?} is unavailable on this host")]
    SensorUnavailable(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn sensor_unavailable<S: Into<String>>(group: S) -> Self {
        Error::SensorUnavailable(group.into())
    }
}

/// Result type for coretemp-metrics operations
pub type Result<T> = std::result::Result<T, Error>;
