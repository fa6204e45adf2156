use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `AspicsError` and maps other errors to
/// convert to an `AspicsError`
#[derive(Debug)]
pub enum AspicsError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    EncodeError(bincode::error::EncodeError),
    DecodeError(bincode::error::DecodeError),
    /// A bad parameters file, an invalid flag combination, a missing data
    /// folder, an unpopulated initialisation cache, or an out-of-range
    /// start date. Always fatal; the operator has to fix the setup.
    Config(String),
    /// A failure inside an external collaborator (snapshot conversion or
    /// the execution engine), propagated unchanged.
    Upstream(String),
}

impl From<io::Error> for AspicsError {
    fn from(error: io::Error) -> Self {
        AspicsError::IoError(error)
    }
}

impl From<serde_json::Error> for AspicsError {
    fn from(error: serde_json::Error) -> Self {
        AspicsError::JsonError(error)
    }
}

impl From<csv::Error> for AspicsError {
    fn from(error: csv::Error) -> Self {
        AspicsError::CSVError(error)
    }
}

impl From<bincode::error::EncodeError> for AspicsError {
    fn from(error: bincode::error::EncodeError) -> Self {
        AspicsError::EncodeError(error)
    }
}

impl From<bincode::error::DecodeError> for AspicsError {
    fn from(error: bincode::error::DecodeError) -> Self {
        AspicsError::DecodeError(error)
    }
}

impl From<String> for AspicsError {
    fn from(error: String) -> Self {
        AspicsError::Config(error)
    }
}

impl From<&str> for AspicsError {
    fn from(error: &str) -> Self {
        AspicsError::Config(error.to_string())
    }
}

impl std::error::Error for AspicsError {}

impl Display for AspicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {self:?}")?;
        Ok(())
    }
}
