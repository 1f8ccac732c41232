use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrandwatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A record is missing a key the caller is required to supply.
    #[error("Contract violation: {0}")]
    Contract(String),
}

pub type Result<T> = std::result::Result<T, BrandwatchError>;
