use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockDropError {
    #[error("The storage backend is not available")]
    StorageUnavailable,
    #[error("The storage backend rejected the operation: {0}")]
    Storage(String),
    #[error("The save record could not be parsed")]
    MalformedRecord(#[from] serde_json::Error),
    #[error("The save record holds an invalid level: {0}")]
    InvalidLevel(u32),
    #[error("Invalid game options: {0}")]
    InvalidOptions(&'static str),
}

pub type Result<T> = std::result::Result<T, BlockDropError>;
