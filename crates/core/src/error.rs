/// Errors raised by the surgery store and its validation.
///
/// [`SurgeryError::Validation`] and [`SurgeryError::NotFound`] are caller mistakes; every other
/// variant means the store could not do its job.
#[derive(Debug, thiserror::Error)]
pub enum SurgeryError {
    #[error("surgery validation failed: {0}")]
    Validation(String),
    #[error("surgery not found: {0}")]
    NotFound(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to create surgery directory: {0}")]
    SurgeryDirCreation(std::io::Error),
    #[error("failed to write surgery file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read surgery file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize surgery: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize surgery: {0}")]
    Deserialization(serde_json::Error),
    #[error("store write lock poisoned")]
    LockPoisoned,
}

pub type SurgeryResult<T> = std::result::Result<T, SurgeryError>;
