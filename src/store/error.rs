use thiserror::Error;

/// Failures of the underlying table. A missing record is not an error; store
/// operations return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional create found the key already occupied.
    #[error("record already exists at {pk} / {sk}")]
    AlreadyExists { pk: String, sk: String },

    #[error("table unavailable: {0}")]
    Unavailable(String),

    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Malformed(e.to_string())
    }
}
