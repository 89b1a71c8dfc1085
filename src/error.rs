//! Unified error type for the sendboard library.
//!
//! The scoring core itself never fails; errors come from the layers around
//! it (persistence, scope parsing, configuration).

use thiserror::Error;

use crate::scope::ParseScopeError;
#[cfg(feature = "store")]
use crate::store::StoreError;

/// Unified error type for all sendboard operations.
///
/// # Example
///
/// ```ignore
/// use sendboard::{Result, SendStore};
///
/// fn share(id: &str) -> Result<()> {
///     let store = SendStore::open(Path::new(".sendboard"))?;
///     store.set_shared(id, true)?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error from send store operations.
    #[cfg(feature = "store")]
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unrecognized visibility scope.
    #[error(transparent)]
    Scope(#[from] ParseScopeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raw record input was not a JSON object.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid-record error from a string message.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Returns `true` if this is a send store error.
    #[cfg(feature = "store")]
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
