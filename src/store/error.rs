//! Error types for the send store.

use thiserror::Error;

/// Errors that can occur during send store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Send not found: {0}")]
    SendNotFound(String),

    #[error("User '{0}' cannot follow themselves")]
    SelfFollow(String),

    #[error("User '{user}' already follows '{target}'")]
    AlreadyFollowing { user: String, target: String },

    #[error("User '{user}' does not follow '{target}'")]
    NotFollowing { user: String, target: String },

    #[error("User id '{0}' contains a reserved character")]
    InvalidUserId(String),

    #[error("No user registered with email '{0}'")]
    EmailNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Store not initialized at {0}")]
    NotInitialized(String),
}
