//! Persistent send store.
//!
//! Sends and follow edges live in a fjall database. Each value is wrapped
//! in a small versioned, checksummed envelope around its JSON encoding.

mod db;
mod error;
mod format;

pub use db::{FollowEdge, SendStore};
pub use error::StoreError;
pub use format::{ENVELOPE_VERSION, decode_value, encode_value};
