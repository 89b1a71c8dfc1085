//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```ignore
//! use sendboard::prelude::*;
//!
//! let store = SendStore::open(Path::new(".sendboard"))?;
//! let board = rank(&store.in_scope(&Scope::World)?);
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Core types and operations
pub use crate::leaderboard::{LeaderboardEntry, rank, rank_with_names};
pub use crate::record::{
    RawRecord, SendRecord, Status, normalize, normalize_all, normalize_at, raw_batch_from_json,
    raw_from_json,
};
pub use crate::profile::{UserProfile, display_names};
pub use crate::scope::{Scope, ScopeKind};
pub use crate::scoring::{score, score_parts};
pub use crate::session::last_session;
pub use crate::trend::{TREND_WEEKS, TrendPoint, weekly_trend};

// Send store types (requires "store" feature)
#[cfg(feature = "store")]
pub use crate::store::{FollowEdge, SendStore, StoreError};
