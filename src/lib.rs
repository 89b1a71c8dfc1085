//! Scoring, leaderboards and progress trends for a bouldering send tracker.
//!
//! The core is a handful of pure functions over [`SendRecord`]s:
//! normalize untyped input, score a send, rank users, and bucket a
//! climber's grades into a weekly trend. Persistence, the HTTP API and the
//! CLI are layered on top behind feature flags.
//!
//! # Quick Start
//!
//! ```ignore
//! use sendboard::prelude::*;
//!
//! let records = normalize_all(raw_pairs.iter().map(|(id, raw)| (id.as_str(), raw)), now);
//! let board = rank(Scope::World.filter(&records));
//! let chart = weekly_trend(records.iter().filter(|r| r.user_id == "alice"), now);
//! ```
//!
//! # Modules
//!
//! - [`record`] - Send records and total normalization from JSON maps
//! - [`scoring`] - Grade/status/attempts scoring formula
//! - [`leaderboard`] - Per-user aggregation and ranking
//! - [`trend`] - 24-week average-grade series
//! - [`profile`] - Climber profiles, display names and email lookup
//! - [`scope`] - World / friends / mine visibility filters
//! - [`session`] - Last-session extraction
//! - [`store`] - Persistent send store backed by fjall (requires `store` feature)
//! - [`server`] - HTTP API (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `store` - Enable the send store (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line interface binary
//! - `server` - Enable the HTTP API server
//! - `full` - Enable all features

mod logging;

pub mod leaderboard;
pub mod prelude;
pub mod profile;
pub mod record;
pub mod scope;
pub mod scoring;
#[cfg(feature = "server")]
pub mod server;
pub mod session;
#[cfg(feature = "store")]
pub mod store;
pub mod trend;

mod error;

pub use error::{Error, Result};

pub use leaderboard::{LeaderboardEntry, rank, rank_with_names};
pub use profile::UserProfile;
pub use record::{RawRecord, SendRecord, Status, normalize, normalize_all, normalize_at};
pub use scope::{ParseScopeError, Scope, ScopeKind};
pub use scoring::score;
pub use session::last_session;
pub use trend::{TREND_WEEKS, TrendPoint, weekly_trend};

#[cfg(feature = "store")]
pub use store::{SendStore, StoreError};
