//! Send records and their ingestion from untyped maps.
//!
//! A send is one logged attempt at a boulder problem. Records arrive from
//! the outside world as loosely typed key/value maps; [`normalize`] turns
//! them into a [`SendRecord`] with every missing field defaulted, and never
//! fails.

mod normalize;
mod types;

pub use normalize::{
    RawRecord, normalize, normalize_all, normalize_at, raw_batch_from_json, raw_from_json,
};
pub use types::{SendRecord, Status, defaults};
