//! Library-level logging that costs nothing unless asked for.
//!
//! With the `logging` feature these are `tracing`'s own macros, so events
//! reach whatever subscriber the embedding application installed. Without
//! it every macro expands to nothing and its arguments are never evaluated.
//!
//! ```rust,ignore
//! use crate::logging::{debug, info};
//!
//! info!(path = %path.display(), "opening store");
//! debug!(id = id, "loading send");
//! ```

#[cfg(feature = "logging")]
mod imp {
    pub(crate) use tracing::{debug, error, info, trace};
}

#[cfg(not(feature = "logging"))]
mod imp {
    macro_rules! disabled {
        ($($arg:tt)*) => {};
    }

    pub(crate) use disabled as debug;
    pub(crate) use disabled as error;
    pub(crate) use disabled as info;
    pub(crate) use disabled as trace;
}

pub(crate) use imp::{debug, error, info, trace};
