//! Persisted server model.
//!
//! These are the current-state types that the reconciler mutates and the
//! [`ServerStore`](crate::store::ServerStore) persists.

mod types;

pub use types::*;
