//=========================================================================
// Pool Errors
//=========================================================================
//
// Failure modes of the pool registry.
//
// UnknownKey and StaleHandle are caller protocol violations.
// StealInvariant is an internal bookkeeping failure and is never retried.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== PoolError ===========================================================

/// Errors raised by [`PoolRegistry`](super::PoolRegistry) and
/// [`PoolEntry`](super::PoolEntry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Release was requested for a key that has no registered entry.
    ///
    /// The handle was not produced by this registry, or the entry was
    /// dropped in a way the handle could not detect.
    #[error("no pool registered for key {key}")]
    UnknownKey {
        /// Debug rendering of the offending key.
        key: String,
    },

    /// The handle was issued before the last registry reset.
    #[error("stale handle for key {key}: issued in epoch {epoch}, registry is at epoch {current}")]
    StaleHandle {
        /// Debug rendering of the handle's key.
        key: String,
        /// Epoch stamped on the handle.
        epoch: u64,
        /// Current registry epoch.
        current: u64,
    },

    /// The steal branch of checkout found no in-use instance to reclaim.
    #[error("steal requested for key {key} but its in-use list is empty")]
    StealInvariant {
        /// Debug rendering of the key.
        key: String,
    },

    /// The resource factory could not produce an instance.
    #[error("factory failed to create resource for key {key}: {reason}")]
    Factory {
        /// Debug rendering of the key.
        key: String,
        /// Factory-provided reason.
        reason: String,
    },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
