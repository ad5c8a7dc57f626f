use alloc::{boxed::Box, string::String};

use crate::Handle;

/// Errors reported by a [`crate::Pool`].
///
/// Neither variant leaves the pool in an inconsistent state: the operation
/// that returned the error made no change to the pool.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// A handle was released that is not currently in use in this pool. It
    /// was either minted by another pool or has already been released.
    #[error("pool '{pool_id}' does not own {handle:?}")]
    NotOwned {
        /// Label of the pool the release was attempted on.
        pool_id: String,
        /// The rejected handle.
        handle: Handle,
    },

    /// The factory failed while the pool was growing.
    #[error("factory for pool '{pool_id}' failed")]
    Factory {
        /// Label of the pool that was growing.
        pool_id: String,
        /// The error returned by the factory.
        #[source]
        source: Box<dyn core::error::Error + Send + Sync>,
    },
}
