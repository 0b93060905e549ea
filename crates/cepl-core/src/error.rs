//! Error types surfaced by the context.

use thiserror::Error;

use crate::target::BindTarget;

/// Failures of cache, registry, and resource operations.
///
/// All errors are raised before any cache or registry mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CeplError {
    /// The driver reports an id bound to `target` that the registry never saw.
    ///
    /// Something bound the target without going through the cache, or the
    /// registry is stale. Cache state can no longer be trusted.
    #[error("{target} is bound to id {id}, which was never registered")]
    InvariantViolation { target: BindTarget, id: u32 },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A resource was required at `id` but nothing was ever registered there.
    #[error("id {id} is outside the registered range (len {len})")]
    IndexOutOfRange { id: u32, len: usize },

    #[error("no native context is attached")]
    NoContext,

    #[error("{kind} has no native object yet")]
    Uninitialized { kind: &'static str },
}

pub type Result<T> = std::result::Result<T, CeplError>;
