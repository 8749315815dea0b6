//! Interface of the lock manager collaborator.
//!
//! Lock internals are not modelled here. A lock system hands out opaque
//! tokens; the patch handler only ever creates a temporary exclusive
//! zero-depth lock per request and releases it again.

use std::time::{Duration, SystemTime};

pub mod memls;

/// Details for creating a lock.
#[derive(Debug, Clone)]
pub struct LockDetails {
    /// Path of the resource the lock applies to.
    pub root: String,
    /// `None` means the lock never expires.
    pub duration: Option<Duration>,
    /// A zero-depth lock covers just the resource, not its descendants.
    pub zero_depth: bool,
}

/// Errors from lock creation or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// A conflicting lock is held by another client.
    Locked,
    /// Any other failure.
    Failure,
}

/// The lock manager collaborator.
///
/// Implementations must be safe for concurrent use; the handler calls
/// them from multiple requests at once.
pub trait DavLockSystem: Send + Sync {
    /// Create a lock, timestamped at `at`. Returns the lock token.
    fn create(&self, at: SystemTime, details: LockDetails) -> Result<String, LockError>;

    /// Release a lock by token.
    fn unlock(&self, at: SystemTime, token: &str) -> Result<(), LockError>;
}
