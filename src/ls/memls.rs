//! Ephemeral in-memory locksystem.

use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::ls::*;

#[derive(Debug, Clone)]
struct MemLock {
    token: String,
    root: String,
    zero_depth: bool,
    expires: Option<SystemTime>,
}

/// In-memory lock manager.
pub struct MemLs {
    locks: Mutex<Vec<MemLock>>,
}

impl MemLs {
    pub fn new() -> Arc<MemLs> {
        Arc::new(MemLs {
            locks: Mutex::new(Vec::new()),
        })
    }
}

// Does a lock rooted at `root` cover `path`?
fn covers(root: &str, zero_depth: bool, path: &str) -> bool {
    if root == path {
        return true;
    }
    if zero_depth {
        return false;
    }
    path.strip_prefix(root)
        .map_or(false, |rest| rest.starts_with('/') || root.ends_with('/'))
}

fn conflicts(lock: &MemLock, details: &LockDetails) -> bool {
    covers(&lock.root, lock.zero_depth, &details.root)
        || covers(&details.root, details.zero_depth, &lock.root)
}

impl DavLockSystem for MemLs {
    fn create(&self, at: SystemTime, details: LockDetails) -> Result<String, LockError> {
        let mut locks = self.locks.lock();
        locks.retain(|l| l.expires.map_or(true, |t| t > at));
        if locks.iter().any(|l| conflicts(l, &details)) {
            debug!("LS: lock on {:?} conflicts", details.root);
            return Err(LockError::Locked);
        }
        let token = format!("opaquelocktoken:{}", Uuid::new_v4());
        trace!("LS: created lock {} on {:?}", token, details.root);
        locks.push(MemLock {
            token: token.clone(),
            root: details.root,
            zero_depth: details.zero_depth,
            expires: details.duration.map(|d| at + d),
        });
        Ok(token)
    }

    fn unlock(&self, _at: SystemTime, token: &str) -> Result<(), LockError> {
        let mut locks = self.locks.lock();
        let before = locks.len();
        locks.retain(|l| l.token != token);
        if locks.len() == before {
            return Err(LockError::Failure);
        }
        trace!("LS: released lock {}", token);
        Ok(())
    }
}
