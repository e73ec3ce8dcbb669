//! At most one in-progress completion per user.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

/// Set of users with a completion in flight.
///
/// The set only ever holds ids that currently own a guard.
#[derive(Debug, Default)]
pub struct InFlight {
    users: Mutex<HashSet<i64>>,
}

impl InFlight {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `user_id`, or `None` if it is already taken.
    pub fn try_acquire(&self, user_id: i64) -> Option<InFlightGuard<'_>> {
        if self.lock().insert(user_id) {
            debug!("User {} is now in flight", user_id);
            Some(InFlightGuard {
                owner: self,
                user_id,
            })
        } else {
            None
        }
    }

    /// Whether `user_id` currently holds a slot.
    pub fn contains(&self, user_id: i64) -> bool {
        self.lock().contains(&user_id)
    }

    /// Number of users in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nobody is in flight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the set half-updated.
    fn lock(&self) -> MutexGuard<'_, HashSet<i64>> {
        self.users
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases the user's slot on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    user_id: i64,
}

impl InFlightGuard<'_> {
    /// The user holding this slot.
    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.lock().remove(&self.user_id);
    }
}
