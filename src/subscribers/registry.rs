//! # Subscriber registry.
//!
//! Identity-keyed set of active subscribers. Identity is the address of the
//! `Arc` allocation, so the same handle registered twice is one member while
//! two handles wrapping equal closures are two members.
//!
//! The registry only tracks membership; the proxy reads [`is_empty`] after
//! each change to decide whether the facility must be patched or restored.
//!
//! [`is_empty`]: SubscriberRegistry::is_empty

use std::sync::Arc;

use crate::subscribers::Subscribe;

/// Identity of a registered subscriber.
pub(crate) fn identity(sub: &Arc<dyn Subscribe>) -> usize {
    Arc::as_ptr(sub) as *const () as usize
}

/// Active subscribers in registration order.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    members: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberRegistry {
    /// Adds `sub`; returns `false` if it was already a member.
    pub(crate) fn register(&mut self, sub: Arc<dyn Subscribe>) -> bool {
        let id = identity(&sub);
        if self.members.iter().any(|m| identity(m) == id) {
            return false;
        }
        self.members.push(sub);
        true
    }

    /// Removes `sub`; returns `false` if it was not a member.
    pub(crate) fn unregister(&mut self, sub: &Arc<dyn Subscribe>) -> bool {
        let id = identity(sub);
        let before = self.members.len();
        self.members.retain(|m| identity(m) != id);
        self.members.len() != before
    }

    /// Current members, cloned for delivery.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Subscribe>> {
        self.members.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
