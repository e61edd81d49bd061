//! # Swappable entry points.
//!
//! An [`EntryPoint`] holds the function currently installed for one level.
//! Replacement is a whole-`Arc` swap under a write lock; callers clone the
//! current `Arc` under a read lock and invoke it after releasing the lock, so
//! a call never observes a half-installed function and an installed function
//! may itself call back into the facility.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::value::Value;

/// One invocation of a facility entry point.
#[derive(Clone, Copy)]
pub struct Call<'a> {
    /// Call arguments, in order.
    pub args: &'a [Value],
    /// Source location of the caller.
    pub location: &'static Location<'static>,
}

impl<'a> Call<'a> {
    /// Creates a call record for `args` at the caller's location.
    #[track_caller]
    pub fn here(args: &'a [Value]) -> Self {
        Self {
            args,
            location: Location::caller(),
        }
    }
}

impl fmt::Debug for Call<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("args", &self.args)
            .field("location", &format_args!("{}", self.location))
            .finish()
    }
}

/// Function installed at an entry point.
pub type EntryFn = Arc<dyn Fn(&Call<'_>) + Send + Sync>;

/// Atomically swappable slot holding one [`EntryFn`].
pub struct EntryPoint {
    current: RwLock<EntryFn>,
}

impl EntryPoint {
    /// Creates a slot with `initial` installed.
    pub fn new(initial: EntryFn) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Returns the installed function.
    pub fn load(&self) -> EntryFn {
        Arc::clone(&self.current.read())
    }

    /// Installs `next` and returns the function it replaced.
    pub fn swap(&self, next: EntryFn) -> EntryFn {
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// True if `f` is the installed function.
    pub fn is(&self, f: &EntryFn) -> bool {
        Arc::ptr_eq(&self.current.read(), f)
    }

    /// Invokes the installed function.
    pub fn invoke(&self, call: &Call<'_>) {
        let f = self.load();
        f(call);
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (EntryFn, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let f: EntryFn = Arc::new(move |_call: &Call<'_>| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (f, hits)
    }

    #[test]
    fn swap_returns_previous_function() {
        let (first, first_hits) = counter();
        let (second, second_hits) = counter();
        let slot = EntryPoint::new(Arc::clone(&first));

        slot.invoke(&Call::here(&[]));
        let prev = slot.swap(Arc::clone(&second));
        slot.invoke(&Call::here(&[]));

        assert!(Arc::ptr_eq(&prev, &first));
        assert!(slot.is(&second));
        assert_eq!(first_hits.load(Ordering::SeqCst), 1);
        assert_eq!(second_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn installed_function_may_reenter_the_slot() {
        let slot = Arc::new(EntryPoint::new(Arc::new(|_call: &Call<'_>| {})));
        let (inner, hits) = counter();
        let s = Arc::clone(&slot);
        slot.swap(Arc::new(move |call: &Call<'_>| {
            inner(call);
            s.swap(Arc::clone(&inner));
        }));
        slot.invoke(&Call::here(&[]));
        slot.invoke(&Call::here(&[]));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
