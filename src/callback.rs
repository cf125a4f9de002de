//! Insertion-ordered observer registries.
//!
//! Each event kind fans out to a list of subscribers in registration
//! order. Registration hands back a [`CallbackHandle`]; removing a handle
//! removes exactly one registration, so duplicate registrations of the
//! same closure are independent subscriptions.

use std::sync::Arc;

/// Identifies one registration in one registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u64);

/// An insertion-ordered list of subscribers sharing one event signature.
pub(crate) struct CallbackList<E> {
    entries: Vec<(CallbackHandle, Arc<dyn Fn(&E) + Send + Sync>)>,
    next_id: u64,
}

impl<E> CallbackList<E> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a subscriber, returning its handle.
    pub(crate) fn register(&mut self, callback: Arc<dyn Fn(&E) + Send + Sync>) -> CallbackHandle {
        let handle = CallbackHandle(self.next_id);
        self.next_id += 1;
        self.entries.push((handle, callback));
        handle
    }

    /// Remove the registration behind `handle`.
    ///
    /// Returns whether a registration was removed.
    pub(crate) fn remove(&mut self, handle: CallbackHandle) -> bool {
        match self.entries.iter().position(|(h, _)| *h == handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Snapshot the subscribers in registration order.
    ///
    /// Dispatch invokes the snapshot after releasing the client lock so a
    /// subscriber may call back into the client.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Fn(&E) + Send + Sync>> {
        self.entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }

    pub(crate) fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<E> Default for CallbackList<E> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn fanout_preserves_registration_order() {
        let mut list: CallbackList<u8> = CallbackList::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            list.register(Arc::new(move |_| seen.lock().unwrap().push(tag)));
        }
        for callback in list.snapshot() {
            callback(&0);
        }
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn removal_takes_exactly_one_registration() {
        let mut list: CallbackList<u8> = CallbackList::new();
        let count = Arc::new(Mutex::new(0u32));

        let bump = {
            let count = Arc::clone(&count);
            Arc::new(move |_: &u8| *count.lock().unwrap() += 1)
        };
        let first = list.register(bump.clone());
        let _second = list.register(bump);

        assert!(list.remove(first));
        assert!(!list.remove(first));
        for callback in list.snapshot() {
            callback(&0);
        }
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn empty_list_reports_empty() {
        let list: CallbackList<u8> = CallbackList::new();
        assert!(list.is_empty());
        assert!(list.snapshot().is_empty());
    }
}
