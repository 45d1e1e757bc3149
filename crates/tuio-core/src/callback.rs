//! Ordered subscriber lists with removable handles

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by [`CallbackList::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

impl CallbackId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Subscribers for one event kind, invoked in registration order
///
/// Callbacks run on the thread that calls [`CallbackList::call`], with the
/// caller's locks held. They must not register or unregister on the same
/// list.
pub struct CallbackList<T: ?Sized> {
    callbacks: RwLock<BTreeMap<CallbackId, Callback<T>>>,
    next_id: AtomicU64,
}

impl<T: ?Sized> CallbackList<T> {
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn register<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Returns false if `id` was not registered here
    pub fn unregister(&self, id: CallbackId) -> bool {
        self.callbacks.write().remove(&id).is_some()
    }

    pub fn call(&self, value: &T) {
        for callback in self.callbacks.read().values() {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }

    pub fn clear(&self) {
        self.callbacks.write().clear();
    }
}

impl<T: ?Sized> Default for CallbackList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for CallbackList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_registration_order() {
        let list = CallbackList::<i32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = seen.clone();
            list.register(move |v: &i32| seen.lock().push(format!("{}{}", tag, v)));
        }

        list.call(&1);
        assert_eq!(*seen.lock(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_unregister() {
        let list = CallbackList::<str>::new();
        let hits = Arc::new(AtomicU64::new(0));

        let counter = hits.clone();
        let id = list.register(move |_: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        list.call("x");
        assert!(list.unregister(id));
        assert!(!list.unregister(id));
        list.call("y");

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(list.is_empty());
    }
}
