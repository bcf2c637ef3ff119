use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback stored in an [`ObserverList`].
pub type Observer = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`ObserverList::subscribe`]; the only way to unsubscribe.
/// Unique across all lists in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(0);

impl ObserverId {
    fn next() -> Self {
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Default)]
struct Registry {
    entries: Vec<(ObserverId, Observer)>,
}

/// Ordered list of observers behind a cheap cloneable handle.
///
/// Clones share the same list, so a callback may capture a handle and
/// unsubscribe itself (or anyone else) while a notification pass is running.
/// [`notify`](Self::notify) invokes a snapshot taken before the first call.
#[derive(Clone, Default)]
pub struct ObserverList {
    inner: Arc<Mutex<Registry>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // Callbacks never run under the lock, so a poisoned guard still holds a consistent list.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, observer: impl Fn() + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId::next();
        self.registry().entries.push((id, Arc::new(observer)));
        id
    }

    /// Returns false when `id` was not subscribed; that is not an error.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut reg = self.registry();
        let before = reg.entries.len();
        reg.entries.retain(|(eid, _)| *eid != id);
        reg.entries.len() != before
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.registry().entries.iter().any(|(eid, _)| *eid == id)
    }

    pub fn len(&self) -> usize {
        self.registry().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.registry().entries.clear();
    }

    /// Invokes every observer present at call time, in subscription order.
    /// Returns how many were invoked.
    pub fn notify(&self) -> usize {
        let snapshot: Vec<Observer> = self
            .registry()
            .entries
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        for observer in &snapshot {
            observer();
        }
        snapshot.len()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList").field("len", &self.len()).finish()
    }
}
