use log::debug;
use std::fmt::Debug;

/// Coordinator letting one member of a set hold interaction at a time.
///
/// Claiming disables every other member through the caller-supplied `gate`;
/// releasing re-enables them. Members are plain keys (indices, entity ids),
/// so the group never owns the state machines it gates. The order in which
/// `gate` visits members is unspecified.
#[derive(Debug, Clone)]
pub struct ExclusiveGroup<K> {
    members: Vec<K>,
    holder: Option<K>,
}

impl<K> Default for ExclusiveGroup<K> {
    fn default() -> Self {
        Self { members: Vec::new(), holder: None }
    }
}

impl<K: Copy + PartialEq + Debug> ExclusiveGroup<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: impl IntoIterator<Item = K>) -> Self {
        let mut group = Self::new();
        for m in members {
            group.insert(m);
        }
        group
    }

    pub fn insert(&mut self, key: K) -> bool {
        if self.members.contains(&key) {
            return false;
        }
        self.members.push(key);
        true
    }

    /// Removing the holder clears the hold without gating anyone.
    pub fn remove(&mut self, key: K) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != key);
        if self.holder == Some(key) {
            self.holder = None;
        }
        before != self.members.len()
    }

    pub fn members(&self) -> &[K] { &self.members }
    pub fn holder(&self) -> Option<K> { self.holder }
    pub fn len(&self) -> usize { self.members.len() }
    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    pub fn claim(&mut self, key: K, mut gate: impl FnMut(K, bool)) -> bool {
        if !self.members.contains(&key) {
            return false;
        }
        match self.holder {
            Some(h) if h == key => return true,
            Some(_) => return false,
            None => {}
        }
        self.holder = Some(key);
        for other in self.members.iter().copied().filter(|m| *m != key) {
            gate(other, false);
        }
        debug!("group claimed by {key:?}");
        true
    }

    pub fn release(&mut self, key: K, mut gate: impl FnMut(K, bool)) -> bool {
        if self.holder != Some(key) {
            return false;
        }
        self.holder = None;
        for other in self.members.iter().copied().filter(|m| *m != key) {
            gate(other, true);
        }
        debug!("group released by {key:?}");
        true
    }

    /// Pushes the current hold state to every member: the holder stays
    /// enabled, the rest are disabled; with no holder everyone is enabled.
    /// Lets a caller replay several claims and releases with a no-op gate
    /// and gate members once for the outcome.
    pub fn apply(&self, mut gate: impl FnMut(K, bool)) {
        for m in self.members.iter().copied() {
            gate(m, self.holder.is_none_or(|h| h == m));
        }
    }

    pub fn reset(&mut self, mut gate: impl FnMut(K, bool)) {
        self.holder = None;
        for m in self.members.iter().copied() {
            gate(m, true);
        }
    }
}
