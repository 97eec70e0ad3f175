//! Typed observer lists.
//!
//! [`Observers<T>`] is the single notification primitive in ByteXR: the
//! registry's connect/disconnect events and every controller channel are one.
//! Delivery is synchronous, in registration order, and there is no duplicate
//! suppression: subscribing the same callback twice calls it twice.
//!
//! A callback registered with [`Observers::subscribe_while`] reports on each
//! call whether it still wants to be kept; one that says no is dropped right
//! after that delivery.

use std::collections::BTreeMap;
use std::fmt;

use crate::event::DeviceRole;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Which roles a registry subscription wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleFilter {
    Any,
    Only(DeviceRole),
}

impl RoleFilter {
    pub fn matches(self, role: DeviceRole) -> bool {
        match self {
            Self::Any => true,
            Self::Only(wanted) => wanted == role,
        }
    }
}

struct ListenerEntry<T> {
    /// Returns `false` once the listener is dead.
    callback: Box<dyn FnMut(&T) -> bool>,
    enabled: bool,
}

/// Synchronous fan-out list for one notification kind.
pub struct Observers<T> {
    next_id: u64,
    listeners: BTreeMap<ListenerId, ListenerEntry<T>>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T> Observers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: BTreeMap::new(),
        }
    }

    /// Registers a callback. It starts enabled.
    pub fn subscribe(&mut self, mut callback: impl FnMut(&T) + 'static) -> ListenerId {
        self.subscribe_while(move |value| {
            callback(value);
            true
        })
    }

    /// Registers a callback that unsubscribes itself by returning `false`.
    pub fn subscribe_while(&mut self, callback: impl FnMut(&T) -> bool + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.listeners.insert(
            id,
            ListenerEntry {
                callback: Box::new(callback),
                enabled: true,
            },
        );
        self.next_id += 1;
        id
    }

    /// Unregisters a callback entirely. Returns `false` if `id` was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Re-enables a muted callback.
    pub fn enable(&mut self, id: ListenerId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Mutes a callback without removing it.
    pub fn disable(&mut self, id: ListenerId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Calls every enabled callback with `value`, then drops the ones that
    /// asked to go.
    pub fn notify(&mut self, value: &T) {
        let mut dead = Vec::new();
        for (id, entry) in self.listeners.iter_mut() {
            if entry.enabled && !(entry.callback)(value) {
                dead.push(*id);
            }
        }
        for id in dead {
            self.listeners.remove(&id);
        }
    }
}
