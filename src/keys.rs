//! Scoped keyboard subscription for the delete shortcut.
//!
//! The host owns the actual key listener (a window `keydown` handler in the
//! browser). The engine asks for one through [`KeySource`] only while an item
//! is selected, re-acquires it whenever the furniture or the selection
//! changes, and releases it when the [`Subscription`] guard is dropped, so a
//! torn-down engine never leaves a listener behind.

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;

use std::fmt;
use std::rc::Rc;

use crate::scene::ItemId;

/// Handle for one registered listener.
pub type ListenerId = u64;

/// Something that can route key presses to the engine.
pub trait KeySource {
    /// Start delivering key presses; returns a handle for removal.
    fn add_listener(&self) -> ListenerId;
    /// Stop delivering key presses for `id`.
    fn remove_listener(&self, id: ListenerId);
}

/// An active listener. Removing it happens on drop.
pub struct Subscription {
    source: Rc<dyn KeySource>,
    id: ListenerId,
}

impl Subscription {
    #[must_use]
    pub fn new(source: Rc<dyn KeySource>) -> Self {
        let id = source.add_listener();
        Self { source, id }
    }

    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.source.remove_listener(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Keeps the delete-key listener bound exactly while an item is selected.
#[derive(Default)]
pub struct KeyBinding {
    source: Option<Rc<dyn KeySource>>,
    active: Option<Subscription>,
    /// Selection and furniture revision the active listener was bound for.
    bound_for: Option<(ItemId, u64)>,
}

impl KeyBinding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route future subscriptions through `source`, dropping any current one.
    pub fn attach(&mut self, source: Rc<dyn KeySource>) {
        self.teardown();
        self.source = Some(source);
    }

    /// Bring the listener in line with the current selection.
    ///
    /// `revision` changes whenever the furniture collection changes; any
    /// change of selection or revision re-subscribes.
    pub fn sync(&mut self, selected: Option<ItemId>, revision: u64) {
        let wanted = selected.map(|id| (id, revision));
        if wanted == self.bound_for && self.active.is_some() == wanted.is_some() {
            return;
        }

        // Release before re-acquiring so at most one listener is live.
        self.active = None;
        self.bound_for = None;

        let (Some(key), Some(source)) = (wanted, self.source.as_ref()) else {
            return;
        };
        self.active = Some(Subscription::new(Rc::clone(source)));
        self.bound_for = Some(key);
    }

    /// Whether a listener is currently registered.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.active.is_some()
    }

    /// Release the listener, if any.
    pub fn teardown(&mut self) {
        self.active = None;
        self.bound_for = None;
    }
}

impl fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding")
            .field("attached", &self.source.is_some())
            .field("active", &self.active)
            .field("bound_for", &self.bound_for)
            .finish()
    }
}
