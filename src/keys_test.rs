use super::*;
use std::cell::{Cell, RefCell};
use uuid::Uuid;

#[derive(Default)]
struct RecordingSource {
    next: Cell<ListenerId>,
    active: RefCell<Vec<ListenerId>>,
    added: Cell<usize>,
}

impl KeySource for RecordingSource {
    fn add_listener(&self) -> ListenerId {
        let id = self.next.get() + 1;
        self.next.set(id);
        self.added.set(self.added.get() + 1);
        self.active.borrow_mut().push(id);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.active.borrow_mut().retain(|&l| l != id);
    }
}

fn bound() -> (Rc<RecordingSource>, KeyBinding) {
    let source = Rc::new(RecordingSource::default());
    let mut binding = KeyBinding::new();
    binding.attach(source.clone());
    (source, binding)
}

// =============================================================
// Subscription
// =============================================================

#[test]
fn subscription_removes_listener_on_drop() {
    let source = Rc::new(RecordingSource::default());
    let sub = Subscription::new(source.clone());
    assert_eq!(*source.active.borrow(), vec![sub.id()]);
    drop(sub);
    assert!(source.active.borrow().is_empty());
}

// =============================================================
// KeyBinding
// =============================================================

#[test]
fn unbound_without_selection() {
    let (source, mut binding) = bound();
    binding.sync(None, 0);
    assert!(!binding.is_bound());
    assert_eq!(source.added.get(), 0);
}

#[test]
fn bound_while_selected() {
    let (source, mut binding) = bound();
    binding.sync(Some(Uuid::new_v4()), 0);
    assert!(binding.is_bound());
    assert_eq!(source.active.borrow().len(), 1);
}

#[test]
fn deselect_releases_listener() {
    let (source, mut binding) = bound();
    binding.sync(Some(Uuid::new_v4()), 0);
    binding.sync(None, 0);
    assert!(!binding.is_bound());
    assert!(source.active.borrow().is_empty());
}

#[test]
fn same_selection_and_revision_keeps_listener() {
    let (source, mut binding) = bound();
    let id = Uuid::new_v4();
    binding.sync(Some(id), 3);
    binding.sync(Some(id), 3);
    assert_eq!(source.added.get(), 1);
}

#[test]
fn furniture_change_rebinds() {
    let (source, mut binding) = bound();
    let id = Uuid::new_v4();
    binding.sync(Some(id), 1);
    binding.sync(Some(id), 2);
    assert_eq!(source.added.get(), 2);
    assert_eq!(source.active.borrow().len(), 1);
}

#[test]
fn selection_change_rebinds() {
    let (source, mut binding) = bound();
    binding.sync(Some(Uuid::new_v4()), 0);
    binding.sync(Some(Uuid::new_v4()), 0);
    assert_eq!(source.added.get(), 2);
    assert_eq!(source.active.borrow().len(), 1);
}

#[test]
fn teardown_releases_listener() {
    let (source, mut binding) = bound();
    binding.sync(Some(Uuid::new_v4()), 0);
    binding.teardown();
    assert!(source.active.borrow().is_empty());
}

#[test]
fn dropping_binding_releases_listener() {
    let (source, mut binding) = bound();
    binding.sync(Some(Uuid::new_v4()), 0);
    drop(binding);
    assert!(source.active.borrow().is_empty());
}

#[test]
fn detached_binding_never_subscribes() {
    let mut binding = KeyBinding::new();
    binding.sync(Some(Uuid::new_v4()), 0);
    assert!(!binding.is_bound());
}
