//! Sentinel visibility tracking for "load more" triggers.
//!
//! Each growing list owns a [`Registration`]. The renderer reports whether a
//! list's sentinel slot (the slot just past its visible window) landed inside
//! the viewport; the run loop then drains the hits with
//! [`IntersectionObserver::take_intersecting`]. Dropping a registration
//! unregisters it, so a page that is torn down stops receiving hits.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SentinelId(u32);

#[derive(Debug, Default)]
struct Registry {
  next_id: u32,
  observed: BTreeSet<SentinelId>,
  intersecting: BTreeSet<SentinelId>,
}

#[derive(Debug, Clone, Default)]
pub struct IntersectionObserver {
  registry: Rc<RefCell<Registry>>,
}

impl IntersectionObserver {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start observing a new sentinel. It stays observed until the guard is dropped.
  pub fn observe(&self) -> Registration {
    let mut registry = self.registry.borrow_mut();
    let id = SentinelId(registry.next_id);
    registry.next_id = registry.next_id.wrapping_add(1);
    registry.observed.insert(id);
    Registration { id, registry: Rc::downgrade(&self.registry) }
  }

  /// Record this frame's visibility for `id`. Unknown ids are ignored.
  pub fn report(&self, id: SentinelId, intersecting: bool) {
    let mut registry = self.registry.borrow_mut();
    if !registry.observed.contains(&id) {
      return;
    }
    if intersecting {
      registry.intersecting.insert(id);
    } else {
      registry.intersecting.remove(&id);
    }
  }

  /// Sentinels reported visible since the last call.
  pub fn take_intersecting(&self) -> Vec<SentinelId> {
    let mut registry = self.registry.borrow_mut();
    let hits = std::mem::take(&mut registry.intersecting);
    hits.into_iter().filter(|id| registry.observed.contains(id)).collect()
  }

  pub fn observed_count(&self) -> usize {
    self.registry.borrow().observed.len()
  }
}

/// Scoped observation of one sentinel.
#[derive(Debug)]
pub struct Registration {
  id: SentinelId,
  registry: std::rc::Weak<RefCell<Registry>>,
}

impl Registration {
  pub fn id(&self) -> SentinelId {
    self.id
  }
}

impl Drop for Registration {
  fn drop(&mut self) {
    if let Some(registry) = self.registry.upgrade() {
      let mut registry = registry.borrow_mut();
      registry.observed.remove(&self.id);
      registry.intersecting.remove(&self.id);
    }
  }
}

/// Whether the sentinel after `window_len` items is fully inside `[offset, offset + capacity)`.
pub fn sentinel_visible(offset: usize, capacity: usize, window_len: usize) -> bool {
  capacity > 0 && window_len >= offset && window_len < offset + capacity
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reported_hits_are_drained_once() {
    let observer = IntersectionObserver::new();
    let a = observer.observe();
    let b = observer.observe();
    observer.report(a.id(), true);
    observer.report(b.id(), false);
    assert_eq!(observer.take_intersecting(), vec![a.id()]);
    assert!(observer.take_intersecting().is_empty());
  }

  #[test]
  fn later_report_overrides_earlier() {
    let observer = IntersectionObserver::new();
    let a = observer.observe();
    observer.report(a.id(), true);
    observer.report(a.id(), false);
    assert!(observer.take_intersecting().is_empty());
  }

  #[test]
  fn dropping_registration_unregisters() {
    let observer = IntersectionObserver::new();
    let a = observer.observe();
    let id = a.id();
    observer.report(id, true);
    assert_eq!(observer.observed_count(), 1);
    drop(a);
    assert_eq!(observer.observed_count(), 0);
    assert!(observer.take_intersecting().is_empty());

    observer.report(id, true);
    assert!(observer.take_intersecting().is_empty());
  }

  #[test]
  fn registration_outliving_observer_is_harmless() {
    let observer = IntersectionObserver::new();
    let a = observer.observe();
    drop(observer);
    drop(a);
  }

  #[test]
  fn ids_are_unique() {
    let observer = IntersectionObserver::new();
    let a = observer.observe();
    let b = observer.observe();
    assert_ne!(a.id(), b.id());
  }

  // --- sentinel_visible ---

  #[test]
  fn sentinel_in_view() {
    assert!(sentinel_visible(0, 10, 5));
    assert!(sentinel_visible(0, 10, 9));
    assert!(sentinel_visible(12, 6, 17));
  }

  #[test]
  fn sentinel_out_of_view() {
    assert!(!sentinel_visible(0, 10, 10));
    assert!(!sentinel_visible(0, 10, 40));
    assert!(!sentinel_visible(5, 10, 3));
    assert!(!sentinel_visible(0, 0, 0));
  }
}
