//! Incrementally growing prefix over a filtered list.
//!
//! A [`VisibleWindow`] starts at one chunk and grows by one chunk each time
//! its sentinel comes into view. It only tracks lengths; callers slice their
//! own list with [`VisibleWindow::slice`]. [`WindowedList`] adds the identity
//! of the list the window was built for, so switching filters starts over.

/// Prefix window of `visible` items, growing `chunk_size` at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleWindow {
  chunk_size: usize,
  visible: usize,
  /// Start of the next slice to append.
  next_index: usize,
}

impl VisibleWindow {
  pub fn new(chunk_size: usize) -> Self {
    let chunk_size = chunk_size.max(1);
    Self { chunk_size, visible: 0, next_index: chunk_size }
  }

  pub fn visible_len(&self) -> usize {
    self.visible
  }

  /// Back to the first chunk of a list of `source_len` items.
  pub fn reset(&mut self, source_len: usize) {
    self.visible = self.chunk_size.min(source_len);
    self.next_index = self.chunk_size;
  }

  /// Append the next chunk. Returns `false` (and changes nothing) when the source is exhausted.
  pub fn load_more(&mut self, source_len: usize) -> bool {
    let start = self.next_index.min(source_len);
    let end = (self.next_index + self.chunk_size).min(source_len);
    if start >= end {
      return false;
    }
    self.visible = end;
    self.next_index += self.chunk_size;
    true
  }

  pub fn is_exhausted(&self, source_len: usize) -> bool {
    self.visible >= source_len
  }

  /// The visible prefix of `source`.
  pub fn slice<'a, T>(&self, source: &'a [T]) -> &'a [T] {
    &source[..self.visible.min(source.len())]
  }
}

/// A [`VisibleWindow`] bound to the list it was built from.
///
/// `K` identifies the filtered list (a genre name, a filter, a generation
/// counter). A change of key or length resets the window to one chunk.
#[derive(Debug, Clone)]
pub struct WindowedList<K> {
  key: Option<K>,
  source_len: usize,
  window: VisibleWindow,
}

impl<K: PartialEq> WindowedList<K> {
  pub fn new(chunk_size: usize) -> Self {
    Self { key: None, source_len: 0, window: VisibleWindow::new(chunk_size) }
  }

  /// Rebind to `key`. Returns `true` if the window was reset.
  pub fn sync(&mut self, key: K, source_len: usize) -> bool {
    if self.key.as_ref() == Some(&key) && self.source_len == source_len {
      return false;
    }
    self.key = Some(key);
    self.source_len = source_len;
    self.window.reset(source_len);
    true
  }

  pub fn load_more(&mut self) -> bool {
    self.window.load_more(self.source_len)
  }

  pub fn visible_len(&self) -> usize {
    self.window.visible_len()
  }

  pub fn is_exhausted(&self) -> bool {
    self.window.is_exhausted(self.source_len)
  }

  pub fn slice<'a, T>(&self, source: &'a [T]) -> &'a [T] {
    self.window.slice(source)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- VisibleWindow ---

  #[test]
  fn reset_takes_first_chunk() {
    let mut w = VisibleWindow::new(20);
    w.reset(50);
    assert_eq!(w.visible_len(), 20);
    w.reset(7);
    assert_eq!(w.visible_len(), 7);
  }

  #[test]
  fn length_after_k_triggers() {
    for chunk in 1..=7usize {
      for n in 0..=30usize {
        let mut w = VisibleWindow::new(chunk);
        w.reset(n);
        let mut last = w.visible_len();
        assert_eq!(last, n.min(chunk));
        for k in 1..=12usize {
          w.load_more(n);
          let len = w.visible_len();
          assert_eq!(len, n.min(chunk * (k + 1)), "chunk={chunk} n={n} k={k}");
          assert!(len >= last);
          assert!(len <= n);
          last = len;
        }
      }
    }
  }

  #[test]
  fn slice_has_no_duplicates_or_gaps() {
    let source: Vec<usize> = (0..53).collect();
    let mut w = VisibleWindow::new(10);
    w.reset(source.len());
    while w.load_more(source.len()) {}
    let visible = w.slice(&source);
    assert_eq!(visible, &source[..]);
  }

  #[test]
  fn load_more_on_exhausted_source_is_noop() {
    let mut w = VisibleWindow::new(5);
    w.reset(5);
    let before = w.clone();
    assert!(!w.load_more(5));
    assert_eq!(w, before);
    assert!(w.is_exhausted(5));
  }

  #[test]
  fn empty_source() {
    let mut w = VisibleWindow::new(3);
    w.reset(0);
    assert_eq!(w.visible_len(), 0);
    assert!(!w.load_more(0));
    assert!(w.slice::<u8>(&[]).is_empty());
  }

  #[test]
  fn zero_chunk_is_clamped() {
    let mut w = VisibleWindow::new(0);
    w.reset(3);
    assert_eq!(w.visible_len(), 1);
    assert!(w.load_more(3));
    assert_eq!(w.visible_len(), 2);
  }

  // --- WindowedList ---

  #[test]
  fn key_change_resets_to_first_chunk() {
    let mut list: WindowedList<&str> = WindowedList::new(4);
    assert!(list.sync("Action", 30));
    list.load_more();
    list.load_more();
    assert_eq!(list.visible_len(), 12);

    assert!(list.sync("Dramas", 9));
    assert_eq!(list.visible_len(), 4);
  }

  #[test]
  fn same_key_keeps_window() {
    let mut list: WindowedList<u32> = WindowedList::new(4);
    list.sync(1, 30);
    list.load_more();
    assert!(!list.sync(1, 30));
    assert_eq!(list.visible_len(), 8);
  }

  #[test]
  fn length_change_resets() {
    let mut list: WindowedList<u32> = WindowedList::new(4);
    list.sync(1, 0);
    assert_eq!(list.visible_len(), 0);
    assert!(list.sync(1, 30));
    assert_eq!(list.visible_len(), 4);
  }
}
