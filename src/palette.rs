//! Search overlay: a two-state (closed/open) palette over a [`FuzzyIndex`].

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::input::char_to_byte_index;
use crate::search::{FuzzyIndex, SearchEntry, SearchHit};
use crate::session::{INDIVIDUAL_USER_KEY, PLATE_KEY, SessionStore};

/// Result of feeding a key to the open overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteOutcome {
  /// Key handled, overlay stays open.
  Consumed,
  /// Overlay closed without a selection.
  Close,
  /// Overlay closed with this entry chosen.
  Select(SearchEntry),
}

#[derive(Debug, Default)]
pub struct SearchOverlay {
  open: bool,
  input: String,
  /// Cursor position within `input` (char index).
  cursor: usize,
  results: Vec<SearchHit>,
  selected: usize,
  index: Option<FuzzyIndex>,
}

impl SearchOverlay {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn open(&mut self) {
    if !self.open {
      debug!("palette: open");
    }
    self.open = true;
  }

  /// Close and forget the query, results and highlight.
  pub fn close(&mut self) {
    if self.open {
      debug!("palette: close");
    }
    self.open = false;
    self.input.clear();
    self.cursor = 0;
    self.results.clear();
    self.selected = 0;
  }

  pub fn toggle(&mut self) {
    if self.open { self.close() } else { self.open() }
  }

  /// Swap in a freshly built index and re-run the current query against it.
  pub fn set_index(&mut self, index: FuzzyIndex) {
    if index.is_empty() {
      warn!("palette: index has no entries");
    } else {
      info!(entries = index.len(), "palette: index ready");
    }
    self.index = Some(index);
    self.refresh();
  }

  pub fn index(&self) -> Option<&FuzzyIndex> {
    self.index.as_ref()
  }

  pub fn query(&self) -> &str {
    &self.input
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn results(&self) -> &[SearchHit] {
    &self.results
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn selected_entry(&self) -> Option<&SearchEntry> {
    let hit = self.results.get(self.selected)?;
    self.index.as_ref()?.entry(hit.entry)
  }

  /// Replace the query and synchronously recompute the results.
  pub fn set_query(&mut self, query: &str) {
    self.input = query.to_string();
    self.cursor = self.input.chars().count();
    self.refresh();
  }

  fn refresh(&mut self) {
    self.results = match &self.index {
      Some(index) => index.search(&self.input),
      None => Vec::new(),
    };
    self.selected = 0;
  }

  pub fn select_next(&mut self) {
    if !self.results.is_empty() {
      self.selected = (self.selected + 1) % self.results.len();
    }
  }

  pub fn select_prev(&mut self) {
    if !self.results.is_empty() {
      self.selected = if self.selected == 0 { self.results.len() - 1 } else { self.selected - 1 };
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> PaletteOutcome {
    match key.code {
      KeyCode::Esc => {
        self.close();
        PaletteOutcome::Close
      }
      KeyCode::Enter => match self.selected_entry().cloned() {
        Some(entry) => {
          self.close();
          PaletteOutcome::Select(entry)
        }
        None => PaletteOutcome::Consumed,
      },
      KeyCode::Down => {
        self.select_next();
        PaletteOutcome::Consumed
      }
      KeyCode::Up => {
        self.select_prev();
        PaletteOutcome::Consumed
      }
      KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.select_next();
        PaletteOutcome::Consumed
      }
      KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.select_prev();
        PaletteOutcome::Consumed
      }
      KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.set_query("");
        PaletteOutcome::Consumed
      }
      KeyCode::Char(c) => {
        let byte_idx = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
        self.refresh();
        PaletteOutcome::Consumed
      }
      KeyCode::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          let byte_idx = char_to_byte_index(&self.input, self.cursor);
          self.input.remove(byte_idx);
          self.refresh();
        }
        PaletteOutcome::Consumed
      }
      KeyCode::Delete => {
        if self.cursor < self.input.chars().count() {
          let byte_idx = char_to_byte_index(&self.input, self.cursor);
          self.input.remove(byte_idx);
          self.refresh();
        }
        PaletteOutcome::Consumed
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        PaletteOutcome::Consumed
      }
      KeyCode::Right => {
        if self.cursor < self.input.chars().count() {
          self.cursor += 1;
        }
        PaletteOutcome::Consumed
      }
      KeyCode::Home => {
        self.cursor = 0;
        PaletteOutcome::Consumed
      }
      KeyCode::End => {
        self.cursor = self.input.chars().count();
        PaletteOutcome::Consumed
      }
      _ => PaletteOutcome::Consumed,
    }
  }
}

/// Record the context a compound entry carries, then return where to navigate.
///
/// `"User~~…"` entries store their payload as JSON under [`INDIVIDUAL_USER_KEY`];
/// `"License Plate~~…"` entries store the plate under [`PLATE_KEY`].
pub fn apply_selection(entry: &SearchEntry, session: &mut SessionStore) -> String {
  if let Some(compound) = entry.compound() {
    match compound.kind {
      "User" => {
        if let Some(data) = &entry.data
          && let Ok(json) = serde_json::to_string(data)
        {
          session.set(INDIVIDUAL_USER_KEY, json);
        }
      }
      "License Plate" => session.set(PLATE_KEY, compound.name),
      _ => {}
    }
  }
  info!(title = %entry.display_title(), path = %entry.path, "palette: selected");
  entry.path.clone()
}
