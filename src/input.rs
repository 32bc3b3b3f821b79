use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::App;
use crate::palette::PaletteOutcome;
use crate::routes::Route;

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

  if ctrl && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if ctrl && key.code == KeyCode::Char('k') {
    app.overlay.toggle();
    return;
  }

  if ctrl && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  if app.overlay.is_open() {
    handle_overlay_key(app, key);
  } else {
    handle_page_key(app, key);
  }
}

fn handle_overlay_key(app: &mut App, key: event::KeyEvent) {
  match app.overlay.handle_key(key) {
    PaletteOutcome::Consumed | PaletteOutcome::Close => {}
    PaletteOutcome::Select(entry) => app.select_search_entry(entry),
  }
}

fn handle_page_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Char('/') => app.overlay.open(),
    KeyCode::Char('q') => app.should_quit = true,
    KeyCode::Char(c @ '1'..='6') => {
      let idx = (c as usize) - ('1' as usize);
      if let Some(route) = Route::TABS.get(idx) {
        app.navigate(&route.path());
      }
    }
    KeyCode::Backspace | KeyCode::Char('b') => app.go_back(),
    KeyCode::Char('x') if *app.router.current() == Route::Account => app.clear_profile(),
    KeyCode::Esc => app.clear_error(),
    _ => app.handle_page_key(key),
  }
}
