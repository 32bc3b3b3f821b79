//! Per-route page state.
//!
//! A [`Page`] is built when its route is entered and dropped when the user
//! navigates away. Every growing list on a page holds a sentinel
//! [`Registration`], so dropping the page also stops its "load more" hits.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, error};

use crate::catalog::{
  CatalogError, KIND_TV_SHOW, Record, RecordFilter, all_genres, find_by_slug, find_title, slug,
};
use crate::constants::{SectionSpec, constants};
use crate::poster::Poster;
use crate::routes::Route;
use crate::viewport::{IntersectionObserver, Registration, SentinelId};
use crate::window::WindowedList;

/// Identity of the list a shelf window was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct ListKey {
  pub generation: u64,
  pub filter: RecordFilter,
}

/// What a key press on a page asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
  None,
  Navigate(String),
}

// --- Shelf ---

/// A lazily grown list of catalog indices, drawn as a row or a grid.
#[derive(Debug)]
pub struct Shelf {
  pub title: String,
  items: Vec<usize>,
  window: WindowedList<ListKey>,
  registration: Registration,
  /// Selected position within the visible window.
  pub selected: usize,
  /// First visible item (rows) or first visible line (grids).
  pub offset: usize,
  /// Cards per line, set by the renderer for grids.
  pub columns: usize,
}

impl Shelf {
  pub fn new(title: impl Into<String>, chunk_size: usize, observer: &IntersectionObserver) -> Self {
    Self {
      title: title.into(),
      items: Vec::new(),
      window: WindowedList::new(chunk_size),
      registration: observer.observe(),
      selected: 0,
      offset: 0,
      columns: 1,
    }
  }

  /// Point the shelf at a new filtered list. The window restarts at one chunk if `key` changed.
  pub fn set_items(&mut self, items: Vec<usize>, key: ListKey) {
    let len = items.len();
    self.items = items;
    if self.window.sync(key, len) {
      self.selected = 0;
      self.offset = 0;
    }
  }

  pub fn sentinel(&self) -> SentinelId {
    self.registration.id()
  }

  pub fn visible(&self) -> &[usize] {
    self.window.slice(&self.items)
  }

  pub fn total(&self) -> usize {
    self.items.len()
  }

  pub fn is_exhausted(&self) -> bool {
    self.window.is_exhausted()
  }

  pub fn load_more(&mut self) -> bool {
    let grew = self.window.load_more();
    if grew {
      debug!(shelf = %self.title, visible = self.window.visible_len(), total = self.items.len(), "shelf: load more");
    }
    grew
  }

  pub fn selected_record(&self) -> Option<usize> {
    self.visible().get(self.selected).copied()
  }

  /// Move the selection by `delta`, clamped to the visible window.
  pub fn move_by(&mut self, delta: isize) {
    let len = self.visible().len();
    if len == 0 {
      self.selected = 0;
      return;
    }
    self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
  }

  /// Adjust `offset` so the selection is inside a viewport of `capacity` units.
  ///
  /// Once the selection reaches the last unit of a window that can still grow,
  /// the sentinel unit after it is kept in view too.
  pub fn scroll_to_selection(&mut self, capacity: usize, columns: usize) {
    let columns = columns.max(1);
    self.columns = columns;
    if capacity == 0 {
      return;
    }
    let unit = self.selected / columns;
    let last = self.window.visible_len().saturating_sub(1) / columns;
    let end = if unit == last && capacity > 1 && !self.is_exhausted() { self.sentinel_unit() } else { unit };
    if unit < self.offset {
      self.offset = unit;
    } else if end >= self.offset + capacity {
      self.offset = end + 1 - capacity;
    }
  }

  /// Unit (item or line) the sentinel occupies.
  pub fn sentinel_unit(&self) -> usize {
    self.window.visible_len() / self.columns.max(1)
  }
}

// --- Hero ---

#[derive(Debug, Clone)]
pub struct PosterSlot {
  pub poster: Poster,
  /// A probe was already requested for this poster.
  pub requested: bool,
}

impl PosterSlot {
  pub fn new(poster: Poster) -> Self {
    Self { poster, requested: false }
  }
}

#[derive(Debug)]
pub struct HeroBanner {
  pub record: Record,
  pub genres: Vec<String>,
  pub poster: PosterSlot,
}

#[derive(Debug)]
pub struct Hero {
  pub heading: &'static str,
  pub title: String,
  pub banner: Result<HeroBanner, CatalogError>,
}

impl Hero {
  fn build(heading: &'static str, title: &str, records: &[Record]) -> Self {
    let banner = find_title(records, title).map(|record| HeroBanner {
      record: record.clone(),
      genres: record.active_genres(&constants().genres).into_iter().map(str::to_string).collect(),
      poster: PosterSlot::new(Poster::for_title(&record.title)),
    });
    if let Err(e) = &banner {
      error!(title = %title, err = %e, "hero: lookup failed");
    }
    Self { heading, title: title.to_string(), banner }
  }
}

// --- Browse pages (home, movies) ---

#[derive(Debug)]
pub struct BrowsePage {
  hero_heading: &'static str,
  hero_title: String,
  specs: Vec<SectionSpec>,
  pub hero: Option<Hero>,
  pub shelves: Vec<Shelf>,
  /// Genre chips; empty on pages that don't show them.
  pub genres: Vec<String>,
  show_genres: bool,
  pub focus: usize,
}

impl BrowsePage {
  fn new(
    hero_heading: &'static str,
    hero_title: &str,
    specs: &[SectionSpec],
    show_genres: bool,
    observer: &IntersectionObserver,
  ) -> Self {
    let chunk = constants().row_chunk_size;
    Self {
      hero_heading,
      hero_title: hero_title.to_string(),
      specs: specs.to_vec(),
      hero: None,
      shelves: specs.iter().map(|s| Shelf::new(s.title.clone(), chunk, observer)).collect(),
      genres: Vec::new(),
      show_genres,
      focus: 0,
    }
  }

  fn sync(&mut self, records: &[Record], generation: u64) {
    if records.is_empty() {
      self.hero = None;
    } else {
      self.hero = Some(Hero::build(self.hero_heading, &self.hero_title, records));
    }
    for (shelf, spec) in self.shelves.iter_mut().zip(&self.specs) {
      shelf.set_items(spec.filter.apply(records), ListKey { generation, filter: spec.filter.clone() });
    }
    if self.show_genres {
      self.genres = all_genres(records, &constants().genres);
    }
  }

  pub fn focused(&self) -> Option<&Shelf> {
    self.shelves.get(self.focus)
  }

  fn handle_key(&mut self, key: KeyEvent, records: &[Record]) -> PageAction {
    let count = self.shelves.len();
    match key.code {
      KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') if count > 0 => {
        self.focus = (self.focus + 1) % count;
      }
      KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') if count > 0 => {
        self.focus = if self.focus == 0 { count - 1 } else { self.focus - 1 };
      }
      KeyCode::Right | KeyCode::Char('l') => {
        if let Some(shelf) = self.shelves.get_mut(self.focus) {
          shelf.move_by(1);
        }
      }
      KeyCode::Left | KeyCode::Char('h') => {
        if let Some(shelf) = self.shelves.get_mut(self.focus) {
          shelf.move_by(-1);
        }
      }
      KeyCode::Enter => {
        if let Some(idx) = self.focused().and_then(Shelf::selected_record) {
          return open_record(records, idx);
        }
      }
      _ => {}
    }
    PageAction::None
  }
}

// --- TV shows ---

#[derive(Debug)]
pub struct TvShowsPage {
  /// Catalog indices of all TV shows.
  shows: Vec<usize>,
  pub genres: Vec<String>,
  pub genre: Option<usize>,
  pub grid: Shelf,
  generation: u64,
}

impl TvShowsPage {
  fn new(observer: &IntersectionObserver) -> Self {
    Self {
      shows: Vec::new(),
      genres: Vec::new(),
      genre: None,
      grid: Shelf::new("TV Shows", constants().tv_chunk_size, observer),
      generation: 0,
    }
  }

  fn sync(&mut self, records: &[Record], generation: u64) {
    self.generation = generation;
    self.shows = RecordFilter::Kind(KIND_TV_SHOW.to_string()).apply(records);
    self.genres = all_genres(self.shows.iter().map(|&i| &records[i]), &constants().genres);

    let current = self.genre.and_then(|i| self.genres.get(i)).cloned();
    let wanted = current.unwrap_or_else(|| constants().tv_default_genre.clone());
    let idx = self.genres.iter().position(|g| *g == wanted).or_else(|| (!self.genres.is_empty()).then_some(0));
    self.apply_genre(idx, records);
  }

  pub fn selected_genre(&self) -> Option<&str> {
    self.genre.and_then(|i| self.genres.get(i)).map(String::as_str)
  }

  fn apply_genre(&mut self, idx: Option<usize>, records: &[Record]) {
    self.genre = idx;
    let filter = match self.selected_genre() {
      Some(genre) => RecordFilter::Genre(genre.to_string()),
      None => RecordFilter::All,
    };
    let items = self.shows.iter().copied().filter(|&i| filter.matches(&records[i])).collect();
    debug!(genre = ?self.selected_genre(), "tv: genre selected");
    self.grid.set_items(items, ListKey { generation: self.generation, filter });
  }

  /// Step the genre selection by `delta`, wrapping around.
  pub fn cycle_genre(&mut self, delta: isize, records: &[Record]) {
    let count = self.genres.len();
    if count == 0 {
      return;
    }
    let current = self.genre.unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(count as isize) as usize;
    self.apply_genre(Some(next), records);
  }

  fn handle_key(&mut self, key: KeyEvent, records: &[Record]) -> PageAction {
    match key.code {
      KeyCode::Char(']') | KeyCode::Tab => self.cycle_genre(1, records),
      KeyCode::Char('[') | KeyCode::BackTab => self.cycle_genre(-1, records),
      _ => return grid_key(&mut self.grid, key, records),
    }
    PageAction::None
  }
}

// --- All titles ---

#[derive(Debug)]
pub struct TitlesPage {
  pub grid: Shelf,
}

impl TitlesPage {
  fn new(observer: &IntersectionObserver) -> Self {
    Self { grid: Shelf::new("All Titles", constants().titles_chunk_size, observer) }
  }

  fn sync(&mut self, records: &[Record], generation: u64) {
    self.grid.set_items(RecordFilter::All.apply(records), ListKey { generation, filter: RecordFilter::All });
  }
}

fn grid_key(grid: &mut Shelf, key: KeyEvent, records: &[Record]) -> PageAction {
  let columns = grid.columns.max(1) as isize;
  match key.code {
    KeyCode::Right | KeyCode::Char('l') => grid.move_by(1),
    KeyCode::Left | KeyCode::Char('h') => grid.move_by(-1),
    KeyCode::Down | KeyCode::Char('j') => grid.move_by(columns),
    KeyCode::Up | KeyCode::Char('k') => grid.move_by(-columns),
    KeyCode::PageDown => grid.move_by(columns * 5),
    KeyCode::PageUp => grid.move_by(-columns * 5),
    KeyCode::Enter => {
      if let Some(idx) = grid.selected_record() {
        return open_record(records, idx);
      }
    }
    _ => {}
  }
  PageAction::None
}

fn open_record(records: &[Record], idx: usize) -> PageAction {
  let Some(record) = records.get(idx) else { return PageAction::None };
  let route = if record.is_kind(KIND_TV_SHOW) { Route::tv_show(slug(&record.title)) } else { Route::movie(slug(&record.title)) };
  PageAction::Navigate(route.path())
}

// --- Title detail ---

#[derive(Debug)]
pub struct TitlePage {
  pub slug: String,
  pub record: Option<usize>,
  pub poster: Option<PosterSlot>,
}

impl TitlePage {
  fn sync(&mut self, records: &[Record]) {
    self.record = find_by_slug(records, &self.slug).map(|(idx, _)| idx);
    self.poster = self.record.map(|idx| PosterSlot::new(Poster::for_title(&records[idx].title)));
  }
}

// --- Page ---

#[derive(Debug)]
pub enum Page {
  Home(BrowsePage),
  Movies(BrowsePage),
  TvShows(TvShowsPage),
  Titles(TitlesPage),
  Title(TitlePage),
  Account,
  PrivacyPolicy,
  NotFound(String),
}

impl Page {
  /// Build the page for `route`. Call [`Page::sync`] once the catalog is available.
  pub fn mount(route: &Route, observer: &IntersectionObserver) -> Self {
    let c = constants();
    match route {
      Route::Home => Page::Home(BrowsePage::new("Recently Added", &c.home_hero, &c.home_sections, true, observer)),
      Route::Movies => Page::Movies(BrowsePage::new("Recently Added", &c.movies_hero, &c.movies_sections, false, observer)),
      Route::TvShows => Page::TvShows(TvShowsPage::new(observer)),
      Route::Titles => Page::Titles(TitlesPage::new(observer)),
      Route::Title { slug, .. } => Page::Title(TitlePage { slug: slug.clone(), record: None, poster: None }),
      Route::Account => Page::Account,
      Route::PrivacyPolicy => Page::PrivacyPolicy,
      Route::NotFound(path) => Page::NotFound(path.clone()),
    }
  }

  /// Re-derive lists from a (re)loaded catalog.
  pub fn sync(&mut self, records: &[Record], generation: u64) {
    match self {
      Page::Home(page) | Page::Movies(page) => page.sync(records, generation),
      Page::TvShows(page) => page.sync(records, generation),
      Page::Titles(page) => page.sync(records, generation),
      Page::Title(page) => page.sync(records),
      Page::Account | Page::PrivacyPolicy | Page::NotFound(_) => {}
    }
  }

  pub fn shelves_mut(&mut self) -> Vec<&mut Shelf> {
    match self {
      Page::Home(page) | Page::Movies(page) => page.shelves.iter_mut().collect(),
      Page::TvShows(page) => vec![&mut page.grid],
      Page::Titles(page) => vec![&mut page.grid],
      _ => Vec::new(),
    }
  }

  /// Grow the shelf whose sentinel came into view. Returns `true` if anything was appended.
  pub fn on_sentinel(&mut self, id: SentinelId) -> bool {
    self.shelves_mut().into_iter().find(|s| s.sentinel() == id).is_some_and(Shelf::load_more)
  }

  pub fn poster_slot_mut(&mut self) -> Option<&mut PosterSlot> {
    match self {
      Page::Home(page) | Page::Movies(page) => {
        page.hero.as_mut().and_then(|h| h.banner.as_mut().ok()).map(|b| &mut b.poster)
      }
      Page::Title(page) => page.poster.as_mut(),
      _ => None,
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent, records: &[Record]) -> PageAction {
    match self {
      Page::Home(page) | Page::Movies(page) => page.handle_key(key, records),
      Page::TvShows(page) => page.handle_key(key, records),
      Page::Titles(page) => grid_key(&mut page.grid, key, records),
      _ => PageAction::None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use ratatui::crossterm::event::{KeyEventKind, KeyModifiers};
  use crate::viewport::sentinel_visible;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
  }

  fn record(title: &str, kind: &str, genres: &[&str]) -> Record {
    let mut r = Record { title: title.to_string(), kind: kind.to_string(), ..Default::default() };
    for g in &constants().genres {
      let flag = if genres.contains(&g.as_str()) { "1" } else { "0" };
      r.flags.insert(g.clone(), flag.to_string());
    }
    r
  }

  fn catalog(n: usize) -> Vec<Record> {
    (0..n)
      .map(|i| {
        let kind = if i % 2 == 0 { "TV Show" } else { "Movie" };
        let genre = if i % 3 == 0 { "TV Action" } else { "TV Dramas" };
        record(&format!("Title {i:03}"), kind, &[genre])
      })
      .collect()
  }

  // --- Shelf ---

  #[test]
  fn shelf_starts_with_one_chunk() {
    let observer = IntersectionObserver::new();
    let mut shelf = Shelf::new("Row", 4, &observer);
    shelf.set_items((0..10).collect(), ListKey { generation: 1, filter: RecordFilter::All });
    assert_eq!(shelf.visible(), &[0, 1, 2, 3]);
    assert!(shelf.load_more());
    assert!(shelf.load_more());
    assert!(!shelf.load_more());
    assert_eq!(shelf.visible().len(), 10);
    assert!(shelf.is_exhausted());
  }

  #[test]
  fn shelf_resets_selection_on_new_key() {
    let observer = IntersectionObserver::new();
    let mut shelf = Shelf::new("Row", 4, &observer);
    shelf.set_items((0..10).collect(), ListKey { generation: 1, filter: RecordFilter::All });
    shelf.load_more();
    shelf.move_by(6);
    shelf.offset = 3;
    shelf.set_items((0..10).collect(), ListKey { generation: 2, filter: RecordFilter::All });
    assert_eq!(shelf.selected, 0);
    assert_eq!(shelf.offset, 0);
    assert_eq!(shelf.visible().len(), 4);
  }

  #[test]
  fn move_by_clamps_to_window() {
    let observer = IntersectionObserver::new();
    let mut shelf = Shelf::new("Row", 5, &observer);
    shelf.set_items((0..20).collect(), ListKey { generation: 1, filter: RecordFilter::All });
    shelf.move_by(100);
    assert_eq!(shelf.selected, 4);
    shelf.move_by(-100);
    assert_eq!(shelf.selected, 0);
  }

  #[test]
  fn scroll_follows_selection() {
    let observer = IntersectionObserver::new();
    let mut shelf = Shelf::new("Row", 20, &observer);
    shelf.set_items((0..20).collect(), ListKey { generation: 1, filter: RecordFilter::All });
    shelf.move_by(7);
    shelf.scroll_to_selection(5, 1);
    assert_eq!(shelf.offset, 3);
    shelf.move_by(-7);
    shelf.scroll_to_selection(5, 1);
    assert_eq!(shelf.offset, 0);
  }

  #[test]
  fn row_end_keeps_sentinel_in_view() {
    let observer = IntersectionObserver::new();
    let mut shelf = Shelf::new("Row", 20, &observer);
    shelf.set_items((0..200).collect(), ListKey { generation: 1, filter: RecordFilter::All });
    shelf.move_by(100);
    shelf.scroll_to_selection(5, 1);
    assert_eq!(shelf.selected, 19);
    assert_eq!(shelf.offset, 16);
    assert!(sentinel_visible(shelf.offset, 5, shelf.sentinel_unit()));
  }

  #[test]
  fn grid_end_keeps_sentinel_line_in_view() {
    let observer = IntersectionObserver::new();
    let mut shelf = Shelf::new("Grid", 100, &observer);
    shelf.set_items((0..400).collect(), ListKey { generation: 1, filter: RecordFilter::All });
    shelf.move_by(99);
    shelf.scroll_to_selection(6, 4);
    assert_eq!(shelf.sentinel_unit(), 25);
    assert_eq!(shelf.offset, 20);
    assert!(sentinel_visible(shelf.offset, 6, shelf.sentinel_unit()));
  }

  #[test]
  fn exhausted_row_does_not_reserve_sentinel() {
    let observer = IntersectionObserver::new();
    let mut shelf = Shelf::new("Row", 20, &observer);
    shelf.set_items((0..20).collect(), ListKey { generation: 1, filter: RecordFilter::All });
    shelf.move_by(100);
    shelf.scroll_to_selection(5, 1);
    assert_eq!(shelf.offset, 15);
  }

  #[test]
  fn grid_sentinel_is_measured_in_lines() {
    let observer = IntersectionObserver::new();
    let mut shelf = Shelf::new("Grid", 12, &observer);
    shelf.set_items((0..40).collect(), ListKey { generation: 1, filter: RecordFilter::All });
    shelf.scroll_to_selection(3, 4);
    assert_eq!(shelf.sentinel_unit(), 3);
  }

  // --- Page lifecycle ---

  #[test]
  fn dropping_page_releases_sentinels() {
    let observer = IntersectionObserver::new();
    let page = Page::mount(&Route::Home, &observer);
    assert_eq!(observer.observed_count(), constants().home_sections.len());
    drop(page);
    assert_eq!(observer.observed_count(), 0);
  }

  #[test]
  fn on_sentinel_grows_matching_shelf_only() {
    let observer = IntersectionObserver::new();
    let records = catalog(250);
    let mut page = Page::mount(&Route::Titles, &observer);
    page.sync(&records, 1);
    let id = page.shelves_mut()[0].sentinel();
    let chunk = constants().titles_chunk_size;
    assert_eq!(page.shelves_mut()[0].visible().len(), chunk);

    let other = observer.observe();
    assert!(!page.on_sentinel(other.id()));
    assert_eq!(page.shelves_mut()[0].visible().len(), chunk);

    assert!(page.on_sentinel(id));
    assert_eq!(page.shelves_mut()[0].visible().len(), (2 * chunk).min(250));
  }

  #[test]
  fn home_hero_missing_title_is_an_error_not_a_panic() {
    let observer = IntersectionObserver::new();
    let mut page = Page::mount(&Route::Home, &observer);
    page.sync(&catalog(5), 1);
    let Page::Home(home) = &page else { panic!("expected home") };
    let hero = home.hero.as_ref().unwrap();
    assert!(matches!(hero.banner, Err(CatalogError::TitleNotFound(_))));
  }

  #[test]
  fn movies_hero_found_case_insensitively() {
    let observer = IntersectionObserver::new();
    let mut records = catalog(5);
    records.push(record(&constants().movies_hero.to_uppercase(), "Movie", &["Dramas"]));
    let mut page = Page::mount(&Route::Movies, &observer);
    page.sync(&records, 1);
    let Page::Movies(movies) = &page else { panic!("expected movies") };
    let banner = movies.hero.as_ref().unwrap().banner.as_ref().unwrap();
    assert_eq!(banner.record.title, constants().movies_hero.to_uppercase());
    assert_eq!(banner.genres, vec!["Dramas"]);
    assert!(page_poster_unrequested(&mut page));
  }

  fn page_poster_unrequested(page: &mut Page) -> bool {
    page.poster_slot_mut().is_some_and(|slot| !slot.requested)
  }

  #[test]
  fn empty_catalog_has_no_hero() {
    let observer = IntersectionObserver::new();
    let mut page = Page::mount(&Route::Home, &observer);
    page.sync(&[], 1);
    let Page::Home(home) = &page else { panic!("expected home") };
    assert!(home.hero.is_none());
  }

  // --- TV shows ---

  #[test]
  fn tv_page_defaults_to_configured_genre() {
    let observer = IntersectionObserver::new();
    let records = catalog(200);
    let mut page = Page::mount(&Route::TvShows, &observer);
    page.sync(&records, 1);
    let Page::TvShows(tv) = &page else { panic!("expected tv") };
    assert_eq!(tv.selected_genre(), Some(constants().tv_default_genre.as_str()));
    assert!(tv.grid.visible().iter().all(|&i| records[i].is_kind(KIND_TV_SHOW)));
    assert!(tv.grid.visible().iter().all(|&i| records[i].has_genre("TV Action")));
  }

  #[test]
  fn genre_change_resets_window_to_first_chunk() {
    let observer = IntersectionObserver::new();
    let records = catalog(400);
    let mut page = Page::mount(&Route::TvShows, &observer);
    page.sync(&records, 1);
    let Page::TvShows(tv) = &mut page else { panic!("expected tv") };
    let chunk = constants().tv_chunk_size;

    tv.grid.load_more();
    tv.grid.move_by(10);
    tv.cycle_genre(1, &records);

    let genre = tv.selected_genre().unwrap().to_string();
    let expected: Vec<usize> = records
      .iter()
      .enumerate()
      .filter(|(_, r)| r.is_kind(KIND_TV_SHOW) && r.has_genre(&genre))
      .map(|(i, _)| i)
      .take(chunk)
      .collect();
    assert_eq!(tv.grid.visible(), expected.as_slice());
    assert_eq!(tv.grid.selected, 0);
  }

  #[test]
  fn tv_genres_wrap_with_brackets() {
    let observer = IntersectionObserver::new();
    let records = catalog(30);
    let mut page = Page::mount(&Route::TvShows, &observer);
    page.sync(&records, 1);
    page.handle_key(key(KeyCode::Char('[')), &records);
    page.handle_key(key(KeyCode::Char(']')), &records);
    let Page::TvShows(tv) = &page else { panic!("expected tv") };
    assert_eq!(tv.selected_genre(), Some("TV Action"));
  }

  // --- Keys ---

  #[test]
  fn enter_opens_selected_title() {
    let observer = IntersectionObserver::new();
    let records = catalog(10);
    let mut page = Page::mount(&Route::Titles, &observer);
    page.sync(&records, 1);
    page.handle_key(key(KeyCode::Right), &records);
    let action = page.handle_key(key(KeyCode::Enter), &records);
    assert_eq!(action, PageAction::Navigate("/movies/title-001".to_string()));
  }

  #[test]
  fn browse_focus_cycles_sections() {
    let observer = IntersectionObserver::new();
    let mut page = Page::mount(&Route::Home, &observer);
    page.sync(&catalog(10), 1);
    let count = constants().home_sections.len();
    for _ in 0..count {
      page.handle_key(key(KeyCode::Tab), &[]);
    }
    let Page::Home(home) = &page else { panic!("expected home") };
    assert_eq!(home.focus, 0);
  }

  #[test]
  fn title_page_resolves_slug() {
    let observer = IntersectionObserver::new();
    let records = catalog(10);
    let mut page = Page::mount(&Route::movie("title-003"), &observer);
    page.sync(&records, 1);
    let Page::Title(title) = &page else { panic!("expected title") };
    assert_eq!(title.record, Some(3));
    assert!(title.poster.is_some());
  }
}
