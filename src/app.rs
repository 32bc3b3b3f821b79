use ratatui::crossterm::event::KeyEvent;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::catalog::{CatalogError, CatalogSource, Record, load_catalog};
use crate::config::Config;
use crate::constants::constants;
use crate::pages::{Page, PageAction};
use crate::palette::{SearchOverlay, apply_selection};
use crate::poster::{Poster, probe};
use crate::routes::{Route, Router};
use crate::search::{FuzzyIndex, SearchEntry, SearchOptions, catalog_entries, route_entries};
use crate::session::{INDIVIDUAL_USER_KEY, PLATE_KEY, SessionStore};
use crate::theme::{THEMES, Theme, theme_index};
use crate::viewport::IntersectionObserver;

// --- Types ---

pub type CatalogResult = Result<Vec<Record>, CatalogError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
  Loading,
  Ready,
  Failed(String),
}

/// Everything `App::new` needs from the command line and prefs.
#[derive(Debug, Clone)]
pub struct Launch {
  pub source: CatalogSource,
  pub start: String,
  pub extra_entries: Vec<SearchEntry>,
  pub theme_name: Option<String>,
  /// Check poster URLs over the network and fall back when they fail.
  pub probe_posters: bool,
}

/// Background tasks whose results are polled each frame.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) catalog_rx: Option<oneshot::Receiver<CatalogResult>>,
  pub(crate) poster_rx: Option<oneshot::Receiver<Poster>>,
}

pub struct App {
  pub source: CatalogSource,
  pub catalog: CatalogStatus,
  /// Sorted catalog; empty until the first load completes.
  pub records: Vec<Record>,
  /// Bumped on every successful load so page windows restart.
  generation: u64,
  pub router: Router,
  pub page: Page,
  pub overlay: SearchOverlay,
  pub session: SessionStore,
  pub observer: IntersectionObserver,
  extra_entries: Vec<SearchEntry>,
  pub theme_index: usize,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  pub should_quit: bool,
  probe_posters: bool,
  client: Client,
  pub(crate) tasks: AsyncTasks,
  /// When the last error was set, for auto-dismiss.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(launch: Launch) -> Self {
    let theme_index = launch.theme_name.as_deref().and_then(theme_index).unwrap_or(0);
    let observer = IntersectionObserver::new();
    let router = Router::new(Route::parse(&launch.start));
    let page = Page::mount(router.current(), &observer);

    let mut app = Self {
      source: launch.source,
      catalog: CatalogStatus::Loading,
      records: Vec::new(),
      generation: 0,
      router,
      page,
      overlay: SearchOverlay::new(),
      session: SessionStore::new(),
      observer,
      extra_entries: launch.extra_entries,
      theme_index,
      last_error: None,
      status_message: None,
      should_quit: false,
      probe_posters: launch.probe_posters,
      client: Client::new(),
      tasks: AsyncTasks::default(),
      error_time: None,
    };
    // Routes and extra entries are searchable before the catalog arrives.
    app.rebuild_index();
    app
  }

  pub fn theme(&self) -> &'static Theme {
    // Safety: theme_index is bounded by modular arithmetic in next_theme()
    // and by theme_index() on initialization.
    &THEMES[self.theme_index]
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_ttl_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    let mut config = Config::load();
    config.theme_name = Some(self.theme().name.to_string());
    config.save();
  }

  // --- Catalog ---

  /// Start (or restart) loading the dataset in the background.
  pub fn trigger_catalog_load(&mut self) {
    info!(source = %self.source.label(), "catalog: load triggered");
    self.catalog = CatalogStatus::Loading;
    self.status_message = Some(format!("Loading {}…", self.source.label()));

    let client = self.client.clone();
    let source = self.source.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(load_catalog(&client, &source).await);
    });
    self.tasks.catalog_rx = Some(rx);
  }

  pub(crate) fn finish_catalog_load(&mut self, result: CatalogResult) {
    self.status_message = None;
    match result {
      Ok(records) => {
        info!(records = records.len(), generation = self.generation + 1, "catalog: ready");
        self.records = records;
        self.generation += 1;
        self.catalog = CatalogStatus::Ready;
        self.page.sync(&self.records, self.generation);
        self.rebuild_index();
        self.request_poster();
      }
      Err(e) => {
        // Pages keep rendering with empty sections.
        error!(source = %self.source.label(), err = %e, "catalog: load failed");
        self.catalog = CatalogStatus::Failed(e.to_string());
        self.set_error(format!("Failed to load catalog: {e}"));
      }
    }
  }

  fn rebuild_index(&mut self) {
    let mut entries = route_entries();
    entries.extend(self.extra_entries.iter().cloned());
    entries.extend(catalog_entries(&self.records, &constants().genres));
    let options =
      SearchOptions { threshold: constants().search_threshold, distance: constants().search_distance };
    self.overlay.set_index(FuzzyIndex::new(entries, options));
  }

  // --- Polling ---

  /// Drain finished background work. Called once per frame.
  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.catalog_rx.take() {
      match rx.try_recv() {
        Ok(result) => self.finish_catalog_load(result),
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.catalog_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.catalog = CatalogStatus::Failed("load task ended".to_string());
          self.set_error("Catalog task failed.".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.poster_rx.take() {
      match rx.try_recv() {
        Ok(poster) => {
          if let Some(slot) = self.page.poster_slot_mut()
            && slot.poster.primary == poster.primary
          {
            slot.poster = poster;
          }
          self.request_poster();
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.poster_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          warn!("poster: probe task ended without a result");
        }
      }
    }
  }

  /// Grow every list whose sentinel was reported visible during the last draw.
  pub fn dispatch_intersections(&mut self) {
    for id in self.observer.take_intersecting() {
      self.page.on_sentinel(id);
    }
  }

  fn request_poster(&mut self) {
    if !self.probe_posters || self.tasks.poster_rx.is_some() {
      return;
    }
    let Some(slot) = self.page.poster_slot_mut() else { return };
    if slot.requested {
      return;
    }
    slot.requested = true;
    let poster = slot.poster.clone();
    debug!(url = %poster.primary, "poster: probe");

    let client = self.client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(probe(&client, poster).await);
    });
    self.tasks.poster_rx = Some(rx);
  }

  // --- Navigation ---

  pub fn navigate(&mut self, path: &str) {
    let before = self.router.current().clone();
    if *self.router.navigate(path) != before {
      self.remount();
    }
  }

  pub fn go_back(&mut self) {
    if self.router.back() {
      self.remount();
    }
  }

  /// Tear down the current page and build the one for the current route.
  fn remount(&mut self) {
    let route = self.router.current();
    if let Route::NotFound(path) = route {
      warn!(path = %path, "router: no such route");
    }
    // The old page's sentinels unregister when it is dropped here.
    self.page = Page::mount(route, &self.observer);
    debug!(route = %route.path(), sentinels = self.observer.observed_count(), "page: mounted");
    if self.catalog == CatalogStatus::Ready {
      self.page.sync(&self.records, self.generation);
    }
    self.tasks.poster_rx = None;
    self.request_poster();
  }

  /// Apply the side effects of a palette selection, then follow its path.
  pub fn select_search_entry(&mut self, entry: SearchEntry) {
    let path = apply_selection(&entry, &mut self.session);
    self.overlay.close();
    self.navigate(&path);
  }

  /// Forget the profile and plate chosen through search.
  pub fn clear_profile(&mut self) {
    let user = self.session.remove(INDIVIDUAL_USER_KEY);
    let plate = self.session.remove(PLATE_KEY);
    if user.is_some() || plate.is_some() {
      info!("session: profile cleared");
    }
  }

  pub fn handle_page_key(&mut self, key: KeyEvent) {
    if let PageAction::Navigate(path) = self.page.handle_key(key, &self.records) {
      self.navigate(&path);
    }
  }
}
