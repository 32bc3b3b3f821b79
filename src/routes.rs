use tracing::debug;

/// Which browse page a title detail route hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
  Movie,
  TvShow,
}

impl TitleKind {
  fn segment(self) -> &'static str {
    match self {
      TitleKind::Movie => "movies",
      TitleKind::TvShow => "tv-shows",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Home,
  Movies,
  TvShows,
  Titles,
  Account,
  PrivacyPolicy,
  Title { kind: TitleKind, slug: String },
  NotFound(String),
}

impl Route {
  /// Routes shown as header tabs, in number-key order.
  pub const TABS: [Route; 6] =
    [Route::Home, Route::Movies, Route::TvShows, Route::Titles, Route::Account, Route::PrivacyPolicy];

  pub fn movie(slug: impl Into<String>) -> Self {
    Route::Title { kind: TitleKind::Movie, slug: slug.into() }
  }

  pub fn tv_show(slug: impl Into<String>) -> Self {
    Route::Title { kind: TitleKind::TvShow, slug: slug.into() }
  }

  /// Parse a path. Query strings, fragments and trailing slashes are ignored.
  pub fn parse(path: &str) -> Self {
    let trimmed = path.trim();
    let bare = trimmed.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = bare.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
      [] => Route::Home,
      ["movies"] => Route::Movies,
      ["tv-shows"] => Route::TvShows,
      ["titles"] => Route::Titles,
      ["account"] | ["profile"] => Route::Account,
      ["privacy-policy"] => Route::PrivacyPolicy,
      ["movies", slug] => Route::movie(*slug),
      ["tv-shows", slug] => Route::tv_show(*slug),
      _ => Route::NotFound(trimmed.to_string()),
    }
  }

  pub fn path(&self) -> String {
    match self {
      Route::Home => "/".to_string(),
      Route::Movies => "/movies".to_string(),
      Route::TvShows => "/tv-shows".to_string(),
      Route::Titles => "/titles".to_string(),
      Route::Account => "/account".to_string(),
      Route::PrivacyPolicy => "/privacy-policy".to_string(),
      Route::Title { kind, slug } => format!("/{}/{}", kind.segment(), slug),
      Route::NotFound(path) => path.clone(),
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Route::Home => "Home",
      Route::Movies => "Movies",
      Route::TvShows => "TV Shows",
      Route::Titles => "All Titles",
      Route::Account => "Account",
      Route::PrivacyPolicy => "Privacy",
      Route::Title { .. } => "Title",
      Route::NotFound(_) => "Not Found",
    }
  }
}

/// Current route plus a back stack.
#[derive(Debug)]
pub struct Router {
  current: Route,
  history: Vec<Route>,
}

impl Router {
  pub fn new(start: Route) -> Self {
    Self { current: start, history: Vec::new() }
  }

  pub fn current(&self) -> &Route {
    &self.current
  }

  /// Go to `path`. Navigating to the current route does not grow the history.
  pub fn navigate(&mut self, path: &str) -> &Route {
    let next = Route::parse(path);
    if next != self.current {
      debug!(from = %self.current.path(), to = %next.path(), "router: navigate");
      let prev = std::mem::replace(&mut self.current, next);
      self.history.push(prev);
    }
    &self.current
  }

  /// Pop the back stack. Returns `false` when there is nowhere to go.
  pub fn back(&mut self) -> bool {
    match self.history.pop() {
      Some(prev) => {
        self.current = prev;
        true
      }
      None => false,
    }
  }

  pub fn can_go_back(&self) -> bool {
    !self.history.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- Route::parse ---

  #[test]
  fn parses_static_routes() {
    assert_eq!(Route::parse("/"), Route::Home);
    assert_eq!(Route::parse(""), Route::Home);
    assert_eq!(Route::parse("/movies"), Route::Movies);
    assert_eq!(Route::parse("/movies/"), Route::Movies);
    assert_eq!(Route::parse("/tv-shows?genre=x"), Route::TvShows);
    assert_eq!(Route::parse("/titles#top"), Route::Titles);
    assert_eq!(Route::parse("/privacy-policy"), Route::PrivacyPolicy);
  }

  #[test]
  fn profile_is_account_alias() {
    assert_eq!(Route::parse("/profile"), Route::Account);
    assert_eq!(Route::parse("/account"), Route::Account);
  }

  #[test]
  fn parses_title_routes() {
    assert_eq!(Route::parse("/movies/inception"), Route::movie("inception"));
    assert_eq!(Route::parse("/tv-shows/all-american"), Route::tv_show("all-american"));
  }

  #[test]
  fn unknown_paths_are_not_found() {
    assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".to_string()));
    assert_eq!(Route::parse("/movies/a/b"), Route::NotFound("/movies/a/b".to_string()));
  }

  #[test]
  fn path_round_trips_for_tabs() {
    for route in Route::TABS {
      assert_eq!(Route::parse(&route.path()), route);
    }
    assert_eq!(Route::movie("inception").path(), "/movies/inception");
  }

  // --- Router ---

  #[test]
  fn navigate_and_back() {
    let mut router = Router::new(Route::Home);
    assert!(!router.can_go_back());
    router.navigate("/movies");
    router.navigate("/account");
    assert_eq!(router.current(), &Route::Account);
    assert!(router.back());
    assert_eq!(router.current(), &Route::Movies);
    assert!(router.back());
    assert_eq!(router.current(), &Route::Home);
    assert!(!router.back());
  }

  #[test]
  fn navigating_to_current_route_keeps_history() {
    let mut router = Router::new(Route::Home);
    router.navigate("/");
    assert!(!router.can_go_back());
  }
}
