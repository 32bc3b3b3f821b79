//! Catalog constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded with `include_str!`, so there is no file I/O at
//! runtime. It is parsed once, on first access.

use serde::Deserialize;
use std::sync::LazyLock;

use crate::catalog::RecordFilter;

/// A horizontal row on a browse page.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
  pub title: String,
  pub filter: RecordFilter,
}

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// Dataset used when neither the CLI nor prefs name one.
  pub dataset: String,

  // Poster assets
  pub poster_cdn: String,
  pub poster_fallback: String,

  // Window growth per sentinel hit
  pub row_chunk_size: usize,
  pub tv_chunk_size: usize,
  pub titles_chunk_size: usize,

  // Browse pages
  pub home_hero: String,
  pub movies_hero: String,
  pub tv_default_genre: String,
  pub home_sections: Vec<SectionSpec>,
  pub movies_sections: Vec<SectionSpec>,

  /// Flag columns treated as genres.
  pub genres: Vec<String>,

  // Fuzzy search
  pub search_threshold: f64,
  pub search_distance: usize,

  pub error_ttl_secs: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
