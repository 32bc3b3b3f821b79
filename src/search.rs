//! Fuzzy search index behind the Ctrl+K overlay.
//!
//! Entries are matched by approximate substring distance: the score of a key
//! is `errors / query_len + start / distance`, where `errors` is the fewest
//! edits turning the query into some substring of the key and `start` is
//! where that substring begins. `0.0` is an exact match at the start of the
//! key; entries scoring above the threshold are dropped. Match highlighting
//! uses nucleo's fuzzy indices over the displayed title.

use anyhow::{Context, Result};
use nucleo::{
  Matcher, Utf32Str,
  pattern::{Atom, AtomKind, CaseMatching, Normalization},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::{KIND_TV_SHOW, Record, slug};
use crate::routes::Route;

/// Separator in compound titles such as `"User~~Jane Doe"`.
pub const COMPOUND_DELIMITER: &str = "~~";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
  pub title: String,
  pub path: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub keywords: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<serde_json::Value>,
}

/// The two halves of a `"kind~~name"` title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundTitle<'a> {
  pub kind: &'a str,
  pub name: &'a str,
}

impl SearchEntry {
  pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
    Self { title: title.into(), path: path.into(), keywords: Vec::new(), data: None }
  }

  pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.keywords = keywords.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_data(mut self, data: serde_json::Value) -> Self {
    self.data = Some(data);
    self
  }

  pub fn compound(&self) -> Option<CompoundTitle<'_>> {
    self.title.split_once(COMPOUND_DELIMITER).map(|(kind, name)| CompoundTitle { kind, name })
  }

  /// Title with the compound delimiter replaced by a space.
  pub fn display_title(&self) -> String {
    self.title.replace(COMPOUND_DELIMITER, " ")
  }

  /// The name half of a compound title, or the whole title.
  pub fn display_name(&self) -> &str {
    self.compound().map_or(self.title.as_str(), |c| c.name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
  /// Highest accepted score, `0.0` = exact.
  pub threshold: f64,
  /// How many characters into a key a match may start before it costs a full error.
  pub distance: usize,
}

impl Default for SearchOptions {
  fn default() -> Self {
    Self { threshold: 0.3, distance: 100 }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
  /// Index into the entry list.
  pub entry: usize,
  pub score: f64,
  /// Char indices of `display_name()` to highlight.
  pub highlight: Vec<u32>,
}

/// Immutable search index over a fixed entry list.
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
  entries: Vec<SearchEntry>,
  /// Lowercased title followed by lowercased keywords, per entry.
  keys: Vec<Vec<Vec<char>>>,
  options: SearchOptions,
}

impl FuzzyIndex {
  pub fn new(entries: Vec<SearchEntry>, options: SearchOptions) -> Self {
    let keys = entries
      .iter()
      .map(|e| std::iter::once(&e.title).chain(e.keywords.iter()).map(|k| lowercase_chars(k)).collect())
      .collect();
    Self { entries, keys, options }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entry(&self, idx: usize) -> Option<&SearchEntry> {
    self.entries.get(idx)
  }

  /// Ranked matches for `query`, best first. A blank query matches nothing.
  pub fn search(&self, query: &str) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
      return Vec::new();
    }
    let pattern = lowercase_chars(query);

    let mut hits: Vec<SearchHit> = self
      .keys
      .iter()
      .enumerate()
      .filter_map(|(i, keys)| {
        let score = keys
          .iter()
          .filter_map(|key| key_score(&pattern, key, self.options.distance))
          .fold(f64::INFINITY, f64::min);
        (score <= self.options.threshold).then_some(SearchHit { entry: i, score, highlight: Vec::new() })
      })
      .collect();
    hits.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.entry.cmp(&b.entry)));

    let atom = Atom::new(query, CaseMatching::Ignore, Normalization::Smart, AtomKind::Fuzzy, false);
    let mut matcher = Matcher::default();
    let mut buf = Vec::new();
    for hit in &mut hits {
      let haystack = Utf32Str::new(self.entries[hit.entry].display_name(), &mut buf);
      let mut indices = Vec::new();
      if atom.indices(haystack, &mut matcher, &mut indices).is_some() {
        indices.sort_unstable();
        indices.dedup();
        hit.highlight = indices;
      }
    }
    hits
  }
}

fn lowercase_chars(s: &str) -> Vec<char> {
  s.chars().flat_map(char::to_lowercase).collect()
}

fn proximity_score(errors: usize, start: usize, pattern_len: usize, distance: usize) -> f64 {
  let accuracy = errors as f64 / pattern_len as f64;
  if distance == 0 {
    return if start == 0 { accuracy } else { 1.0 };
  }
  accuracy + start as f64 / distance as f64
}

/// Best score of `pattern` against any substring of `text`, or `None` for an empty pattern.
fn key_score(pattern: &[char], text: &[char], distance: usize) -> Option<f64> {
  let m = pattern.len();
  if m == 0 {
    return None;
  }
  if let Some(start) = text.windows(m).position(|w| w == pattern) {
    return Some(proximity_score(0, start, m, distance));
  }

  // Column-wise edit distance where the match may begin anywhere in `text`.
  // cost[i] = fewest edits matching pattern[..i] ending at the current column,
  // start[i] = text position where that alignment begins.
  let mut cost: Vec<usize> = (0..=m).collect();
  let mut start: Vec<usize> = vec![0; m + 1];
  let mut best = proximity_score(cost[m], start[m], m, distance);

  for (j, &t) in text.iter().enumerate() {
    let mut diag = (cost[0], start[0]);
    cost[0] = 0;
    start[0] = j + 1;
    for i in 1..=m {
      let old = (cost[i], start[i]);
      let candidates = [
        (diag.0 + usize::from(pattern[i - 1] != t), diag.1),
        (old.0 + 1, old.1),
        (cost[i - 1] + 1, start[i - 1]),
      ];
      let (c, s) = candidates.into_iter().min().unwrap_or(old);
      cost[i] = c;
      start[i] = s;
      diag = old;
    }
    best = best.min(proximity_score(cost[m], start[m], m, distance));
  }
  Some(best)
}

// --- Entry sources ---

/// Static navigation entries.
pub fn route_entries() -> Vec<SearchEntry> {
  vec![
    SearchEntry::new("Home", Route::Home.path()).with_keywords(["browse", "start"]),
    SearchEntry::new("Movies", Route::Movies.path()).with_keywords(["films", "cinema"]),
    SearchEntry::new("TV Shows", Route::TvShows.path()).with_keywords(["series", "television"]),
    SearchEntry::new("All Titles", Route::Titles.path()).with_keywords(["catalog", "everything"]),
    SearchEntry::new("Account", Route::Account.path()).with_keywords(["profile", "settings", "user"]),
    SearchEntry::new("Privacy Policy", Route::PrivacyPolicy.path()).with_keywords(["privacy", "legal"]),
  ]
}

/// One entry per record, pointing at its detail route and carrying the record as payload.
pub fn catalog_entries(records: &[Record], known_genres: &[String]) -> Vec<SearchEntry> {
  records
    .iter()
    .map(|record| {
      let route = if record.is_kind(KIND_TV_SHOW) {
        Route::tv_show(slug(&record.title))
      } else {
        Route::movie(slug(&record.title))
      };
      let keywords = std::iter::once(record.director.as_str())
        .filter(|d| !d.trim().is_empty())
        .chain(record.active_genres(known_genres))
        .map(str::to_string);
      let entry = SearchEntry::new(record.title.clone(), route.path()).with_keywords(keywords);
      match serde_json::to_value(record) {
        Ok(data) => entry.with_data(data),
        Err(_) => entry,
      }
    })
    .collect()
}

/// Extra entries (for example `"User~~Jane Doe"` with a payload) from a JSON array file.
pub fn load_extra_entries(path: &Path) -> Result<Vec<SearchEntry>> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("Failed to read search entries from {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Invalid search entries in {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn index(entries: Vec<SearchEntry>) -> FuzzyIndex {
    FuzzyIndex::new(entries, SearchOptions::default())
  }

  fn titles(index: &FuzzyIndex, hits: &[SearchHit]) -> Vec<String> {
    hits.iter().map(|h| index.entry(h.entry).unwrap().title.clone()).collect()
  }

  // --- matching ---

  #[test]
  fn one_deletion_still_matches() {
    let idx = index(vec![SearchEntry::new("Inception", "/movies/inception")]);
    let hits = idx.search("incepton");
    assert_eq!(hits.len(), 1);
    assert_eq!(idx.entry(hits[0].entry).unwrap().path, "/movies/inception");
    assert!(hits[0].score <= 0.3);
  }

  #[test]
  fn unrelated_query_matches_nothing() {
    let idx = index(vec![SearchEntry::new("Inception", "/movies/inception")]);
    assert!(idx.search("zzzzz").is_empty());
  }

  #[test]
  fn blank_query_matches_nothing() {
    let idx = index(route_entries());
    assert!(idx.search("").is_empty());
    assert!(idx.search("   ").is_empty());
  }

  #[test]
  fn exact_prefix_scores_zero() {
    let idx = index(vec![SearchEntry::new("Inception", "/a")]);
    let hits = idx.search("INCEP");
    assert_eq!(hits[0].score, 0.0);
  }

  #[test]
  fn keywords_are_searched() {
    let idx = index(route_entries());
    let hits = idx.search("profile");
    assert_eq!(titles(&idx, &hits), vec!["Account"]);
  }

  #[test]
  fn ranks_by_score_then_entry_order() {
    let idx = index(vec![
      SearchEntry::new("The Matrix", "/a"),
      SearchEntry::new("Matrix", "/b"),
      SearchEntry::new("Matrix", "/c"),
    ]);
    let hits = idx.search("matrix");
    let paths: Vec<&str> = hits.iter().map(|h| idx.entry(h.entry).unwrap().path.as_str()).collect();
    assert_eq!(paths, vec!["/b", "/c", "/a"]);
  }

  #[test]
  fn far_matches_are_penalised() {
    let long = format!("{}needle", "x".repeat(40));
    let idx = index(vec![SearchEntry::new(long, "/far")]);
    assert!(idx.search("needle").is_empty());
  }

  #[test]
  fn substitution_within_tolerance() {
    let idx = index(vec![SearchEntry::new("Jaws", "/jaws"), SearchEntry::new("Lobster", "/lobster")]);
    assert_eq!(titles(&idx, &idx.search("lobstar")), vec!["Lobster"]);
  }

  #[test]
  fn compound_titles_are_searchable_by_name() {
    let idx = index(vec![SearchEntry::new("User~~Jane Doe", "/account")]);
    assert_eq!(idx.search("jane").len(), 1);
  }

  #[test]
  fn highlight_indices_on_display_name() {
    let idx = index(vec![SearchEntry::new("User~~Jane Doe", "/account")]);
    let hits = idx.search("jane");
    assert_eq!(hits[0].highlight, vec![0, 1, 2, 3]);
  }

  #[test]
  fn key_score_empty_pattern_is_none() {
    assert_eq!(key_score(&[], &['a'], 100), None);
  }

  // --- SearchEntry ---

  #[test]
  fn compound_parsing() {
    let entry = SearchEntry::new("License Plate~~ABC123", "/account");
    assert_eq!(entry.compound(), Some(CompoundTitle { kind: "License Plate", name: "ABC123" }));
    assert_eq!(entry.display_title(), "License Plate ABC123");
    assert_eq!(entry.display_name(), "ABC123");

    let plain = SearchEntry::new("Movies", "/movies");
    assert_eq!(plain.compound(), None);
    assert_eq!(plain.display_name(), "Movies");
  }

  #[test]
  fn entries_deserialize_with_defaults() {
    let json = r#"[{"title":"User~~Jane Doe","path":"/account","data":{"email":"jane@example.com"}},
                   {"title":"Movies","path":"/movies","keywords":["films"]}]"#;
    let entries: Vec<SearchEntry> = serde_json::from_str(json).unwrap();
    assert!(entries[0].keywords.is_empty());
    assert_eq!(entries[0].data.as_ref().unwrap()["email"], "jane@example.com");
    assert_eq!(entries[1].keywords, vec!["films"]);
    assert!(entries[1].data.is_none());
  }

  #[test]
  fn load_extra_entries_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    std::fs::write(&path, r#"[{"title":"User~~Jane Doe","path":"/account"}]"#).unwrap();
    let entries = load_extra_entries(&path).unwrap();
    assert_eq!(entries.len(), 1);

    std::fs::write(&path, "not json").unwrap();
    assert!(load_extra_entries(&path).is_err());
  }

  // --- entry sources ---

  #[test]
  fn catalog_entries_route_by_kind() {
    let records = vec![
      Record { title: "Inception".into(), kind: "Movie".into(), director: "C. Nolan".into(), ..Default::default() },
      Record { title: "All American".into(), kind: "TV Show".into(), ..Default::default() },
    ];
    let entries = catalog_entries(&records, &[]);
    assert_eq!(entries[0].path, "/movies/inception");
    assert_eq!(entries[0].keywords, vec!["C. Nolan"]);
    assert_eq!(entries[1].path, "/tv-shows/all-american");
    assert!(entries[1].keywords.is_empty());
    assert_eq!(entries[1].data.as_ref().unwrap()["title"], "All American");
  }

  #[test]
  fn route_entries_parse_as_known_routes() {
    for entry in route_entries() {
      assert!(!matches!(Route::parse(&entry.path), Route::NotFound(_)), "{}", entry.path);
    }
  }
}
