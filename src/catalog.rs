//! Title catalog: CSV loading, ordering and lookups.
//!
//! The dataset is a flat CSV with a header row. A handful of columns are
//! known fields; every other column is kept verbatim as a flag (genre flags
//! are the `"0"`/`"1"` columns). Rows without a title are dropped and the rest
//! are sorted by title with [`locale_cmp`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

pub const KIND_MOVIE: &str = "Movie";
pub const KIND_TV_SHOW: &str = "TV Show";

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("failed to read dataset: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to fetch dataset: {0}")]
  Http(#[from] reqwest::Error),
  #[error("failed to parse dataset: {0}")]
  Csv(#[from] csv::Error),
  #[error("title \"{0}\" not found")]
  TitleNotFound(String),
}

/// One row of the dataset. Every field is the raw string from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
  pub show_id: String,
  #[serde(rename = "type")]
  pub kind: String,
  pub title: String,
  pub director: String,
  pub cast: String,
  pub country: String,
  pub release_year: String,
  pub rating: String,
  pub duration: String,
  pub description: String,
  pub random_rating: String,
  /// Remaining columns in header order.
  #[serde(flatten)]
  pub flags: IndexMap<String, String>,
}

impl Record {
  fn set_field(&mut self, column: &str, value: &str) {
    let value = value.to_string();
    match column {
      "show_id" => self.show_id = value,
      "type" => self.kind = value,
      "title" => self.title = value,
      "director" => self.director = value,
      "cast" => self.cast = value,
      "country" => self.country = value,
      "release_year" => self.release_year = value,
      "rating" => self.rating = value,
      "duration" => self.duration = value,
      "description" => self.description = value,
      "random_rating" => self.random_rating = value,
      _ => {
        self.flags.insert(column.to_string(), value);
      }
    }
  }

  pub fn has_genre(&self, genre: &str) -> bool {
    self.flags.get(genre).is_some_and(|v| v == "1")
  }

  pub fn is_kind(&self, kind: &str) -> bool {
    self.kind == kind
  }

  /// Genres flagged `"1"` on this record, restricted to `known`, in header order.
  pub fn active_genres<'a>(&'a self, known: &[String]) -> Vec<&'a str> {
    self
      .flags
      .iter()
      .filter(|(key, value)| *value == "1" && known.iter().any(|g| g == *key))
      .map(|(key, _)| key.as_str())
      .collect()
  }

  /// Full and empty star counts out of five, parsed from `random_rating`.
  pub fn stars(&self) -> Option<(u8, u8)> {
    let digits: String = self.random_rating.trim().chars().take_while(char::is_ascii_digit).collect();
    let full: u64 = digits.parse().ok()?;
    let full = full.min(5) as u8;
    Some((full, 5 - full))
  }
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
  Path(PathBuf),
  Url(String),
}

impl CatalogSource {
  pub fn parse(s: &str) -> Self {
    let s = s.trim();
    if s.starts_with("http://") || s.starts_with("https://") {
      CatalogSource::Url(s.to_string())
    } else {
      CatalogSource::Path(PathBuf::from(s))
    }
  }

  pub fn label(&self) -> String {
    match self {
      CatalogSource::Path(p) => p.display().to_string(),
      CatalogSource::Url(u) => u.clone(),
    }
  }
}

/// Row predicate used by browse sections.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum RecordFilter {
  All,
  Kind(String),
  Genre(String),
  /// Exact case-insensitive title list.
  Titles(Vec<String>),
}

impl RecordFilter {
  pub fn matches(&self, record: &Record) -> bool {
    match self {
      RecordFilter::All => true,
      RecordFilter::Kind(kind) => record.is_kind(kind),
      RecordFilter::Genre(genre) => record.has_genre(genre),
      RecordFilter::Titles(titles) => title_in(record, titles),
    }
  }

  /// Indices of the matching records, preserving catalog order.
  pub fn apply(&self, records: &[Record]) -> Vec<usize> {
    records.iter().enumerate().filter(|(_, r)| self.matches(r)).map(|(i, _)| i).collect()
  }
}

fn title_in(record: &Record, titles: &[String]) -> bool {
  let title = record.title.to_lowercase();
  titles.iter().any(|t| t.to_lowercase() == title)
}

// --- Parsing ---

/// Parse CSV text into records: header mapping, blank titles dropped, sorted by title.
pub fn parse_catalog(text: &str) -> Result<Vec<Record>, CatalogError> {
  let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());
  let headers = reader.headers()?.clone();

  let mut records = Vec::new();
  let mut dropped = 0usize;
  for row in reader.records() {
    let row = row?;
    if row.iter().all(|field| field.trim().is_empty()) {
      continue;
    }
    let mut record = Record::default();
    for (column, value) in headers.iter().zip(row.iter()) {
      record.set_field(column.trim(), value);
    }
    if record.title.trim().is_empty() {
      dropped += 1;
      continue;
    }
    records.push(record);
  }

  records.sort_by(|a, b| locale_cmp(&a.title, &b.title));
  debug!(kept = records.len(), dropped, "catalog: parsed rows");
  Ok(records)
}

/// Decode dataset bytes, replacing invalid UTF-8 so a bad byte only affects its own row.
fn decode_lossy(bytes: Vec<u8>) -> String {
  match String::from_utf8(bytes) {
    Ok(text) => text,
    Err(e) => {
      warn!(at = e.utf8_error().valid_up_to(), "catalog: invalid UTF-8 replaced");
      String::from_utf8_lossy(e.as_bytes()).into_owned()
    }
  }
}

/// Read or fetch the dataset once and parse it.
pub async fn load_catalog(client: &reqwest::Client, source: &CatalogSource) -> Result<Vec<Record>, CatalogError> {
  let text = match source {
    CatalogSource::Path(path) => decode_lossy(tokio::fs::read(path).await?),
    CatalogSource::Url(url) => client.get(url).send().await?.error_for_status()?.text().await?,
  };
  let records = parse_catalog(&text)?;
  info!(source = %source.label(), count = records.len(), "catalog: loaded");
  Ok(records)
}

// --- Ordering ---

/// Case-folded text with combining marks removed after canonical decomposition.
fn primary_key(s: &str) -> String {
  s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

/// Locale-style title ordering.
///
/// Primary: case-folded text with diacritics stripped to their base letter.
/// Then lowercase before uppercase at the first case difference, then raw text.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
  primary_key(a).cmp(&primary_key(b)).then_with(|| case_cmp(a, b)).then_with(|| a.cmp(b))
}

fn case_cmp(a: &str, b: &str) -> Ordering {
  for (x, y) in a.chars().zip(b.chars()) {
    match (x.is_uppercase(), y.is_uppercase()) {
      (false, true) => return Ordering::Less,
      (true, false) => return Ordering::Greater,
      _ => {}
    }
  }
  Ordering::Equal
}

// --- Lookups ---

/// Exact, case-insensitive title lookup.
pub fn find_title<'a>(records: &'a [Record], title: &str) -> Result<&'a Record, CatalogError> {
  find_title_index(records, title).map(|i| &records[i])
}

fn find_title_index(records: &[Record], title: &str) -> Result<usize, CatalogError> {
  let needle = title.to_lowercase();
  records
    .iter()
    .position(|r| r.title.to_lowercase() == needle)
    .ok_or_else(|| CatalogError::TitleNotFound(title.to_string()))
}

/// Distinct active genres across `records`, sorted.
pub fn all_genres<'a>(records: impl IntoIterator<Item = &'a Record>, known: &[String]) -> Vec<String> {
  let mut genres: Vec<String> = Vec::new();
  for record in records {
    for genre in record.active_genres(known) {
      if !genres.iter().any(|g| g == genre) {
        genres.push(genre.to_string());
      }
    }
  }
  genres.sort_by(|a, b| locale_cmp(a, b));
  genres
}

/// URL-safe identifier for a title: lowercase alphanumerics joined by `-`.
pub fn slug(title: &str) -> String {
  let mut out = String::with_capacity(title.len());
  let mut pending_dash = false;
  for c in title.chars().flat_map(char::to_lowercase) {
    if c.is_alphanumeric() {
      if pending_dash && !out.is_empty() {
        out.push('-');
      }
      pending_dash = false;
      out.push(c);
    } else {
      pending_dash = true;
    }
  }
  out
}

pub fn find_by_slug<'a>(records: &'a [Record], wanted: &str) -> Option<(usize, &'a Record)> {
  records.iter().enumerate().find(|(_, r)| slug(&r.title) == wanted)
}
