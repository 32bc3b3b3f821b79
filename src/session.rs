//! Run-scoped key/value storage used to hand context between pages.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;

/// JSON payload of the user picked from search.
pub const INDIVIDUAL_USER_KEY: &str = "individualUser";
/// Plate number picked from search.
pub const PLATE_KEY: &str = "plate";

#[derive(Debug, Default, Clone)]
pub struct SessionStore {
  values: HashMap<String, String>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    let key = key.into();
    debug!(key = %key, "session: set");
    self.values.insert(key, value.into());
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.values.get(key).map(String::as_str)
  }

  pub fn remove(&mut self, key: &str) -> Option<String> {
    self.values.remove(key)
  }

  /// Parse a stored JSON value. Missing keys and invalid JSON both yield `None`.
  pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    self.get(key).and_then(|raw| serde_json::from_str(raw).ok())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_get_remove() {
    let mut session = SessionStore::new();
    assert_eq!(session.get(PLATE_KEY), None);
    session.set(PLATE_KEY, "ABC123");
    assert_eq!(session.get(PLATE_KEY), Some("ABC123"));
    session.set(PLATE_KEY, "XYZ9");
    assert_eq!(session.remove(PLATE_KEY).as_deref(), Some("XYZ9"));
    assert_eq!(session.get(PLATE_KEY), None);
  }

  #[test]
  fn json_values() {
    let mut session = SessionStore::new();
    session.set(INDIVIDUAL_USER_KEY, r#"{"email":"jane@example.com"}"#);
    let user: serde_json::Value = session.get_json(INDIVIDUAL_USER_KEY).unwrap();
    assert_eq!(user["email"], "jane@example.com");

    session.set("broken", "{");
    assert!(session.get_json::<serde_json::Value>("broken").is_none());
  }
}
