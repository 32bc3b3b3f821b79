use reqwest::Client;
use tracing::{debug, warn};

use crate::constants::constants;

/// Conventional poster location for a title on the CDN.
pub fn poster_url(title: &str) -> String {
  format!("{}{}.jpg", constants().poster_cdn, title)
}

/// A poster URL with a one-shot fallback.
///
/// The first failure swaps in the fallback and disarms; further failures are
/// ignored so a missing fallback can never cause repeated refetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poster {
  pub primary: String,
  pub fallback: String,
  current: String,
  armed: bool,
}

impl Poster {
  pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
    let primary = primary.into();
    Self { current: primary.clone(), primary, fallback: fallback.into(), armed: true }
  }

  pub fn for_title(title: &str) -> Self {
    Self::new(poster_url(title), constants().poster_fallback.clone())
  }

  pub fn current(&self) -> &str {
    &self.current
  }

  pub fn is_fallback(&self) -> bool {
    !self.armed
  }

  /// Handle a load failure. Returns the fallback the first time, `None` afterwards.
  pub fn fail(&mut self) -> Option<&str> {
    if !self.armed {
      return None;
    }
    self.armed = false;
    self.current = self.fallback.clone();
    Some(&self.current)
  }
}

async fn reachable(client: &Client, url: &str) -> bool {
  match client.get(url).send().await {
    Ok(response) => response.status().is_success(),
    Err(e) => {
      debug!(url = %url, err = %e, "poster: request failed");
      false
    }
  }
}

/// Check the poster once and fall back if it cannot be loaded.
pub async fn probe(client: &Client, mut poster: Poster) -> Poster {
  if !reachable(client, poster.current()).await && poster.fail().is_some() {
    warn!(primary = %poster.primary, "poster: using fallback");
  }
  poster
}
