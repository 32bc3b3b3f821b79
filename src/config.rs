use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

const APP_NAME: &str = "niche";
const PREFS_FILE: &str = "prefs.toml";

/// User preferences persisted between runs.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub theme_name: Option<String>,
  /// Dataset path or URL.
  pub dataset: Option<String>,
  /// JSON file with extra search entries.
  pub search_index: Option<PathBuf>,
}

pub fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", APP_NAME)
}

impl Config {
  pub fn load() -> Self {
    match project_dirs() {
      Some(dirs) => Self::load_from(&dirs.config_dir().join(PREFS_FILE)),
      None => Self::default(),
    }
  }

  pub fn save(&self) {
    if let Some(dirs) = project_dirs() {
      self.save_to(&dirs.config_dir().join(PREFS_FILE));
    }
  }

  fn load_from(path: &std::path::Path) -> Self {
    if let Ok(content) = std::fs::read_to_string(path) {
      match toml::from_str(&content) {
        Ok(config) => return config,
        Err(e) => warn!(path = %path.display(), err = %e, "config: ignoring malformed prefs"),
      }
    }
    Self::default()
  }

  fn save_to(&self, path: &std::path::Path) {
    if let Some(dir) = path.parent()
      && std::fs::create_dir_all(dir).is_ok()
      && let Ok(content) = toml::to_string(self)
      && let Err(e) = std::fs::write(path, content)
    {
      warn!(path = %path.display(), err = %e, "config: failed to save prefs");
    }
  }
}
