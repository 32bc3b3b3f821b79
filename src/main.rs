mod app;
mod catalog;
mod config;
mod constants;
mod input;
mod logging;
mod pages;
mod palette;
mod poster;
mod routes;
mod search;
mod session;
mod theme;
mod ui;
mod viewport;
mod window;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use app::{App, Launch};
use catalog::CatalogSource;
use config::Config;
use constants::constants;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Dataset path or http(s) URL (default: prefs, then the bundled name)
  #[arg(short, long)]
  dataset: Option<String>,

  /// JSON file with extra search entries, e.g. `User~~Name` records
  #[arg(short, long)]
  index: Option<PathBuf>,

  /// Route to open first, e.g. /movies or /tv-shows
  #[arg(short, long, default_value = "/")]
  route: String,

  /// Skip poster reachability checks
  #[arg(long)]
  offline: bool,

  /// Log filter used when NICHE_LOG is unset
  #[arg(long, default_value = "info")]
  log_level: String,

  /// Print shell completions and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), env!("CARGO_PKG_NAME"), &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = logging::init(&args.log_level)?;
  let launch = launch_from(args, Config::load())?;
  info!(source = %launch.source.label(), route = %launch.start, extra = launch.extra_entries.len(), "starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, launch);
  ratatui::restore();
  if let Err(e) = &result {
    error!(err = %format!("{e:#}"), "exited with error");
  }
  result
}

/// Merge CLI flags over saved prefs over built-in defaults.
fn launch_from(args: Args, config: Config) -> Result<Launch> {
  let dataset = args.dataset.or(config.dataset).unwrap_or_else(|| constants().dataset.clone());
  let extra_entries = match args.index.or(config.search_index) {
    Some(path) => search::load_extra_entries(&path)?,
    None => Vec::new(),
  };
  Ok(Launch {
    source: CatalogSource::parse(&dataset),
    start: args.route,
    extra_entries,
    theme_name: config.theme_name,
    probe_posters: !args.offline,
  })
}

fn run(terminal: &mut DefaultTerminal, launch: Launch) -> Result<()> {
  let mut app = App::new(launch);
  app.trigger_catalog_load();

  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;
    // Sentinels reported during this draw grow their lists before the next one.
    app.dispatch_intersections();

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  info!("exiting");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn args(extra: &[&str]) -> Args {
    Args::parse_from(std::iter::once("niche").chain(extra.iter().copied()))
  }

  #[test]
  fn cli_definition_is_valid() {
    Args::command().debug_assert();
  }

  #[test]
  fn cli_overrides_prefs() {
    let config = Config { dataset: Some("prefs.csv".to_string()), ..Default::default() };
    let launch = launch_from(args(&["--dataset", "https://example.com/t.csv", "--offline"]), config).unwrap();
    assert_eq!(launch.source, CatalogSource::Url("https://example.com/t.csv".to_string()));
    assert!(!launch.probe_posters);
    assert_eq!(launch.start, "/");
  }

  #[test]
  fn prefs_override_defaults() {
    let config = Config { dataset: Some("prefs.csv".to_string()), theme_name: Some("Mono".into()), ..Default::default() };
    let launch = launch_from(args(&["--route", "/movies"]), config).unwrap();
    assert_eq!(launch.source, CatalogSource::Path(PathBuf::from("prefs.csv")));
    assert_eq!(launch.theme_name.as_deref(), Some("Mono"));
    assert_eq!(launch.start, "/movies");
  }

  #[test]
  fn defaults_to_bundled_dataset_name() {
    let launch = launch_from(args(&[]), Config::default()).unwrap();
    assert_eq!(launch.source, CatalogSource::Path(PathBuf::from(&constants().dataset)));
    assert!(launch.extra_entries.is_empty());
  }

  #[test]
  fn loads_extra_entries_from_index_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"title": "User~~Jane Doe", "path": "/account", "data": {{"name": "Jane Doe"}}}}]"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let launch = launch_from(args(&["--index", &path]), Config::default()).unwrap();
    assert_eq!(launch.extra_entries.len(), 1);
    assert_eq!(launch.extra_entries[0].display_name(), "Jane Doe");
  }

  #[test]
  fn missing_index_file_is_an_error() {
    let result = launch_from(args(&["--index", "/nonexistent/entries.json"]), Config::default());
    assert!(result.is_err());
  }
}
