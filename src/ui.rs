use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, CatalogStatus};
use crate::catalog::{KIND_MOVIE, KIND_TV_SHOW, Record};
use crate::constants::constants;
use crate::pages::{BrowsePage, Hero, Page, PosterSlot, Shelf, TitlePage, TvShowsPage};
use crate::routes::{Route, TitleKind};
use crate::search::{SearchEntry, SearchHit};
use crate::session::{INDIVIDUAL_USER_KEY, PLATE_KEY, SessionStore};
use crate::theme::Theme;
use crate::viewport::{IntersectionObserver, sentinel_visible};

const CARD_WIDTH: u16 = 24;
const CARD_HEIGHT: u16 = 4;
/// Section title line plus one row of cards.
const ROW_HEIGHT: u16 = CARD_HEIGHT + 1;
const HERO_HEIGHT: u16 = 7;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn star_spans(record: &Record, theme: &Theme) -> Vec<Span<'static>> {
  match record.stars() {
    Some((full, empty)) => vec![
      Span::styled("★".repeat(full as usize), Style::default().fg(theme.star)),
      Span::styled("☆".repeat(empty as usize), Style::default().fg(theme.star_empty)),
    ],
    None => Vec::new(),
  }
}

/// Split `text` into spans, styling the chars whose index is in `highlight`.
fn highlight_spans(text: &str, highlight: &[u32], base: Style, matched: Style) -> Vec<Span<'static>> {
  let mut spans = Vec::new();
  let mut run = String::new();
  let mut run_matched = false;
  for (i, c) in text.chars().enumerate() {
    let is_match = highlight.binary_search(&(i as u32)).is_ok();
    if is_match != run_matched && !run.is_empty() {
      spans.push(Span::styled(std::mem::take(&mut run), if run_matched { matched } else { base }));
    }
    run_matched = is_match;
    run.push(c);
  }
  if !run.is_empty() {
    spans.push(Span::styled(run, if run_matched { matched } else { base }));
  }
  spans
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
  let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
  let height = (u32::from(area.height) * u32::from(percent_y) / 100) as u16;
  Rect { x: area.x + (area.width - width) / 2, y: area.y + (area.height - height) / 2, width, height }
}

fn panel<'a>(title: impl Into<Line<'a>>, theme: &Theme) -> Block<'a> {
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1))
}

/// Shared read-only state for drawing a page.
struct PageView<'a> {
  records: &'a [Record],
  observer: &'a IntersectionObserver,
  session: &'a SessionStore,
  catalog: &'a CatalogStatus,
  theme: &'static Theme,
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, footer_area] =
    Layout::vertical([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
      .areas(frame.area());

  render_header(frame, app, header_area);
  let view =
    PageView { records: &app.records, observer: &app.observer, session: &app.session, catalog: &app.catalog, theme };
  render_page(frame, &mut app.page, &view, main_area);
  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);

  if app.overlay.is_open() {
    let area = frame.area();
    render_overlay(frame, app, area);
  }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let current = app.router.current();
  let active = match current {
    Route::Title { kind: TitleKind::Movie, .. } => Route::Movies,
    Route::Title { kind: TitleKind::TvShow, .. } => Route::TvShows,
    other => other.clone(),
  };

  let mut spans = vec![Span::styled(" ▶ niche ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))];
  for (i, route) in Route::TABS.iter().enumerate() {
    let label = format!(" {} {} ", i + 1, route.label());
    let style = if *route == active {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.muted)
    };
    spans.push(Span::styled(label, style));
  }
  frame.render_widget(Line::from(spans), area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_page(frame: &mut Frame, page: &mut Page, view: &PageView, area: Rect) {
  match page {
    Page::Home(page) | Page::Movies(page) => render_browse(frame, page, view, area),
    Page::TvShows(page) => render_tv_shows(frame, page, view, area),
    Page::Titles(page) => {
      let heading = format!(" All Titles ({}) ", page.grid.total());
      render_grid(frame, &mut page.grid, view, area, heading);
    }
    Page::Title(page) => render_title(frame, page, view, area),
    Page::Account => render_account(frame, view, area),
    Page::PrivacyPolicy => render_privacy(frame, view.theme, area),
    Page::NotFound(path) => render_not_found(frame, path, view.theme, area),
  }
}

// --- Browse pages ---

fn render_browse(frame: &mut Frame, page: &mut BrowsePage, view: &PageView, area: Rect) {
  let hero_h = if page.hero.is_some() { HERO_HEIGHT } else { 0 };
  let chips_h = if page.genres.is_empty() { 0 } else { 1 };
  let [hero_area, chips_area, rows_area] =
    Layout::vertical([Constraint::Length(hero_h), Constraint::Length(chips_h), Constraint::Min(0)]).areas(area);

  if let Some(hero) = &page.hero {
    render_hero(frame, hero, view, hero_area);
  }
  if !page.genres.is_empty() {
    render_chips(frame, &page.genres, view.theme, chips_area);
  }

  let fits = (rows_area.height / ROW_HEIGHT).max(1) as usize;
  let first = page.focus.saturating_sub(fits - 1);
  let focus = page.focus;
  for (i, shelf) in page.shelves.iter_mut().enumerate() {
    match i.checked_sub(first).filter(|slot| *slot < fits) {
      Some(slot) => {
        let y = rows_area.y + slot as u16 * ROW_HEIGHT;
        let height = ROW_HEIGHT.min(rows_area.bottom().saturating_sub(y));
        render_row(frame, shelf, i == focus, view, Rect { y, height, ..rows_area });
      }
      None => view.observer.report(shelf.sentinel(), false),
    }
  }
}

fn render_hero(frame: &mut Frame, hero: &Hero, view: &PageView, area: Rect) {
  let theme = view.theme;
  let block = panel(format!(" {} ", hero.heading), theme);
  let inner_w = area.width.saturating_sub(4) as usize;

  let lines = match &hero.banner {
    Ok(banner) => {
      let record = &banner.record;
      let mut meta = vec![Span::styled(
        format!("{} · {} · {} · {}  ", record.kind, record.release_year, record.rating, record.duration),
        Style::default().fg(theme.muted),
      )];
      meta.extend(star_spans(record, theme));
      vec![
        Line::from(Span::styled(
          truncate_str(&record.title, inner_w),
          Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(Span::styled(truncate_str(&banner.genres.join(" · "), inner_w), Style::default().fg(theme.fg))),
        Line::from(Span::styled(truncate_str(&record.description, inner_w), Style::default().fg(theme.fg))),
        poster_line(&banner.poster, theme, inner_w),
      ]
    }
    Err(e) => vec![Line::from(Span::styled(format!("⚠  {e}"), Style::default().fg(theme.error)))],
  };
  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn poster_line(slot: &PosterSlot, theme: &Theme, width: usize) -> Line<'static> {
  let mut spans = vec![Span::styled("Poster  ", Style::default().fg(theme.muted))];
  let suffix = if slot.poster.is_fallback() { " (fallback)" } else { "" };
  spans.push(Span::styled(
    truncate_str(slot.poster.current(), width.saturating_sub(8 + suffix.len())),
    Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
  ));
  spans.push(Span::styled(suffix, Style::default().fg(theme.muted)));
  Line::from(spans)
}

fn render_chips(frame: &mut Frame, genres: &[String], theme: &Theme, area: Rect) {
  let mut spans = vec![Span::styled(" Genres ", Style::default().fg(theme.muted))];
  for genre in genres {
    spans.push(Span::styled(format!(" {genre} "), Style::default().fg(theme.key_fg).bg(theme.key_bg)));
    spans.push(Span::raw(" "));
  }
  frame.render_widget(Line::from(spans), area);
}

fn render_row(frame: &mut Frame, shelf: &mut Shelf, focused: bool, view: &PageView, area: Rect) {
  let theme = view.theme;
  let [title_area, cards_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

  let title_style = if focused { Style::default().fg(theme.accent) } else { Style::default().fg(theme.fg) };
  frame.render_widget(
    Line::from(vec![
      Span::styled(format!(" {}", shelf.title), title_style.add_modifier(Modifier::BOLD)),
      Span::styled(format!("  {}/{}", shelf.visible().len(), shelf.total()), Style::default().fg(theme.muted)),
    ]),
    title_area,
  );

  if shelf.total() == 0 {
    let text = if *view.catalog == CatalogStatus::Loading { "  Loading…" } else { "  No titles" };
    frame.render_widget(Span::styled(text, Style::default().fg(theme.muted)), cards_area);
    view.observer.report(shelf.sentinel(), false);
    return;
  }

  let capacity = (cards_area.width / CARD_WIDTH) as usize;
  shelf.scroll_to_selection(capacity, 1);
  let visible_len = shelf.visible().len();
  let offset = shelf.offset;

  for (slot, pos) in (offset..visible_len.min(offset + capacity)).enumerate() {
    let card_area = Rect {
      x: cards_area.x + slot as u16 * CARD_WIDTH,
      width: CARD_WIDTH,
      height: CARD_HEIGHT.min(cards_area.height),
      ..cards_area
    };
    if let Some(record) = view.records.get(shelf.visible()[pos]) {
      render_card(frame, record, focused && pos == shelf.selected, theme, card_area);
    }
  }

  let in_view = !shelf.is_exhausted() && sentinel_visible(offset, capacity, visible_len);
  if in_view {
    let slot = (visible_len - offset) as u16;
    let area = Rect { x: cards_area.x + slot * CARD_WIDTH, width: CARD_WIDTH, height: 1, ..cards_area };
    frame.render_widget(Span::styled(" Loading more…", Style::default().fg(theme.muted)), area);
  }
  view.observer.report(shelf.sentinel(), in_view);
}

fn render_card(frame: &mut Frame, record: &Record, selected: bool, theme: &Theme, area: Rect) {
  let border = if selected { theme.accent } else { theme.border };
  let block = Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(border));
  let inner_w = area.width.saturating_sub(2) as usize;

  let title_style = if selected {
    Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)
  };
  let tag = match record.kind.as_str() {
    KIND_MOVIE => "Film",
    KIND_TV_SHOW => "TV",
    other => other,
  };
  let mut meta = star_spans(record, theme);
  meta.push(Span::styled(format!(" {tag} {}", record.release_year), Style::default().fg(theme.muted)));

  let lines = vec![Line::from(Span::styled(truncate_str(&record.title, inner_w), title_style)), Line::from(meta)];
  frame.render_widget(Paragraph::new(lines).block(block), area);
}

// --- Grids ---

fn render_tv_shows(frame: &mut Frame, page: &mut TvShowsPage, view: &PageView, area: Rect) {
  let theme = view.theme;
  let [selector_area, grid_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

  let genre = page.selected_genre().unwrap_or("All").to_string();
  let position = page.genre.map_or(0, |i| i + 1);
  frame.render_widget(
    Line::from(vec![
      Span::styled(" Genre  ", Style::default().fg(theme.muted)),
      Span::styled(" ◀ ", Style::default().fg(theme.accent)),
      Span::styled(format!(" {genre} "), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
      Span::styled(" ▶ ", Style::default().fg(theme.accent)),
      Span::styled(format!(" {}/{}", position, page.genres.len()), Style::default().fg(theme.muted)),
    ]),
    selector_area,
  );

  let heading = format!(" {} ({}) ", genre, page.grid.total());
  render_grid(frame, &mut page.grid, view, grid_area, heading);
}

fn render_grid(frame: &mut Frame, grid: &mut Shelf, view: &PageView, area: Rect, heading: String) {
  let theme = view.theme;
  let block = panel(heading, theme);
  let inner = block.inner(area);
  frame.render_widget(block, area);

  if grid.total() == 0 {
    let text = if *view.catalog == CatalogStatus::Loading { "Loading…" } else { "No titles" };
    frame.render_widget(Span::styled(text, Style::default().fg(theme.muted)), inner);
    view.observer.report(grid.sentinel(), false);
    return;
  }

  let columns = (inner.width / CARD_WIDTH).max(1) as usize;
  let rows = (inner.height / CARD_HEIGHT) as usize;
  grid.scroll_to_selection(rows, columns);
  let visible = grid.visible();

  for line in 0..rows {
    for col in 0..columns {
      let pos = (grid.offset + line) * columns + col;
      let Some(&idx) = visible.get(pos) else { break };
      let card_area = Rect {
        x: inner.x + col as u16 * CARD_WIDTH,
        y: inner.y + line as u16 * CARD_HEIGHT,
        width: CARD_WIDTH.min(inner.width),
        height: CARD_HEIGHT,
      };
      if let Some(record) = view.records.get(idx) {
        render_card(frame, record, pos == grid.selected, theme, card_area);
      }
    }
  }

  let in_view = !grid.is_exhausted() && sentinel_visible(grid.offset, rows, grid.sentinel_unit());
  if in_view {
    let pos = visible.len();
    let line = (pos / columns - grid.offset) as u16;
    let col = (pos % columns) as u16;
    let area = Rect { x: inner.x + col * CARD_WIDTH, y: inner.y + line * CARD_HEIGHT, width: CARD_WIDTH, height: 1 };
    frame.render_widget(Span::styled(" Loading more…", Style::default().fg(theme.muted)), area);
  }
  view.observer.report(grid.sentinel(), in_view);
}

// --- Detail pages ---

fn render_title(frame: &mut Frame, page: &TitlePage, view: &PageView, area: Rect) {
  let theme = view.theme;
  let Some(record) = page.record.and_then(|idx| view.records.get(idx)) else {
    let text = if *view.catalog == CatalogStatus::Loading {
      "Loading…".to_string()
    } else {
      format!("No title matches \"{}\".", page.slug)
    };
    let paragraph =
      Paragraph::new(Span::styled(text, Style::default().fg(theme.muted))).block(panel(" Title ", theme));
    frame.render_widget(paragraph, area);
    return;
  };

  let inner_w = area.width.saturating_sub(4) as usize;
  let field = |label: &'static str, value: &str| {
    Line::from(vec![
      Span::styled(format!("{label:<10}"), Style::default().fg(theme.muted)),
      Span::styled(truncate_str(value, inner_w.saturating_sub(10)), Style::default().fg(theme.fg)),
    ])
  };

  let genres = record.active_genres(&constants().genres).join(" · ");
  let mut rating = vec![Span::styled(format!("{:<10}", "Stars"), Style::default().fg(theme.muted))];
  rating.extend(star_spans(record, theme));

  let mut lines = vec![
    Line::from(Span::styled(record.title.clone(), Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    field("Type", &record.kind),
    field("Year", &record.release_year),
    field("Rating", &record.rating),
    field("Duration", &record.duration),
    field("Director", &record.director),
    field("Cast", &record.cast),
    field("Country", &record.country),
    field("Genres", &genres),
    Line::from(rating),
  ];
  if let Some(slot) = &page.poster {
    lines.push(poster_line(slot, theme, inner_w));
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(record.description.clone(), Style::default().fg(theme.fg))));

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(panel(" Title ", theme));
  frame.render_widget(paragraph, area);
}

fn render_account(frame: &mut Frame, view: &PageView, area: Rect) {
  let theme = view.theme;
  let mut lines = vec![Line::from("")];

  match view.session.get_json::<serde_json::Value>(INDIVIDUAL_USER_KEY) {
    Some(serde_json::Value::Object(user)) => {
      lines.push(Line::from(Span::styled("Profile", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))));
      for (key, value) in &user {
        let value = match value {
          serde_json::Value::String(s) => s.clone(),
          other => other.to_string(),
        };
        lines.push(Line::from(vec![
          Span::styled(format!("{key:<14}"), Style::default().fg(theme.muted)),
          Span::styled(value, Style::default().fg(theme.fg)),
        ]));
      }
    }
    Some(other) => lines.push(Line::from(Span::styled(other.to_string(), Style::default().fg(theme.fg)))),
    None => lines.push(Line::from(Span::styled(
      "No profile selected. Press Ctrl+K and search for a user.",
      Style::default().fg(theme.muted),
    ))),
  }

  if let Some(plate) = view.session.get(PLATE_KEY) {
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
      Span::styled(format!("{:<14}", "License plate"), Style::default().fg(theme.muted)),
      Span::styled(plate.to_string(), Style::default().fg(theme.fg)),
    ]));
  }

  frame.render_widget(Paragraph::new(lines).block(panel(" Account ", theme)), area);
}

fn render_privacy(frame: &mut Frame, theme: &Theme, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("Privacy Policy", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled(
      "niche keeps your selections in memory for the current session only. Nothing is sent anywhere \
       except requests for the dataset and poster images.",
      Style::default().fg(theme.fg),
    )),
    Line::from(""),
    Line::from(Span::styled(
      "Preferences such as the theme are stored in a local file and can be deleted at any time.",
      Style::default().fg(theme.fg),
    )),
  ];
  let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(panel(" Privacy ", theme));
  frame.render_widget(paragraph, area);
}

fn render_not_found(frame: &mut Frame, path: &str, theme: &Theme, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("404", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled(format!("Nothing lives at {path}."), Style::default().fg(theme.fg))),
    Line::from(Span::styled("Press 1 to go home or b to go back.", Style::default().fg(theme.muted))),
  ];
  frame.render_widget(Paragraph::new(text).alignment(Alignment::Center).block(panel(" Not Found ", theme)), area);
}

// --- Chrome ---

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else {
    match &app.catalog {
      CatalogStatus::Ready => {
        (format!(" {} titles · {}", app.records.len(), app.source.label()), Style::default().fg(theme.muted))
      }
      CatalogStatus::Loading => (" Loading…".to_string(), Style::default().fg(theme.status)),
      CatalogStatus::Failed(e) => (format!(" ⚠  Catalog unavailable: {e}"), Style::default().fg(theme.error)),
    }
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = if app.overlay.is_open() {
    vec![("Enter", "Open"), ("↑/↓", "Select"), ("^u", "Clear"), ("Esc", "Close")]
  } else {
    let mut k = vec![("^k", "Search"), ("1-6", "Tabs")];
    match &app.page {
      Page::Home(_) | Page::Movies(_) => {
        k.push(("Tab", "Section"));
        k.push(("←/→", "Scroll"));
        k.push(("Enter", "Open"));
      }
      Page::TvShows(_) => {
        k.push(("[/]", "Genre"));
        k.push(("hjkl", "Move"));
        k.push(("Enter", "Open"));
      }
      Page::Titles(_) => {
        k.push(("hjkl", "Move"));
        k.push(("Enter", "Open"));
      }
      Page::Account => k.push(("x", "Clear profile")),
      _ => {}
    }
    if app.router.can_go_back() {
      k.push(("b", "Back"));
    }
    k.push(("^t", "Theme"));
    k.push(("q", "Quit"));
    k
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

// --- Search overlay ---

fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let popup = centered(area, 70, 70);
  frame.render_widget(Clear, popup);

  let block = Block::bordered()
    .title(" Search ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(theme.accent))
    .style(Style::default().bg(theme.bg))
    .padding(Padding::horizontal(1));
  let inner = block.inner(popup);
  frame.render_widget(block, popup);

  let [input_area, count_area, list_area] =
    Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)]).areas(inner);

  let query = app.overlay.query();
  frame.render_widget(
    Line::from(vec![
      Span::styled("› ", Style::default().fg(theme.accent)),
      Span::styled(query.to_string(), Style::default().fg(theme.fg)),
    ]),
    input_area,
  );
  let cursor_col = display_width(query, app.overlay.cursor()) as u16 + 2;
  let cursor_x = (input_area.x + cursor_col).min(input_area.right().saturating_sub(1));
  frame.set_cursor_position((cursor_x, input_area.y));

  let results = app.overlay.results();
  frame.render_widget(
    Span::styled(format!("Total results ({})", results.len()), Style::default().fg(theme.muted)),
    count_area,
  );

  let Some(index) = app.overlay.index() else { return };
  let width = list_area.width.saturating_sub(2) as usize;
  let items: Vec<ListItem> = results
    .iter()
    .filter_map(|hit| index.entry(hit.entry).map(|entry| (hit, entry)))
    .map(|(hit, entry)| result_item(hit, entry, theme, width))
    .collect();

  let list = List::new(items)
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().bg(theme.stripe_bg).add_modifier(Modifier::BOLD));
  let mut state = ListState::default();
  if !results.is_empty() {
    state.select(Some(app.overlay.selected()));
  }
  frame.render_stateful_widget(list, list_area, &mut state);
}

fn result_item(hit: &SearchHit, entry: &SearchEntry, theme: &Theme, width: usize) -> ListItem<'static> {
  let mut spans = Vec::new();
  if let Some(compound) = entry.compound() {
    spans.push(Span::styled(format!("{} ", compound.kind), Style::default().fg(theme.muted)));
  }
  let base = Style::default().fg(theme.fg);
  let matched = Style::default().fg(theme.matched).add_modifier(Modifier::BOLD);
  spans.extend(highlight_spans(entry.display_name(), &hit.highlight, base, matched));

  let used: usize = spans.iter().map(|s| s.width()).sum();
  let path = truncate_str(&entry.path, width.saturating_sub(used + 2));
  let gap = width.saturating_sub(used + path.chars().count());
  spans.push(Span::raw(" ".repeat(gap)));
  spans.push(Span::styled(path, Style::default().fg(theme.muted)));
  ListItem::new(Line::from(spans))
}
