use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
  pub star: Color,
  pub star_empty: Color,
  pub matched: Color,
}

pub const THEMES: &[Theme] = &[
  Theme {
    name: "Niche",
    bg: Color::Rgb(0x19, 0x19, 0x19),
    fg: Color::Rgb(0xf4, 0xf4, 0xf5),
    accent: Color::Rgb(0xea, 0x8c, 0x55),
    muted: Color::Rgb(0x96, 0x96, 0x96),
    border: Color::Rgb(0x50, 0x30, 0x47),
    highlight_fg: Color::Rgb(0x19, 0x19, 0x19),
    highlight_bg: Color::Rgb(0xe8, 0xaf, 0x58),
    stripe_bg: Color::Rgb(0x22, 0x22, 0x22),
    status: Color::Rgb(0xe8, 0xaf, 0x58),
    error: Color::Rgb(0xf2, 0x5f, 0x5d),
    key_fg: Color::Rgb(0x19, 0x19, 0x19),
    key_bg: Color::Rgb(0xea, 0x8c, 0x55),
    star: Color::Rgb(0xf4, 0xac, 0x45),
    star_empty: Color::Rgb(0x96, 0x96, 0x96),
    matched: Color::Rgb(0xe0, 0x69, 0x61),
  },
  Theme {
    name: "Zinc",
    bg: Color::Rgb(0x18, 0x18, 0x1b),
    fg: Color::Rgb(0xe4, 0xe4, 0xe7),
    accent: Color::Rgb(0xa1, 0xa1, 0xaa),
    muted: Color::Rgb(0x71, 0x71, 0x7a),
    border: Color::Rgb(0x3f, 0x3f, 0x46),
    highlight_fg: Color::Rgb(0x18, 0x18, 0x1b),
    highlight_bg: Color::Rgb(0xd4, 0xd4, 0xd8),
    stripe_bg: Color::Rgb(0x27, 0x27, 0x2a),
    status: Color::Rgb(0xd4, 0xd4, 0xd8),
    error: Color::Rgb(0xf8, 0x71, 0x71),
    key_fg: Color::Rgb(0x18, 0x18, 0x1b),
    key_bg: Color::Rgb(0xa1, 0xa1, 0xaa),
    star: Color::Rgb(0xfa, 0xcc, 0x15),
    star_empty: Color::Rgb(0x52, 0x52, 0x5b),
    matched: Color::Rgb(0xfa, 0xcc, 0x15),
  },
  Theme {
    name: "Mono",
    bg: Color::Reset,
    fg: Color::Reset,
    accent: Color::White,
    muted: Color::DarkGray,
    border: Color::Gray,
    highlight_fg: Color::Black,
    highlight_bg: Color::White,
    stripe_bg: Color::Reset,
    status: Color::White,
    error: Color::Red,
    key_fg: Color::Black,
    key_bg: Color::Gray,
    star: Color::Yellow,
    star_empty: Color::DarkGray,
    matched: Color::Yellow,
  },
];

pub fn theme_index(name: &str) -> Option<usize> {
  THEMES.iter().position(|t| t.name.eq_ignore_ascii_case(name))
}
