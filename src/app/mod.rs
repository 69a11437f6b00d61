//! Application state types and entry glue.
//!
//! Defines the TUI-level state wrapped around the [`MemberTable`] core (input
//! modes, the search box, the row cursor, theme and keymap), plus helpers to
//! locate config files and to run the application loop (re-exported as `run`).
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::member::{Member, MemberField};
use crate::source::{self, MemberSource};
use crate::table::{MemberTable, RowKey};
use keymap::Keymap;

/// Directory name under the user's config home.
pub const CONFIG_DIR_NAME: &str = "member-admin";

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Edit,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub selected_bg: Color,
    pub danger: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            selected_bg: Color::DarkGray,
            danger: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            selected_bg: Color::Rgb(0x31, 0x32, 0x44),  // surface0
            danger: Color::Rgb(0xf3, 0x8b, 0xa8),       // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "selected_bg" => theme.selected_bg = color,
                    "danger" => theme.danger = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or special names: "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# member-admin theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("selected_bg", self.selected_bg);
        kv("danger", self.danger);

        std::fs::write(path, buf)
    }

    /// Resolve the theme: explicit path, then the config directory, then `mocha`.
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path
            .map(Path::to_path_buf)
            .or_else(|| config_file_read_path("theme.conf"));
        match resolved {
            Some(p) => Self::from_file(&p).unwrap_or_else(|| {
                tracing::warn!(path = %p.display(), "theme file unreadable, using defaults");
                Self::mocha()
            }),
            None => Self::mocha(),
        }
    }
}

/// `$XDG_CONFIG_HOME/member-admin`, else `~/.config/member-admin`.
pub fn config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join(CONFIG_DIR_NAME))
}

/// Path of an existing config file called `name`, if there is one.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    let p = config_dir()?.join(name);
    p.is_file().then_some(p)
}

/// Write default `theme.conf` and `keybinds.conf` into `dir`, returning the paths written.
pub fn write_default_config(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let theme = dir.join("theme.conf");
    Theme::mocha().write_file(&theme)?;
    let keys = dir.join("keybinds.conf");
    Keymap::default().write_file(&keys)?;
    Ok(vec![theme, keys])
}

/// Modal overlays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Help,
}

pub struct AppState {
    pub started_at: Instant,
    pub table: MemberTable,
    /// Row index within the current page.
    pub cursor: usize,
    pub input_mode: InputMode,
    /// Contents of the search box; only applied when submitted.
    pub search_input: String,
    pub search_field: MemberField,
    /// Field receiving keystrokes while a row is being edited.
    pub edit_field: MemberField,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    /// Outcome of the last action, shown in the status bar.
    pub status: Option<String>,
    source: Option<Box<dyn MemberSource>>,
}

impl AppState {
    /// Build state around already-loaded members, with no source to reload from.
    pub fn new(members: Vec<Member>, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            table: MemberTable::new(members),
            cursor: 0,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            search_field: MemberField::Name,
            edit_field: MemberField::Name,
            theme,
            keymap,
            modal: None,
            status: None,
            source: None,
        }
    }

    /// Load once from `source` and keep it for later reloads.
    pub fn from_source(source: Box<dyn MemberSource>, theme: Theme, keymap: Keymap) -> Self {
        let members = source::load_members(source.as_ref());
        let mut app = Self::new(members, theme, keymap);
        app.status = Some(format!("loaded {} members from {}", app.table.len(), source.describe()));
        app.source = Some(source);
        app
    }

    /// Plain state for tests and embedding: dark theme, default keys.
    pub fn with_members(members: Vec<Member>) -> Self {
        Self::new(members, Theme::dark(), Keymap::default())
    }

    /// Re-fetch from the source, discarding all local edits and deletes.
    pub fn reload(&mut self) -> bool {
        let Some(source) = self.source.as_deref() else {
            self.status = Some("nothing to reload from".to_string());
            return false;
        };
        let members = source::load_members(source);
        self.status = Some(format!("reloaded {} members", members.len()));
        self.table = MemberTable::new(members);
        self.cursor = 0;
        self.input_mode = InputMode::Normal;
        true
    }

    /// Display id of the row under the cursor.
    pub fn cursor_id(&self) -> Option<u32> {
        self.table.page_rows().get(self.cursor).map(|r| r.member.id)
    }

    /// Internal key of the row under the cursor.
    pub fn cursor_key(&self) -> Option<RowKey> {
        self.table.page_rows().get(self.cursor).map(|r| r.key)
    }

    /// Keep the cursor on an existing row of the current page.
    pub fn clamp_cursor(&mut self) {
        let len = self.table.page_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
