//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only Normal mode goes through the keymap; the search box and the inline
//! editor consume raw keystrokes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::Path;

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Several key combinations may map to the same action (e.g. both 'j' and Down
/// move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Focus the search box.
    StartSearch,
    /// Cycle the column the search box matches against.
    CycleSearchField,
    /// Move the row cursor up.
    MoveUp,
    /// Move the row cursor down.
    MoveDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    /// Toggle the checkbox of the row under the cursor.
    ToggleSelect,
    /// Start editing the row under the cursor.
    EditRow,
    /// Delete the row under the cursor.
    DeleteRow,
    /// Delete every checked row.
    DeleteSelected,
    /// Fetch the member list again, discarding local changes.
    Reload,
    /// Ignore this key (used for keys that shouldn't trigger anything).
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 16] = [
    KeyAction::Quit,
    KeyAction::OpenHelp,
    KeyAction::StartSearch,
    KeyAction::CycleSearchField,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PrevPage,
    KeyAction::NextPage,
    KeyAction::FirstPage,
    KeyAction::LastPage,
    KeyAction::ToggleSelect,
    KeyAction::EditRow,
    KeyAction::DeleteRow,
    KeyAction::DeleteSelected,
    KeyAction::Reload,
    KeyAction::Ignore,
];

/// Mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::SHIFT, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('f')), KeyAction::CycleSearchField);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);

        bindings.insert((M::NONE, Char(' ')), KeyAction::ToggleSelect);
        bindings.insert((M::NONE, Enter), KeyAction::EditRow);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditRow);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteRow);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteRow);
        // Terminals disagree on whether uppercase letters carry SHIFT
        bindings.insert((M::NONE, Char('D')), KeyAction::DeleteSelected);
        bindings.insert((M::SHIFT, Char('D')), KeyAction::DeleteSelected);
        bindings.insert((M::NONE, Char('r')), KeyAction::Reload);

        Self { bindings }
    }

    /// Resolve the keymap: explicit path, then the config directory, then defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path
            .map(Path::to_path_buf)
            .or_else(|| crate::app::config_file_read_path("keybinds.conf"));
        match resolved {
            Some(p) => Self::from_file(&p).unwrap_or_else(|| {
                tracing::warn!(path = %p.display(), "keybinds file unreadable, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load a keymap from a configuration file.
    ///
    /// Lines use `<Action> = <KeySpec>`; the reversed `<KeySpec> = <Action>` is
    /// accepted too. Bindings override the defaults. Returns `None` when the
    /// file cannot be read.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Apply config text on top of the defaults. Malformed lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    /// Write every binding to a configuration file, grouped by action.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.render())
    }

    fn render(&self) -> String {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# member-admin keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Shift+D, Ctrl+Shift+X, Enter, Esc, Space,\n");
        buf.push_str("#   Up, Down, Left, Right, PageUp, PageDown, Home, End, Delete\n\n");

        for action in ALL_ACTIONS {
            for k in self.keys_for(action) {
                let _ = writeln!(&mut buf, "{} = {}", format_action(action), k);
            }
        }
        buf
    }

    /// Resolve a key event to its corresponding action.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Keys bound to `action`, formatted and sorted, for help screens.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key (modifiers + code) into a human-readable spec like "Ctrl+q".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        let mut spec = String::new();
        if mods.contains(KeyModifiers::CONTROL) {
            spec.push_str("Ctrl+");
        }
        if mods.contains(KeyModifiers::SHIFT) {
            spec.push_str("Shift+");
        }
        spec.push_str(&base);
        spec
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let mut rest = spec.trim();
    let mut mods = KeyModifiers::NONE;
    loop {
        if let Some(after) = rest.strip_prefix("Ctrl+") {
            mods |= KeyModifiers::CONTROL;
            rest = after;
        } else if let Some(after) = rest.strip_prefix("Shift+") {
            mods |= KeyModifiers::SHIFT;
            rest = after;
        } else {
            break;
        }
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Home" => Home,
        "End" => End,
        "Space" => Char(' '),
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ALL_ACTIONS
        .into_iter()
        .find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::CycleSearchField => "CycleSearchField",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextPage => "NextPage",
        KeyAction::FirstPage => "FirstPage",
        KeyAction::LastPage => "LastPage",
        KeyAction::ToggleSelect => "ToggleSelect",
        KeyAction::EditRow => "EditRow",
        KeyAction::DeleteRow => "DeleteRow",
        KeyAction::DeleteSelected => "DeleteSelected",
        KeyAction::Reload => "Reload",
        KeyAction::Ignore => "Ignore",
    }
}
