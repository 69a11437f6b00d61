//! member-admin binary entry point.
//!
//! Parses the command line, sets up logging, loads the member list once,
//! then runs the TUI event loop and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use member_admin::app::{self, AppState, Theme, keymap::Keymap};
use member_admin::cli::Cli;
use member_admin::error::{Context, Result};
use member_admin::logging;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let dir = app::config_dir().ok_or("cannot determine config directory (HOME unset)")?;
        let written = app::write_default_config(&dir)
            .with_ctx(|| format!("write config to {}", dir.display()))?;
        for path in written {
            println!("wrote {}", path.display());
        }
        return Ok(());
    }

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init_logging(&log_path, &cli.log_level)?;

    let theme = Theme::load(cli.theme.as_deref());
    let keymap = Keymap::load(cli.keybinds.as_deref());
    let mut state = AppState::from_source(cli.source()?, theme, keymap);
    state.search_field = cli.column;

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
