//! quickcapture - a terminal quick-capture popup for markdown note vaults.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use quickcapture::app::{App, TagLookup};
use quickcapture::capture::Action;
use quickcapture::config::Config;
use quickcapture::error::AppError;
use quickcapture::events::EventHandler;
use quickcapture::vault::Vault;
use quickcapture::{logging, ui};

/// Capture a thought into your notes vault without leaving the terminal.
#[derive(Debug, Parser)]
#[command(name = "quickcapture", version, about)]
struct Args {
    /// Config file to use instead of the default location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Vault folder, overriding the config file.
    #[arg(long, value_name = "DIR")]
    vault: Option<PathBuf>,

    /// Extra candidate tag. Repeatable.
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Preselected destination: create-note, add-daily or add-inbox.
    #[arg(long)]
    action: Option<Action>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The guard flushes the log file on exit; without it we run unlogged.
    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        }
    };

    let config_path = match args.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?
        .with_overrides(args.vault, args.tags, args.action);
    config.validate()?;

    ui::init_theme(&config.settings.theme);

    let vault = match Vault::open(&config.vault) {
        Ok(vault) => vault,
        Err(e) => {
            let err = AppError::from(e);
            error!(error = %err, "Cannot open vault");
            match err.suggested_action() {
                Some(hint) => bail!("{}\n{}", err.user_message(), hint),
                None => bail!("{}", err.user_message()),
            }
        }
    };
    info!(root = %vault.root().display(), "Vault opened");

    let lookup = tag_lookup(&config, vault.clone());
    let events = EventHandler::with_tick_rate(config.settings.tick_rate_ms);
    let mut app = App::new(config, Box::new(vault), lookup);
    app.open_capture();

    let result = run(&mut app, &events);
    logging::shutdown();
    result
}

/// Configured tags first, then whatever the vault uses.
fn tag_lookup(config: &Config, vault: Vault) -> TagLookup {
    let configured = config.settings.tags.clone();
    let scan = config.settings.scan_vault_tags;
    Box::new(move || {
        let mut tags = configured.clone();
        if scan {
            tags.extend(vault.scan_tags());
        }
        tags
    })
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn run(app: &mut App, events: &EventHandler) -> Result<()> {
    let mut terminal = setup_terminal()?;

    // Put the terminal back before the panic message is printed.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = event_loop(&mut terminal, app, events);
    if let Err(e) = restore_terminal(&mut terminal) {
        error!(error = %e, "Failed to restore terminal");
        return Err(e.into());
    }
    result
}

fn setup_terminal() -> std::result::Result<Tui, AppError> {
    enable_raw_mode().map_err(AppError::terminal)?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )
    .map_err(AppError::terminal)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(AppError::terminal)?;
    terminal.clear().map_err(AppError::terminal)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> std::result::Result<(), AppError> {
    disable_raw_mode().map_err(AppError::terminal)?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .map_err(AppError::terminal)?;
    terminal.show_cursor().map_err(AppError::terminal)
}

fn event_loop(terminal: &mut Tui, app: &mut App, events: &EventHandler) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.view(frame))?;
        app.update(events.next()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "quickcapture",
            "--vault",
            "/tmp/vault",
            "--tag",
            "Rust",
            "--tag",
            "Ideas",
            "--action",
            "add-daily",
        ])
        .unwrap();
        assert_eq!(args.vault, Some(PathBuf::from("/tmp/vault")));
        assert_eq!(args.tags, ["Rust", "Ideas"]);
        assert_eq!(args.action, Some(Action::AddDaily));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_args_reject_unknown_action() {
        assert!(Args::try_parse_from(["quickcapture", "--action", "archive"]).is_err());
    }

    #[test]
    fn test_tag_lookup_merges_vault_tags() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "hello #Vaulted\n").unwrap();

        let mut config = Config::default();
        config.vault = quickcapture::config::VaultConfig::at(dir.path());
        config.settings.tags = vec!["Configured".to_string()];
        let vault = Vault::open(&config.vault).unwrap();

        let lookup = tag_lookup(&config, vault.clone());
        assert_eq!(lookup(), ["Configured", "Vaulted"]);

        config.settings.scan_vault_tags = false;
        let lookup = tag_lookup(&config, vault);
        assert_eq!(lookup(), ["Configured"]);
    }
}
