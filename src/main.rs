//! termfolio - A terminal-style interactive portfolio
//!
//! termfolio presents a portfolio as a command prompt: typed commands reveal
//! Markdown documents one block at a time, like output scrolling by.
//!
//! # Features
//!
//! - **Commands**: `/about`, `/skills`, `/projects`, ... from a built-in or TOML table
//! - **Autocomplete**: Menu of matching commands while typing a `/` prefix
//! - **History**: ↑/↓ recall of previous submissions
//! - **Mouse Support**: Click command links and menu items, wheel to scroll
//! - **Color Schemes**: 5 built-in themes
//! - **Headless Mode**: `-e` runs commands and prints the transcript
//!
//! # Quick Start
//!
//! ```text
//! termfolio                        # Interactive session
//! termfolio --theme nord           # With a color scheme
//! termfolio -e /about -e /skills   # Print output and exit
//! ```
//!
//! # Keybindings
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter | Submit / accept menu item |
//! | Tab | Accept menu item |
//! | ↑/↓ | Menu navigation or history recall |
//! | Esc | Dismiss menu / clear input |
//! | PageUp/PageDown | Scroll history |
//! | Ctrl+V | Paste |
//! | Ctrl+C, Ctrl+D | Quit |

mod config;
mod content;
mod core;
mod history;
mod ui;

use std::cell::Cell;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;
use crate::content::CommandTable;
use crate::core::format::MarkdownFormatter;
use crate::core::entry::{EntryContent, OutputEntry, StyleTag};
use crate::core::session::{Effects, Session, SessionOptions};
use crate::ui::renderer::PROMPT;
use crate::ui::{EditorKey, HitTarget, KeyAction, KeyMapper, LineEditor, MouseAction, Renderer, WHEEL_LINES};

/// Command line options
#[derive(Debug, Default)]
struct Args {
    /// Explicit config file
    config_path: Option<PathBuf>,
    /// Command table file (overrides config)
    commands_file: Option<PathBuf>,
    /// Color scheme (overrides config)
    theme: Option<String>,
    /// Reveal delay in ms (overrides config)
    delay_ms: Option<u64>,
    /// Commands to run headless
    exec: Vec<String>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Poll interval when no timer is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

fn print_version() {
    eprintln!("termfolio {}", VERSION);
}

fn print_help() {
    eprintln!("termfolio {} - A terminal-style interactive portfolio", VERSION);
    eprintln!();
    eprintln!("Usage: termfolio [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <PATH>       Config file (default: ~/.termfolio/config.toml)");
    eprintln!("  --commands <PATH>     Command table TOML file");
    eprintln!("  --theme <NAME>        Color scheme ({})", config::ColorScheme::list().join(", "));
    eprintln!("  --delay <MS>          Delay between revealed blocks");
    eprintln!("  -e, --exec <CMD>      Run a command headless and print output (repeatable)");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Enter                 Submit / accept menu item");
    eprintln!("  Tab                   Accept menu item");
    eprintln!("  ↑/↓                   Menu navigation or history recall");
    eprintln!("  Esc                   Dismiss menu / clear input");
    eprintln!("  PageUp/PageDown       Scroll history");
    eprintln!("  Ctrl+V                Paste from clipboard");
    eprintln!("  Ctrl+C, Ctrl+D        Quit");
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;

    // Value of the option at args[i]
    let value = |i: usize, name: &str| -> Result<String, String> {
        args.get(i + 1)
            .cloned()
            .ok_or_else(|| format!("Missing argument for {}", name))
    };

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "--config" => {
                parsed.config_path = Some(PathBuf::from(value(i, "--config")?));
                i += 1;
            }
            "--commands" => {
                parsed.commands_file = Some(PathBuf::from(value(i, "--commands")?));
                i += 1;
            }
            "--theme" => {
                parsed.theme = Some(value(i, "--theme")?);
                i += 1;
            }
            "--delay" => {
                let raw = value(i, "--delay")?;
                let ms = raw
                    .parse()
                    .map_err(|_| format!("Invalid delay: {}", raw))?;
                parsed.delay_ms = Some(ms);
                i += 1;
            }
            "-e" | "--exec" => {
                parsed.exec.push(value(i, "--exec")?);
                i += 1;
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

/// Initialize logging to file
fn init_logging(level: &str) {
    let log_path = config::data_dir()
        .map(|dir| dir.join("termfolio.log"))
        .unwrap_or_else(|| PathBuf::from("termfolio.log"));

    // Create log directory if needed
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let (mut config, config_error) = match &args.config_path {
        Some(path) => {
            let config = Config::load_from(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            (config, None)
        }
        None => match Config::load() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };

    // Command line overrides
    if let Some(path) = args.commands_file {
        config.commands_file = Some(path);
    }
    if let Some(theme) = args.theme {
        config.color_scheme = theme;
    }
    if let Some(ms) = args.delay_ms {
        config.reveal_delay_ms = ms;
    }

    init_logging(&config.log_level);
    info!("termfolio {} starting...", VERSION);
    if let Some(e) = config_error {
        warn!("Using default config: {}", e);
    }

    let table = match &config.commands_file {
        Some(path) => CommandTable::load(path)
            .with_context(|| format!("Failed to load commands {}", path.display()))?,
        None => CommandTable::builtin(),
    };

    if !args.exec.is_empty() {
        return run_headless(table, &args.exec);
    }

    run_interactive(table, &config)
}

/// Run commands without a terminal and print the transcript
fn run_headless(table: CommandTable, commands: &[String]) -> anyhow::Result<()> {
    let options = SessionOptions {
        reveal_delay: Duration::ZERO,
        refocus_delay: Duration::ZERO,
    };
    let mut session = Session::new(table, Box::new(MarkdownFormatter::new()), Effects::none(), options);

    let now = Instant::now();
    session.start(now);
    drain(&mut session);
    for command in commands {
        info!("Headless submit: {}", command);
        session.submit(command, now);
        drain(&mut session);
    }

    print!("{}", transcript(session.history()));
    Ok(())
}

/// Plain-text rendition of the history, blank line after each block
fn transcript(history: &[OutputEntry]) -> String {
    let mut out = String::new();
    for entry in history {
        if entry.style() == Some(StyleTag::Command) {
            out.push_str(PROMPT);
        }
        out.push_str(&entry.plain_text());
        out.push('\n');
        if matches!(entry.content(), EntryContent::Block(_)) {
            out.push('\n');
        }
    }
    out
}

// Fire every pending timer
fn drain(session: &mut Session) {
    while let Some(deadline) = session.next_deadline() {
        session.tick(deadline);
    }
}

/// Flags set by session effects and applied by the event loop
#[derive(Clone, Default)]
struct EffectFlags {
    focus: Rc<Cell<bool>>,
    scroll_to_bottom: Rc<Cell<bool>>,
}

impl EffectFlags {
    fn effects(&self) -> Effects {
        let focus = Rc::clone(&self.focus);
        let scroll = Rc::clone(&self.scroll_to_bottom);
        Effects::new(move || focus.set(true), move || scroll.set(true))
    }

    fn apply(&self, editor: &mut LineEditor, renderer: &mut Renderer) {
        if self.focus.take() {
            editor.focus();
        }
        if self.scroll_to_bottom.take() {
            renderer.scroll_to_bottom();
        }
    }
}

/// Run the full-screen session
fn run_interactive(table: CommandTable, config: &Config) -> anyhow::Result<()> {
    let flags = EffectFlags::default();
    let mut session = Session::new(
        table,
        Box::new(MarkdownFormatter::new()),
        flags.effects(),
        config.session_options(),
    );
    info!("Color scheme: {}", config.color_scheme);
    let mut renderer = Renderer::with_color_scheme(config.get_color_scheme());
    renderer.init()?;

    let result = run_main_loop(&mut session, &mut renderer, &flags);

    renderer.cleanup()?;
    info!("termfolio exiting");
    result
}

fn run_main_loop(session: &mut Session, renderer: &mut Renderer, flags: &EffectFlags) -> anyhow::Result<()> {
    let mut editor = LineEditor::new();
    session.start(Instant::now());

    loop {
        flags.apply(&mut editor, renderer);
        renderer.render(session.history(), &editor, session.table(), session.is_busy())?;

        let timeout = session
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match KeyMapper::map(&key) {
                    Some(KeyAction::Quit) => break,
                    Some(KeyAction::Editor(key)) => handle_editor_key(session, &mut editor, key),
                    Some(KeyAction::Paste) => {
                        let text = arboard::Clipboard::new().and_then(|mut c| c.get_text());
                        match text {
                            Ok(text) => {
                                if let Some(key) = KeyMapper::paste_key(&text) {
                                    handle_editor_key(session, &mut editor, key);
                                }
                            }
                            Err(e) => debug!("Clipboard unavailable: {}", e),
                        }
                    }
                    Some(KeyAction::PageUp) => renderer.scroll_up(renderer.page_size()),
                    Some(KeyAction::PageDown) => renderer.scroll_down(renderer.page_size()),
                    None => {}
                },
                Event::Mouse(mouse) => match KeyMapper::map_mouse(&mouse) {
                    Some(MouseAction::Click(col, row)) => {
                        let target = renderer.hit_test(col, row).cloned();
                        if let Some(target) = target {
                            handle_click(session, &mut editor, target);
                        }
                    }
                    Some(MouseAction::Hover(col, row)) => {
                        if let Some(HitTarget::MenuItem(index)) = renderer.hit_test(col, row) {
                            editor.hover_candidate(*index);
                        }
                    }
                    Some(MouseAction::ScrollUp) => renderer.scroll_up(WHEEL_LINES),
                    Some(MouseAction::ScrollDown) => renderer.scroll_down(WHEEL_LINES),
                    None => {}
                },
                Event::Paste(text) => {
                    if let Some(key) = KeyMapper::paste_key(&text) {
                        handle_editor_key(session, &mut editor, key);
                    }
                }
                // Next render picks up the new size
                Event::Resize(..) => {}
                _ => {}
            }
        }

        session.tick(Instant::now());
    }

    Ok(())
}

fn handle_editor_key(session: &mut Session, editor: &mut LineEditor, key: EditorKey) {
    let submitted = editor.handle_key(key, session.is_busy(), session.table());
    if let Some(raw) = submitted {
        let dispatch = session.submit(&raw, Instant::now());
        debug!("Submitted {:?}: {:?}", raw, dispatch);
    }
}

fn handle_click(session: &mut Session, editor: &mut LineEditor, target: HitTarget) {
    match target {
        HitTarget::MenuItem(index) => editor.pick_candidate(index, session.table()),
        HitTarget::Link(link) if link.is_command() => {
            session.activate_link(&link.href, Instant::now());
        }
        HitTarget::Link(link) => {
            info!("External link: {}", link.href);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::Link;

    fn table() -> CommandTable {
        CommandTable::new("# Hi\n\nWelcome.")
            .with_command("/about", "About", "About me.")
            .with_reset("Clear")
    }

    fn session(reveal_delay: Duration) -> Session {
        let options = SessionOptions {
            reveal_delay,
            ..SessionOptions::default()
        };
        Session::new(table(), Box::new(MarkdownFormatter::new()), Effects::none(), options)
    }

    fn type_str(session: &mut Session, editor: &mut LineEditor, text: &str) {
        for ch in text.chars() {
            handle_editor_key(session, editor, EditorKey::Char(ch));
        }
    }

    #[test]
    fn test_editor_stays_focused_after_submit() {
        let mut session = session(Duration::from_secs(1));
        let mut editor = LineEditor::new();
        editor.focus();

        type_str(&mut session, &mut editor, "/nope");
        handle_editor_key(&mut session, &mut editor, EditorKey::Enter);
        assert!(session.is_busy());
        assert!(editor.is_focused());

        // Typing continues while output is revealed; Enter waits
        type_str(&mut session, &mut editor, "/about");
        assert_eq!(editor.buffer(), "/about");
        handle_editor_key(&mut session, &mut editor, EditorKey::Enter);
        assert_eq!(editor.buffer(), "/about");
    }

    #[test]
    fn test_link_clicks() {
        let mut session = session(Duration::ZERO);
        let mut editor = LineEditor::new();

        handle_click(&mut session, &mut editor, HitTarget::Link(Link::new("https://example.com")));
        assert!(session.history().is_empty());

        handle_click(&mut session, &mut editor, HitTarget::Link(Link::new("/about")));
        assert_eq!(session.history()[0].plain_text(), "/about");
        assert_eq!(session.history()[1].plain_text(), "About me.");
    }

    #[test]
    fn test_transcript() {
        let mut session = session(Duration::ZERO);
        let now = Instant::now();
        session.start(now);
        session.submit("/nope", now);
        drain(&mut session);

        assert_eq!(
            transcript(session.history()),
            "Hi\n\nWelcome.\n\n❯ /nope\nCommand not found: /nope\nType /help for available commands.\n"
        );
    }
}
