//! tabterm - interactive demo of the tab container
//!
//! Drives a container of headless sessions from line commands on stdin and
//! draws the tab bar after every command.
//!
//! # Commands
//!
//! | Command | Action |
//! |---------|--------|
//! | new | Open a session |
//! | select N | Select tab N (1-based) |
//! | click COL | Click the tab bar at column COL |
//! | menu N | Draw the context menu of tab N |
//! | close N | Close tab N through its context menu |
//! | list | Show mode, current session and tabs |
//! | quit | Exit |

use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tabterm::config::Config;
use tabterm::core::{HeadlessFactory, RequestOrigin, SessionChangeListener, SessionError, SessionId, Size};
use tabterm::ui::{ContextMenu, TabBarRenderer};
use tabterm::wm::{ContainerActor, ContainerEvent, ContainerHandle, DisplayMode, TabContainer};

/// Command line options
#[derive(Debug, Default)]
struct Options {
    /// Hide the tab bar regardless of config
    no_tab_bar: bool,
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    eprintln!("tabterm {} - tabbed terminal session container demo", VERSION);
    eprintln!();
    eprintln!("Usage: tabterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --no-tab-bar          Do not draw the tab bar");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    print_commands();
}

fn print_commands() {
    eprintln!("Commands (one per line on stdin):");
    eprintln!("  new                   Open a session");
    eprintln!("  select N              Select tab N (1-based)");
    eprintln!("  click COL             Click the tab bar at column COL");
    eprintln!("  menu N                Draw the context menu of tab N");
    eprintln!("  close N               Close tab N via its context menu");
    eprintln!("  list                  Show mode, current session and tabs");
    eprintln!("  help                  Show this list");
    eprintln!("  quit                  Exit");
}

/// Returns `None` when the program should exit (help/version)
fn parse_args() -> anyhow::Result<Option<Options>> {
    let mut options = Options::default();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(None);
            }
            "-v" | "--version" => {
                eprintln!("tabterm {}", VERSION);
                return Ok(None);
            }
            "--no-tab-bar" => options.no_tab_bar = true,
            other => bail!("Unknown option: {}", other),
        }
    }
    Ok(Some(options))
}

fn init_logging() {
    let log_path = Config::config_dir()
        .map(|dir| dir.join("tabterm.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("tabterm.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env("TABTERM_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Prints notifications as they arrive from the actor thread
struct PrintListener;

impl SessionChangeListener for PrintListener {
    fn on_panel_resize(&self, size: Size, origin: RequestOrigin) {
        info!(%size, %origin, "Panel resized");
        println!("* panel resized to {} ({})", size, origin);
    }

    fn on_session_changed(&self, session: SessionId) {
        info!(session, "Current session changed");
        println!("* current session: {}", session);
    }
}

struct Demo {
    handle: ContainerHandle<SessionError>,
    renderer: TabBarRenderer,
    menu: ContextMenu,
    show_tab_bar: bool,
    width: u16,
    height: u16,
}

impl Demo {
    fn dispatch(&self, event: ContainerEvent) -> anyhow::Result<()> {
        match event {
            ContainerEvent::CreateSession => {
                let id = self.handle.create_session()?;
                println!("opened session {}", id);
            }
            ContainerEvent::SelectTab(index) => self.handle.select_tab(index)?,
            ContainerEvent::CloseTab(id) => {
                self.handle.close(id)?;
                println!("closed session {}", id);
            }
        }
        Ok(())
    }

    /// Resolve a 1-based tab number to (index, session id)
    fn tab(&self, arg: Option<&str>) -> anyhow::Result<(usize, SessionId)> {
        let number: usize = arg
            .ok_or_else(|| anyhow!("missing tab number"))?
            .parse()
            .context("tab number must be a positive integer")?;
        let snapshot = self.handle.snapshot()?;
        number
            .checked_sub(1)
            .and_then(|index| snapshot.tabs.get(index).map(|t| (index, t.id)))
            .ok_or_else(|| anyhow!("no tab {}", number))
    }

    fn open_menu(&mut self, index: usize, session: SessionId) -> anyhow::Result<()> {
        let snapshot = self.handle.snapshot()?;
        let col = TabBarRenderer::tab_column(&snapshot.tabs, index).unwrap_or(0);
        self.menu.show(session, col, 1, self.width, self.height);
        Ok(())
    }

    fn run_command(&mut self, line: &str) -> anyhow::Result<bool> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Ok(true);
        };
        let arg = parts.next();

        match command {
            "new" => self.dispatch(ContainerEvent::CreateSession)?,
            "select" => {
                let (index, _) = self.tab(arg)?;
                self.dispatch(ContainerEvent::SelectTab(index))?;
            }
            "click" => {
                let col: u16 = arg
                    .ok_or_else(|| anyhow!("missing column"))?
                    .parse()
                    .context("column must be a number")?;
                let tabs = self.handle.snapshot()?.tabs;
                match TabBarRenderer::tab_at(&tabs, col) {
                    Some(index) => self.dispatch(ContainerEvent::SelectTab(index))?,
                    None => println!("no tab at column {}", col),
                }
            }
            "menu" => {
                let (index, id) = self.tab(arg)?;
                self.open_menu(index, id)?;
                self.draw_menu()?;
                self.menu.hide();
            }
            "close" => {
                let (index, id) = self.tab(arg)?;
                self.open_menu(index, id)?;
                let action = self
                    .menu
                    .select_shortcut("x")
                    .ok_or_else(|| anyhow!("context menu has no close entry"))?;
                let target = self.menu.target_session.unwrap_or(id);
                self.menu.hide();
                if let Some(event) = ContainerEvent::from_menu_action(target, action) {
                    self.dispatch(event)?;
                }
            }
            "list" => {
                let snapshot = self.handle.snapshot()?;
                println!("mode: {:?}", snapshot.mode);
                match snapshot.current {
                    Some(id) => println!("current: session {}", id),
                    None => println!("current: none"),
                }
                for (i, tab) in snapshot.tabs.iter().enumerate() {
                    let marker = if tab.selected { "*" } else { " " };
                    println!("{} {}: {} (session {})", marker, i + 1, tab.label, tab.id);
                }
            }
            "help" => print_commands(),
            "quit" | "exit" => return Ok(false),
            other => println!("unknown command: {} (try 'help')", other),
        }
        Ok(true)
    }

    /// Clear the screen and draw the tab bar with the open menu below it
    fn draw_menu(&self) -> anyhow::Result<()> {
        let tabs = self.handle.snapshot()?.tabs;
        let mut out = io::stdout();
        execute!(out, Clear(ClearType::All))?;
        self.renderer.render(&mut out, &tabs, 0, self.width)?;
        self.renderer.render_context_menu(&mut out, &self.menu)?;
        let (_, height) = self.menu.dimensions();
        execute!(out, MoveTo(0, self.menu.y.saturating_add(height)))?;
        writeln!(out)?;
        Ok(())
    }

    fn render(&self) -> anyhow::Result<()> {
        let snapshot = self.handle.snapshot()?;
        if !self.show_tab_bar || snapshot.mode != DisplayMode::Tabbed {
            return Ok(());
        }
        let mut out = io::stdout();
        self.renderer.render_line(&mut out, &snapshot.tabs, self.width)?;
        writeln!(out)?;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(Some(options)) => options,
        Ok(None) => return Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("tabterm starting...");

    let config = Config::load();
    let factory = HeadlessFactory::new(config.session.cols, config.session.rows);
    let naming = config.tab_naming();
    let actor = ContainerActor::spawn(move || TabContainer::with_naming(factory, naming));

    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut demo = Demo {
        handle: actor.handle(),
        renderer: TabBarRenderer::new(config.get_color_scheme()),
        menu: ContextMenu::new(),
        show_tab_bar: config.tab_bar.visible && !options.no_tab_bar,
        width,
        height,
    };

    demo.handle.set_session_change_listener(Arc::new(PrintListener))?;
    demo.dispatch(ContainerEvent::CreateSession)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match demo.run_command(line.trim()) {
            Ok(true) => demo.render()?,
            Ok(false) => break,
            Err(e) => println!("error: {:#}", e),
        }
    }

    actor.shutdown();
    info!("tabterm exiting");
    Ok(())
}
