use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

use svgpad::app::App;
use svgpad::config::Config;
use svgpad::{input, logging, project, ui};

#[derive(Parser, Debug)]
#[command(name = "svgpad")]
#[command(author, version, about = "Terminal SVG icon editor with completion and find/replace", long_about = None)]
struct Args {
    /// SVG file to open (created on first save if missing)
    #[arg(default_value = "icon.svg")]
    path: PathBuf,

    /// Create a new icon file with the given name in the current directory
    #[arg(short, long)]
    new: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let _log_guard = logging::init(&config.logging, &Config::data_dir()?)?;

    if let Some(name) = args.new {
        let dir = std::env::current_dir().context("Failed to read current directory")?;
        let path = project::create_new_project(&dir, &name)?;
        println!("Created new icon: {}", path.display());
        println!("Run: svgpad {}", path.display());
        return Ok(());
    }

    let mut app = App::new(&args.path, config)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    // Return rather than exit so the log guard flushes.
    if let Err(e) = result {
        error!(target: "app", error = %e, "exited with error");
        return Err(e);
    }

    info!(target: "app", "exited");
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let action = input::handle_event(app)?;
        app.tick(Instant::now());

        match action {
            input::Action::Quit => break,
            input::Action::Save => {
                if let Err(e) = app.save() {
                    app.report_error("Save failed", &e);
                }
            }
            input::Action::None => {}
        }
    }
    Ok(())
}
