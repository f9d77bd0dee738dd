use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use ghost_desk::app::App;
use ghost_desk::chance::{Chance, RngChance};
use ghost_desk::error::DeskError;
use ghost_desk::runner::Runner;
use ghost_desk::tracing_sub;

#[derive(Debug, Parser)]
#[command(name = "ghost-desk", version, about = "A haunted late-90s desktop in your terminal")]
struct Args {
    /// Frame pacing in milliseconds.
    #[arg(long, default_value_t = 33)]
    tick_rate_ms: u64,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed the haunting rolls for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable mouse capture (keyboard only; mostly for debugging).
    #[arg(long)]
    no_mouse: bool,
}

fn main() -> Result<(), DeskError> {
    let args = Args::parse();
    match &args.log_file {
        Some(path) => tracing_sub::init_file(path)?,
        None => tracing_sub::init_default(),
    }

    let chance: Box<dyn Chance> = match args.seed {
        Some(seed) => Box::new(RngChance::seeded(seed)),
        None => Box::new(RngChance::from_entropy()),
    };
    let mut app = App::new(chance);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if !args.no_mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut runner = Runner::new(Duration::from_millis(args.tick_rate_ms.max(1)));
    let result = runner.run(&mut terminal, &mut app);

    terminal::disable_raw_mode()?;
    if !args.no_mouse {
        let _ = execute!(terminal.backend_mut(), DisableMouseCapture);
    }
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}
