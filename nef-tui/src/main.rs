//! TUI entrypoint: builds a demo network, finalizes it, and shows its inputs
//! as a 2D trace (time on X, input dimensions on Y) next to its structure.
//! Controls: [s] Step, [r] Run/Pause, [Tab]/[←→]/[↑↓] adjust inputs, [q] Quit

mod app;
mod backend;
mod ui;

use anyhow::{Context, Result};
use app::{App, NUDGE};
use backend::HandleBackend;
use clap::{Parser, ValueEnum};
use ui::draw;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    execute, terminal,
};
use nef_core::Network;
use nef_templates::demos;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Demo {
    BasalGanglia,
    LearnCommunication,
}

#[derive(Debug, Parser)]
#[command(name = "nef-tui", about = "Build a demo network and inspect it")]
struct Args {
    /// Network to build
    #[arg(long, value_enum, default_value = "basal-ganglia")]
    demo: Demo,

    /// Actions in the basal ganglia demo
    #[arg(long, default_value_t = 5)]
    dimensions: usize,

    /// Seed of the white-noise input (learning demo)
    #[arg(long, default_value_t = demos::NOISE_SEED)]
    noise_seed: u64,

    /// Seed of the learned starting weights (learning demo)
    #[arg(long, default_value_t = demos::WEIGHT_SEED)]
    weight_seed: u64,

    /// Print the finalized network as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Write logs here (RUST_LOG filters, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Terminal output would corrupt the UI; only headless dumps log to stderr
        None if args.dump => {
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
        }
        None => {}
    }
    Ok(())
}

fn build(args: &Args) -> Result<Network> {
    let net = match args.demo {
        Demo::BasalGanglia => demos::basal_ganglia(args.dimensions)?,
        #[cfg(feature = "learning")]
        Demo::LearnCommunication => demos::learn_communication(args.noise_seed, args.weight_seed)?,
        #[cfg(not(feature = "learning"))]
        Demo::LearnCommunication => anyhow::bail!("built without the \"learning\" feature"),
    };
    Ok(net)
}

fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    // Leave alternate screen and show cursor
    execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    tracing::info!(target: "nef-tui", "building {:?} demo", args.demo);

    let mut net = build(&args).context("building network")?;
    let handle = net.finalize()?;

    if args.dump {
        println!("{}", handle.to_json()?);
        return Ok(());
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Ensure terminal is restored on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));

    // App state
    // 80 trace columns, 10 ms of model time per tick
    let mut app = App::new(HandleBackend::new(handle), 80, 0.01);
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    // Event loop
    loop {
        draw(&mut terminal, &app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('s') => app.step(),
                    KeyCode::Char('r') => app.toggle_running(),
                    KeyCode::Tab => app.next_control(),
                    KeyCode::Left => app.move_dim(false),
                    KeyCode::Right => app.move_dim(true),
                    KeyCode::Up => app.nudge(NUDGE),
                    KeyCode::Down => app.nudge(-NUDGE),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if app.running {
                app.step();
            }
            last_tick = Instant::now();
        }
    }

    // Cleanup
    restore_terminal()?;
    Ok(())
}
