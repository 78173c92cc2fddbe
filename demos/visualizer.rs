//! Terminal A* visualizer using crossterm.
//!
//! Run: cargo run --bin visualizer -- --rows 24 --log-file astar.log

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use gridpath_core::app::{App, AppConfig};
use gridpath_crossterm::CrosstermDriver;
use gridpath_demos::{Visualizer, VisualizerConfig};
use log::{LevelFilter, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive A* path finding on a square grid")]
struct Cli {
    /// Rows (and columns) of the board.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u16).range(2..=200))]
    rows: u16,

    /// Write logs to this file. Logging is off without it, since the board
    /// owns the terminal.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    let Some(path) = path else {
        log::set_max_level(LevelFilter::Off);
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let config = VisualizerConfig {
        rows: cli.rows as usize,
        ..VisualizerConfig::default()
    };
    let model = Visualizer::new(config);
    let (width, height) = model.size();
    info!("visualizer starting: {} rows, canvas {width}x{height}", config.rows);

    let mut app = App::new(AppConfig::new(model, CrosstermDriver::new(), width, height));
    app.run()?;

    info!("visualizer exited");
    Ok(())
}
