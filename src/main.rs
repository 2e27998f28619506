mod utils;

use crate::utils::*;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use rush_common::{
    action::{format_moves, transcript},
    board::State,
};
use rush_solver::{DEFAULT_BEAM_WIDTH, Heuristic, Strategy};
use tracing::debug;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use std::{
    io::{IsTerminal, Read, stdin},
    path::PathBuf,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Search strategy
    #[arg(short, long, value_enum, default_value_t = StrategyKind::Astar)]
    strategy: StrategyKind,
    /// Heuristic for informed strategies (ignored by ucs)
    #[arg(short = 'H', long, value_enum, default_value_t = HeuristicKind::Combined)]
    heuristic: HeuristicKind,
    /// Successors kept per generation in beam search
    #[arg(short, long, default_value_t = DEFAULT_BEAM_WIDTH, value_name = "NUM")]
    beam_width: usize,
    /// Preview the puzzle without solving
    #[arg(short, long)]
    preview: bool,
    /// Write a board-by-board transcript of the solution to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Log search events (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
    /// Path to a puzzle file to solve
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyKind {
    Ucs,
    Astar,
    Greedy,
    Fringe,
    Beam,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeuristicKind {
    Distance,
    Blocking,
    Recursive,
    Moves,
    Combined,
}

impl From<HeuristicKind> for Heuristic {
    fn from(kind: HeuristicKind) -> Self {
        match kind {
            HeuristicKind::Distance => Heuristic::DistanceToExit,
            HeuristicKind::Blocking => Heuristic::BlockingCount,
            HeuristicKind::Recursive => Heuristic::RecursiveBlockers,
            HeuristicKind::Moves => Heuristic::MoveNeededEstimate,
            HeuristicKind::Combined => Heuristic::Combined,
        }
    }
}

fn strategy_of(kind: StrategyKind, heuristic: Heuristic, beam_width: usize) -> Strategy {
    match kind {
        StrategyKind::Ucs => Strategy::Ucs,
        StrategyKind::Astar => Strategy::AStar(heuristic),
        StrategyKind::Greedy => Strategy::Greedy(heuristic),
        StrategyKind::Fringe => Strategy::Fringe(heuristic),
        StrategyKind::Beam => Strategy::Beam {
            heuristic,
            width: beam_width,
        },
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let Cli {
        strategy,
        heuristic,
        beam_width,
        preview,
        output,
        verbose,
        file,
    } = Cli::parse();
    init_logging(verbose);

    let content = if let Some(file) = file {
        std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read '{}'", file.display()))?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        content
    } else {
        bail!("No puzzle `file` provided.");
    };
    let state = State::parse(&content).context("Failed to parse puzzle")?;
    debug!(
        event = "puzzle_loaded",
        width = state.board().width(),
        height = state.board().height(),
        pieces = state.pieces().len(),
    );
    if preview {
        println!("{}", state.pretty_print());
        return Ok(());
    }
    if beam_width == 0 {
        bail!("Beam width must be at least 1.");
    }

    let strategy = strategy_of(strategy, heuristic.into(), beam_width);
    let moves = do_solve(&state, strategy)?;
    print!("{}", format_moves(&moves));

    if let Some(path) = output {
        std::fs::write(&path, transcript(&state, &moves))
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        println!("\nTranscript written to {}", path.display());
    }

    Ok(())
}
