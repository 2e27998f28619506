use anyhow::{Result, bail};
use rush_common::{action::Move, board::State};
use rush_solver::{SolveResult, Strategy, solve};

use std::{
    io::{IsTerminal, Write, stderr},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

pub fn do_solve(state: &State, strategy: Strategy) -> Result<Vec<Move>> {
    println!("{}\n", state.pretty_print());
    let SolveResult {
        found,
        moves,
        nodes_visited,
        elapsed,
    } = with_progress(&format!("Solving with {strategy}..."), || {
        solve(state, strategy)
    });
    let elapsed_str = format_elapsed(elapsed);
    if !found {
        bail!("No solution found (Time: {elapsed_str}, Nodes: {nodes_visited})");
    }
    let plural = if moves.len() == 1 { "" } else { "s" };
    println!(
        "✓ Solved in {} Move{plural} — Time: {elapsed_str}, Nodes: {nodes_visited}\n",
        moves.len()
    );
    Ok(moves)
}

const TICK: Duration = Duration::from_millis(100);

/// Runs `solve` while stderr shows `message` with a spinner and the time
/// spent so far. Without a terminal the search runs silently.
fn with_progress<T>(message: &str, solve: impl FnOnce() -> T) -> T {
    if !stderr().is_terminal() {
        return solve();
    }
    let done = Arc::new(AtomicBool::new(false));
    let ticker = {
        let done = Arc::clone(&done);
        let message = message.to_owned();
        std::thread::spawn(move || tick(&message, &done))
    };
    let result = solve();
    done.store(true, Ordering::Relaxed);
    let _ = ticker.join();
    result
}

fn tick(message: &str, done: &AtomicBool) {
    const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
    let started = Instant::now();
    let mut err = stderr();
    let _ = write!(err, "\x1b[?25l");
    for frame in FRAMES.iter().cycle() {
        if done.load(Ordering::Relaxed) {
            break;
        }
        let elapsed = format_elapsed(started.elapsed());
        let _ = write!(err, "\r\x1b[2K{frame} {message} {elapsed}");
        let _ = err.flush();
        std::thread::sleep(TICK);
    }
    let _ = write!(err, "\r\x1b[2K\x1b[?25h");
    let _ = err.flush();
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs == 0 {
        let ms = elapsed.as_secs_f64() * 1000.0;
        format!("{ms:.2}ms")
    } else if secs < 90 {
        let ms = elapsed.subsec_millis();
        format!("{secs}.{ms:03}s")
    } else {
        let minutes = secs / 60;
        let secs = secs % 60;
        format!("{minutes}m {secs}s")
    }
}
