//! Graph-search solvers for Rush Hour puzzles: uniform-cost, A*, greedy
//! best-first, fringe and beam search over immutable board snapshots.

pub mod heuristic;
pub mod movegen;
pub mod node;
pub mod queue;
pub mod search;

pub use crate::heuristic::{Heuristic, UNREACHABLE};
pub use crate::movegen::possible_moves;
pub use crate::search::{
    DEFAULT_BEAM_WIDTH, SolveResult, Strategy, astar, beam, fringe, greedy, solve, ucs,
};
