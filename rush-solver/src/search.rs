use crate::heuristic::Heuristic;
use crate::movegen::{PossibleMoves, compute_possible_moves};
use crate::node::{MoveTree, Node, by_estimate, by_priority};
use crate::queue::PriorityQueue;

use rush_common::action::{Move, apply_move};
use rush_common::board::{Signature, State};

use ahash::{AHashMap, AHashSet};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub const DEFAULT_BEAM_WIDTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub found: bool,
    pub moves: Vec<Move>,
    pub nodes_visited: usize,
    pub elapsed: Duration,
}

impl SolveResult {
    pub fn time_taken_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Ucs,
    AStar(Heuristic),
    Greedy(Heuristic),
    Fringe(Heuristic),
    Beam { heuristic: Heuristic, width: usize },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::AStar(Heuristic::default())
    }
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Ucs => "ucs",
            Strategy::AStar(_) => "astar",
            Strategy::Greedy(_) => "greedy",
            Strategy::Fringe(_) => "fringe",
            Strategy::Beam { .. } => "beam",
        }
    }

    pub fn heuristic(&self) -> Option<Heuristic> {
        match *self {
            Strategy::Ucs => None,
            Strategy::AStar(heuristic)
            | Strategy::Greedy(heuristic)
            | Strategy::Fringe(heuristic)
            | Strategy::Beam { heuristic, .. } => Some(heuristic),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Ucs => f.write_str("ucs"),
            Strategy::Beam { heuristic, width } => write!(f, "beam({heuristic}, {width})"),
            other => match other.heuristic() {
                Some(heuristic) => write!(f, "{}({heuristic})", other.name()),
                None => f.write_str(other.name()),
            },
        }
    }
}

pub fn solve(state: &State, strategy: Strategy) -> SolveResult {
    match strategy {
        Strategy::Ucs => ucs(state),
        Strategy::AStar(heuristic) => astar(state, |s| heuristic.evaluate(s)),
        Strategy::Greedy(heuristic) => greedy(state, |s| heuristic.evaluate(s)),
        Strategy::Fringe(heuristic) => fringe(state, |s| heuristic.evaluate(s)),
        Strategy::Beam { heuristic, width } => beam(state, |s| heuristic.evaluate(s), width),
    }
}

/// Uniform-cost search; every move costs 1, so the first solved state popped
/// carries a shortest solution.
pub fn ucs(state: &State) -> SolveResult {
    best_first(state, "ucs", |_| 0.0, |g, _| g as f64, true)
}

pub fn astar<H>(state: &State, heuristic: H) -> SolveResult
where
    H: Fn(&State) -> f64,
{
    best_first(state, "astar", heuristic, |g, h| g as f64 + h, true)
}

pub fn greedy<H>(state: &State, heuristic: H) -> SolveResult
where
    H: Fn(&State) -> f64,
{
    best_first(state, "greedy", heuristic, |_, h| h, false)
}

/// Shared open/closed loop. With `reopen`, a state is expanded again when it
/// is reached at a strictly lower depth; otherwise it is expanded once.
fn best_first<H, K>(
    state: &State,
    strategy: &'static str,
    heuristic: H,
    key: K,
    reopen: bool,
) -> SolveResult
where
    H: Fn(&State) -> f64,
    K: Fn(u32, f64) -> f64,
{
    let search = Search::start(strategy, state);
    let mut tree = MoveTree::new();
    let mut closed: AHashMap<Signature, u32> = AHashMap::new();
    let mut open = PriorityQueue::new(by_priority);
    let mut possible_moves = PossibleMoves::new();
    let mut seq = 0;
    let mut nodes_visited = 0;

    let is_closed = |closed: &AHashMap<Signature, u32>, signature: &Signature, g: u32| {
        closed
            .get(signature)
            .is_some_and(|&closed_g| !reopen || closed_g <= g)
    };

    let h = heuristic(state);
    open.push(Node::root(state, h, key(0, h)));

    while let Some(node) = open.pop() {
        nodes_visited += 1;
        if is_closed(&closed, &node.signature, node.g) {
            continue;
        }
        closed.insert(node.signature.clone(), node.g);

        if node.state.is_solved() {
            trace!(event = "goal_reached", depth = node.g, frontier = open.len());
            return search.finish(Some(tree.path(node.path)), nodes_visited);
        }

        possible_moves.clear();
        compute_possible_moves(&node.state, &mut possible_moves);
        for mov in &possible_moves {
            let next = apply_move(&node.state, mov);
            let signature = next.signature();
            let g = node.g + 1;
            if is_closed(&closed, &signature, g) {
                continue;
            }
            let h = heuristic(&next);
            seq += 1;
            open.push(Node {
                state: next,
                signature,
                g,
                h,
                f: key(g, h),
                seq,
                path: tree.push(node.path, *mov),
            });
        }
    }

    search.finish(None, nodes_visited)
}

/// Fringe search: each pass expands, in generation order, every node whose
/// `f` stays within the current limit. Successors over the limit wait for
/// the next pass, whose limit is the smallest `f` that exceeded this one.
pub fn fringe<H>(state: &State, heuristic: H) -> SolveResult
where
    H: Fn(&State) -> f64,
{
    let search = Search::start("fringe", state);
    let mut tree = MoveTree::new();
    let mut closed: AHashMap<Signature, u32> = AHashMap::new();
    let mut possible_moves = PossibleMoves::new();
    let mut seq = 0;
    let mut nodes_visited = 0;

    let h = heuristic(state);
    let mut limit = h;
    let mut now = vec![Node::root(state, h, h)];
    let mut later: Vec<Node> = Vec::new();

    loop {
        let mut next_limit = f64::INFINITY;
        while !now.is_empty() {
            let mut next: Vec<Node> = Vec::new();
            for node in now.drain(..) {
                nodes_visited += 1;
                if closed.get(&node.signature).is_some_and(|&g| g <= node.g) {
                    continue;
                }
                if node.f > limit {
                    next_limit = next_limit.min(node.f);
                    later.push(node);
                    continue;
                }
                closed.insert(node.signature.clone(), node.g);

                if node.state.is_solved() {
                    return search.finish(Some(tree.path(node.path)), nodes_visited);
                }

                possible_moves.clear();
                compute_possible_moves(&node.state, &mut possible_moves);
                for mov in &possible_moves {
                    let next_state = apply_move(&node.state, mov);
                    let signature = next_state.signature();
                    let g = node.g + 1;
                    if closed.get(&signature).is_some_and(|&closed_g| closed_g <= g) {
                        continue;
                    }
                    let h = heuristic(&next_state);
                    seq += 1;
                    let child = Node {
                        state: next_state,
                        signature,
                        g,
                        h,
                        f: g as f64 + h,
                        seq,
                        path: tree.push(node.path, *mov),
                    };
                    if child.f <= limit {
                        next.push(child);
                    } else {
                        next_limit = next_limit.min(child.f);
                        later.push(child);
                    }
                }
            }
            now = next;
        }

        if later.is_empty() || next_limit.is_infinite() {
            break;
        }
        trace!(event = "fringe_limit", limit = next_limit, deferred = later.len());
        limit = next_limit;
        std::mem::swap(&mut now, &mut later);
    }

    search.finish(None, nodes_visited)
}

/// Breadth-first by generation, keeping only the `beam_width` successors
/// with the lowest `h`. A state seen in any earlier generation is never
/// revisited, so the search ends once a generation has nothing new.
pub fn beam<H>(state: &State, heuristic: H, beam_width: usize) -> SolveResult
where
    H: Fn(&State) -> f64,
{
    let search = Search::start("beam", state);
    let mut tree = MoveTree::new();
    let mut visited: AHashSet<Signature> = AHashSet::new();
    let mut possible_moves = PossibleMoves::new();
    let mut seq = 0;
    let mut nodes_visited = 0;

    let h = heuristic(state);
    let mut generation = vec![Node::root(state, h, h)];
    let mut depth = 0;

    while !generation.is_empty() {
        let mut candidates: Vec<Node> = Vec::new();
        for node in generation {
            nodes_visited += 1;
            if !visited.insert(node.signature.clone()) {
                continue;
            }
            if node.state.is_solved() {
                return search.finish(Some(tree.path(node.path)), nodes_visited);
            }

            possible_moves.clear();
            compute_possible_moves(&node.state, &mut possible_moves);
            for mov in &possible_moves {
                let next = apply_move(&node.state, mov);
                let signature = next.signature();
                if visited.contains(&signature) {
                    continue;
                }
                let h = heuristic(&next);
                seq += 1;
                candidates.push(Node {
                    state: next,
                    signature,
                    g: node.g + 1,
                    h,
                    f: h,
                    seq,
                    path: tree.push(node.path, *mov),
                });
            }
        }

        candidates.sort_by(by_estimate);
        let mut seen: AHashSet<Signature> = AHashSet::with_capacity(candidates.len());
        candidates.retain(|node| seen.insert(node.signature.clone()));
        candidates.truncate(beam_width);

        depth += 1;
        trace!(event = "beam_generation", depth, width = candidates.len());
        generation = candidates;
    }

    search.finish(None, nodes_visited)
}

/// Start/finish bookkeeping common to every strategy.
struct Search {
    strategy: &'static str,
    timer: Instant,
}

impl Search {
    fn start(strategy: &'static str, state: &State) -> Self {
        debug!(
            event = "solve_start",
            strategy,
            width = state.board().width(),
            height = state.board().height(),
            pieces = state.pieces().len(),
        );
        Self {
            strategy,
            timer: Instant::now(),
        }
    }

    fn finish(self, moves: Option<Vec<Move>>, nodes_visited: usize) -> SolveResult {
        let elapsed = self.timer.elapsed();
        let found = moves.is_some();
        let moves = moves.unwrap_or_default();
        debug!(
            event = "solve_end",
            strategy = self.strategy,
            found,
            moves = moves.len(),
            nodes_visited,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        );
        SolveResult {
            found,
            moves,
            nodes_visited,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rush_common::action::{Direction, replay};
    use rush_common::piece::PieceId;

    const TWO_MOVES: &str = "6 6
1
......
....A.
..PPA.K
......
......
......
";

    fn all_strategies() -> Vec<Strategy> {
        let mut strategies = vec![Strategy::Ucs];
        for heuristic in Heuristic::ALL {
            strategies.push(Strategy::AStar(heuristic));
            strategies.push(Strategy::Greedy(heuristic));
            strategies.push(Strategy::Fringe(heuristic));
            strategies.push(Strategy::Beam {
                heuristic,
                width: DEFAULT_BEAM_WIDTH,
            });
        }
        strategies
    }

    #[test]
    fn test_two_moves() {
        let state = State::parse(TWO_MOVES).unwrap();
        let expected = vec![
            Move::new(PieceId::new('A').unwrap(), Direction::Up, 1),
            Move::new(PieceId::PRIMARY, Direction::Right, 3),
        ];
        assert_eq!(ucs(&state).moves, expected);
        assert_eq!(solve(&state, Strategy::default()).moves, expected);
        assert_eq!(fringe(&state, crate::heuristic::combined).moves, expected);

        for strategy in all_strategies() {
            let result = solve(&state, strategy);
            assert!(result.found, "{strategy}");
            assert!(result.nodes_visited > 0);
            let states = replay(&state, &result.moves);
            assert!(states.last().unwrap().is_solved(), "{strategy}");
        }
    }

    #[test]
    fn test_already_solved() {
        let state = State::parse("6 6\n0\n......\n......\n....PPK\n......\n......\n......\n").unwrap();
        let state = apply_move(&state, &Move::new(PieceId::PRIMARY, Direction::Right, 1));
        for strategy in all_strategies() {
            let result = solve(&state, strategy);
            assert!(result.found);
            assert!(result.moves.is_empty());
            assert_eq!(result.nodes_visited, 1);
        }
    }

    #[test]
    fn test_custom_heuristic() {
        let state = State::parse(TWO_MOVES).unwrap();
        assert_eq!(astar(&state, crate::heuristic::blocking_count).moves.len(), 2);
        assert_eq!(fringe(&state, |_| 0.0).moves.len(), 2);
    }

    #[test]
    fn test_zero_beam_width() {
        let state = State::parse(TWO_MOVES).unwrap();
        let result = beam(&state, crate::heuristic::combined, 0);
        assert!(!result.found);
        assert_eq!(result.nodes_visited, 1);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Ucs.to_string(), "ucs");
        assert_eq!(Strategy::default().to_string(), "astar(combined)");
        let beam = Strategy::Beam {
            heuristic: Heuristic::BlockingCount,
            width: 8,
        };
        assert_eq!(beam.to_string(), "beam(blocking, 8)");
        assert_eq!(beam.heuristic(), Some(Heuristic::BlockingCount));
    }

    #[test]
    fn test_time_taken_ms() {
        let result = SolveResult {
            found: false,
            moves: vec![],
            nodes_visited: 0,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(result.time_taken_ms(), 1500.0);
    }
}
