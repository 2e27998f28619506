use rush_common::board::State;
use rush_common::piece::{Orientation, Piece, PieceId, Position};

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt;

/// Returned when the primary piece can never reach the exit.
pub const UNREACHABLE: f64 = f64::INFINITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    DistanceToExit,
    BlockingCount,
    RecursiveBlockers,
    MoveNeededEstimate,
    #[default]
    Combined,
}

impl Heuristic {
    pub const ALL: [Heuristic; 5] = [
        Heuristic::DistanceToExit,
        Heuristic::BlockingCount,
        Heuristic::RecursiveBlockers,
        Heuristic::MoveNeededEstimate,
        Heuristic::Combined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::DistanceToExit => "distance",
            Heuristic::BlockingCount => "blocking",
            Heuristic::RecursiveBlockers => "recursive",
            Heuristic::MoveNeededEstimate => "moves",
            Heuristic::Combined => "combined",
        }
    }

    pub fn evaluate(self, state: &State) -> f64 {
        match self {
            Heuristic::DistanceToExit => distance_to_exit(state),
            Heuristic::BlockingCount => blocking_count(state),
            Heuristic::RecursiveBlockers => recursive_blockers(state),
            Heuristic::MoveNeededEstimate => move_needed_estimate(state),
            Heuristic::Combined => combined(state),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cells `from..=to` along one row or column.
#[derive(Debug, Clone, Copy)]
struct Segment {
    orientation: Orientation,
    lane: i32,
    from: i32,
    to: i32,
}

impl Segment {
    fn cells(self) -> impl Iterator<Item = Position> {
        (self.from..=self.to).map(move |k| match self.orientation {
            Orientation::Vertical => Position::new(k, self.lane),
            _ => Position::new(self.lane, k),
        })
    }

    /// Interval on `piece`'s axis the piece has to leave to stop covering
    /// any cell of this segment.
    fn span_for(self, piece: &Piece) -> (i32, i32) {
        if piece.orientation == self.orientation {
            (self.from, self.to)
        } else {
            (self.lane, self.lane)
        }
    }
}

/// The primary's lane towards the exit: the exit coordinate along the
/// primary's axis and the cells strictly between footprint and exit.
struct Lane {
    primary: Piece,
    exit_at: i32,
    corridor: Segment,
}

fn lane(state: &State) -> Option<Lane> {
    let pieces = state.pieces();
    let primary = *pieces.primary()?;
    let exit = pieces.exit()?;
    if primary.across(exit.pos) != primary.lane() {
        return None;
    }
    let exit_at = primary.along(exit.pos);
    let (from, to) = if exit_at > primary.end() {
        (primary.end() + 1, exit_at - 1)
    } else {
        (exit_at + 1, primary.start() - 1)
    };
    let corridor = Segment {
        orientation: primary.orientation,
        lane: primary.lane(),
        from,
        to,
    };
    Some(Lane {
        primary,
        exit_at,
        corridor,
    })
}

/// Distinct occupants of `segment`, in cell order.
fn occupants(state: &State, segment: Segment) -> SmallVec<[PieceId; 8]> {
    let mut ids = SmallVec::new();
    for pos in segment.cells() {
        if let Some(id) = state.board().get(pos) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// The two sweeps (towards lower, then higher coordinates) `piece` must make
/// to vacate `span`. A sweep is empty when the piece is already clear on
/// that side.
fn escape_sweeps(piece: &Piece, span: (i32, i32)) -> [Segment; 2] {
    let lane = piece.lane();
    let backward = piece.end() - span.0 + 1;
    let forward = span.1 - piece.start() + 1;
    [
        Segment {
            orientation: piece.orientation,
            lane,
            from: piece.start() - backward,
            to: piece.start() - 1,
        },
        Segment {
            orientation: piece.orientation,
            lane,
            from: piece.end() + 1,
            to: piece.end() + forward,
        },
    ]
}

fn sweep_available(state: &State, sweep: Segment, primary: PieceId) -> bool {
    sweep.cells().all(|pos| {
        state.board().contains(pos) && state.board().get(pos) != Some(primary)
    })
}

/// Steps the primary still has to slide, counting the one onto the exit.
pub fn distance_to_exit(state: &State) -> f64 {
    let Some(Lane {
        primary, exit_at, ..
    }) = lane(state)
    else {
        return UNREACHABLE;
    };
    let gap = if exit_at > primary.end() {
        exit_at - primary.end()
    } else {
        primary.start() - exit_at
    };
    gap.max(0) as f64
}

pub fn blocking_count(state: &State) -> f64 {
    match lane(state) {
        Some(lane) => occupants(state, lane.corridor).len() as f64,
        None => UNREACHABLE,
    }
}

/// Sums, over the direct blockers, 1 plus the cheaper way of making room for
/// each of them. Every piece is charged at most once per evaluation, so the
/// value depends on the order blockers are visited in.
pub fn recursive_blockers(state: &State) -> f64 {
    let Some(Lane {
        primary, corridor, ..
    }) = lane(state)
    else {
        return UNREACHABLE;
    };
    let mut walk = BlockerWalk {
        state,
        primary: primary.id,
        visited: FxHashSet::default(),
    };
    walk.visited.insert(primary.id);

    let mut total = 0;
    for id in occupants(state, corridor) {
        if walk.visited.contains(&id) {
            continue;
        }
        if let Some(piece) = state.pieces().get(id) {
            total += walk.value(piece, corridor.span_for(piece));
        }
    }
    total as f64
}

struct BlockerWalk<'a> {
    state: &'a State,
    primary: PieceId,
    visited: FxHashSet<PieceId>,
}

impl BlockerWalk<'_> {
    fn value(&mut self, piece: &Piece, span: (i32, i32)) -> u32 {
        let state = self.state;
        self.visited.insert(piece.id);

        let mut best: Option<u32> = None;
        for sweep in escape_sweeps(piece, span) {
            if !sweep_available(state, sweep, self.primary) {
                continue;
            }
            let mut cost = 0;
            for id in occupants(state, sweep) {
                if self.visited.contains(&id) {
                    continue;
                }
                if let Some(other) = state.pieces().get(id) {
                    cost += self.value(other, sweep.span_for(other));
                }
            }
            best = Some(best.map_or(cost, |best| best.min(cost)));
        }
        1 + best.unwrap_or(0)
    }
}

/// One move per blocker that can clear the lane with a single slide through
/// empty cells, two for every other blocker.
pub fn move_needed_estimate(state: &State) -> f64 {
    let Some(Lane { corridor, .. }) = lane(state) else {
        return UNREACHABLE;
    };
    let mut total = 0;
    for id in occupants(state, corridor) {
        let Some(piece) = state.pieces().get(id) else {
            continue;
        };
        let one_slide = escape_sweeps(piece, corridor.span_for(piece))
            .into_iter()
            .any(|sweep| sweep.cells().all(|pos| state.board().is_vacant(pos)));
        total += if one_slide { 1 } else { 2 };
    }
    total as f64
}

pub fn combined(state: &State) -> f64 {
    distance_to_exit(state) + blocking_count(state) + 0.5 * move_needed_estimate(state)
}
