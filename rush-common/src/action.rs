use crate::board::State;
use crate::piece::PieceId;

use std::fmt;
use std::ops::Neg;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, col) offset of a single step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

impl Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A candidate slide of one piece; applying it is `apply_move`'s job.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: PieceId,
    pub direction: Direction,
    pub steps: u8,
}

impl Move {
    pub fn new(piece: PieceId, direction: Direction, steps: u8) -> Self {
        Self {
            piece,
            direction,
            steps,
        }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.piece, -self.direction, self.steps)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {}", self.piece, self.direction, self.steps)
    }
}

/// Returns the state reached by sliding `mov.piece`; `state` is left untouched.
/// Moves naming the exit marker or an unknown piece yield an equal copy.
pub fn apply_move(state: &State, mov: &Move) -> State {
    let Some(piece) = state.pieces().get(mov.piece) else {
        return state.clone();
    };
    if piece.is_exit() {
        return state.clone();
    }

    let mut board = state.board().clone();
    for pos in piece.footprint() {
        board.set(pos, None);
    }
    let (d_row, d_col) = mov.direction.delta();
    let steps = mov.steps as i32;
    let moved = piece.shifted(d_row * steps, d_col * steps);
    for pos in moved.footprint() {
        board.set(pos, Some(moved.id));
    }

    State::from_parts(board, state.pieces().with_piece(moved))
}

/// The initial state followed by the state after each move.
pub fn replay(initial: &State, moves: &[Move]) -> Vec<State> {
    let mut states = Vec::with_capacity(moves.len() + 1);
    states.push(initial.clone());
    for mov in moves {
        let next = apply_move(&states[states.len() - 1], mov);
        states.push(next);
    }
    states
}

pub fn format_moves(moves: &[Move]) -> String {
    let list: Vec<String> = moves.iter().map(|mov| mov.to_string()).collect();

    let mut output = String::new();
    let max_width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    for chunk in list.chunks(10) {
        for cmd in chunk {
            output.push_str(&format!("{cmd:<width$}", width = max_width));
        }
        output.truncate(output.trim_end().len());
        output.push('\n');
    }

    output
}

/// Human-readable solution: the starting board, then every move followed by
/// the board it produces.
pub fn transcript(initial: &State, moves: &[Move]) -> String {
    let states = replay(initial, moves);
    let mut output = String::from("Starting Board\n");
    output.push_str(&initial.pretty_print());
    output.push('\n');
    for (i, (mov, state)) in moves.iter().zip(&states[1..]).enumerate() {
        let plural = if mov.steps == 1 { "" } else { "s" };
        output.push_str(&format!(
            "\nMove {}: {}-{} {} step{plural}\n",
            i + 1,
            mov.piece,
            mov.direction,
            mov.steps
        ));
        output.push_str(&state.pretty_print());
        output.push('\n');
    }
    output
}
