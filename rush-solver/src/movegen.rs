use rush_common::action::{Direction, Move};
use rush_common::board::{Board, State};
use rush_common::piece::{Orientation, Piece, Position};

use smallvec::SmallVec;

pub type PossibleMoves = SmallVec<[Move; 64]>;

pub fn possible_moves(state: &State) -> PossibleMoves {
    let mut moves = PossibleMoves::new();
    compute_possible_moves(state, &mut moves);
    moves
}

/// Appends every legal single-piece slide, one move per reachable stopping
/// cell. The primary piece may additionally slide onto the exit when it lies
/// just past the edge in its lane.
pub fn compute_possible_moves(state: &State, possible_moves: &mut PossibleMoves) {
    let board = state.board();
    let exit = state
        .pieces()
        .exit()
        .map(|piece| piece.pos)
        .filter(|&pos| board.is_beyond_edge(pos));

    for piece in state.pieces().movable() {
        let (backward, forward) = match piece.orientation {
            Orientation::Horizontal => (Direction::Left, Direction::Right),
            Orientation::Vertical => (Direction::Up, Direction::Down),
            Orientation::Unknown => continue,
        };
        let exit = exit.filter(|_| piece.primary);
        probe(board, piece, backward, exit, possible_moves);
        probe(board, piece, forward, exit, possible_moves);
    }
}

fn probe(
    board: &Board,
    piece: &Piece,
    direction: Direction,
    exit: Option<Position>,
    possible_moves: &mut PossibleMoves,
) {
    let (d_row, d_col) = direction.delta();
    let mut target = match direction {
        Direction::Up | Direction::Left => piece.cell(0),
        Direction::Down | Direction::Right => piece.cell(piece.size as i32 - 1),
    };
    for steps in 1..=u8::MAX {
        target = target.offset(d_row, d_col);
        if board.is_vacant(target) {
            possible_moves.push(Move::new(piece.id, direction, steps));
            continue;
        }
        if exit == Some(target) {
            possible_moves.push(Move::new(piece.id, direction, steps));
        }
        break;
    }
}
