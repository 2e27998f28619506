use crate::error::StateError;
use crate::piece::{EMPTY_SYMBOL, Orientation, Piece, PieceId, PieceMap, Position};

use std::fmt;

/// Largest width or height; a single slide never exceeds `u8` steps.
pub const MAX_DIMENSION: usize = u8::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<PieceId>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Occupant of `pos`; `None` for empty and off-grid cells alike.
    pub fn get(&self, pos: Position) -> Option<PieceId> {
        self.index(pos).and_then(|idx| self.cells[idx])
    }

    /// True for an in-grid cell holding nothing.
    pub fn is_vacant(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|idx| self.cells[idx].is_none())
    }

    /// True when `pos` lies exactly one step outside the grid, next to an edge
    /// cell (corners excluded).
    pub fn is_beyond_edge(&self, pos: Position) -> bool {
        let (width, height) = (self.width as i32, self.height as i32);
        let row_inside = (0..height).contains(&pos.row);
        let col_inside = (0..width).contains(&pos.col);
        ((pos.row == -1 || pos.row == height) && col_inside)
            || ((pos.col == -1 || pos.col == width) && row_inside)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<PieceId>]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Row-major flattening of the grid, one byte per cell.
    pub fn signature(&self) -> Signature {
        Signature(
            self.cells
                .iter()
                .map(|cell| cell.map_or(EMPTY_SYMBOL, |id| id.symbol()))
                .collect(),
        )
    }

    pub(crate) fn set(&mut self, pos: Position, value: Option<PieceId>) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = value;
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }
}

/// Canonical occupancy key used by closed lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(Box<[u8]>);

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// A consistent (Board, PieceMap) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    board: Board,
    pieces: PieceMap,
}

impl State {
    /// Places every piece on an empty `width` x `height` grid and checks that the
    /// result is searchable.
    pub fn new(width: usize, height: usize, pieces: PieceMap) -> Result<Self, StateError> {
        if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
            return Err(StateError::InvalidDimensions { width, height });
        }
        let mut board = Board::new(width, height);
        let mut primary: Option<&Piece> = None;
        let mut exit: Option<&Piece> = None;

        for piece in pieces.iter() {
            if piece.is_exit() {
                if piece.primary {
                    return Err(StateError::PrimaryNotMovable(piece.id));
                }
                if piece.size != 1 {
                    return Err(StateError::InvalidExitSize);
                }
                if exit.replace(piece).is_some() {
                    return Err(StateError::MultipleExits);
                }
                continue;
            }
            if piece.size < 2 {
                return Err(StateError::PieceTooShort(piece.id));
            }
            if piece.primary && primary.replace(piece).is_some() {
                return Err(StateError::MultiplePrimaries);
            }
            for pos in piece.footprint() {
                if !board.contains(pos) {
                    return Err(StateError::OutOfBounds(piece.id));
                }
                if let Some(first) = board.get(pos) {
                    return Err(StateError::Overlap {
                        row: pos.row,
                        col: pos.col,
                        first,
                        second: piece.id,
                    });
                }
                board.set(pos, Some(piece.id));
            }
        }

        let primary = primary.ok_or(StateError::MissingPrimary)?;
        let exit = exit.ok_or(StateError::MissingExit)?;
        if !board.is_beyond_edge(exit.pos) {
            return Err(StateError::ExitNotOnEdge);
        }
        let axis_len = match primary.orientation {
            Orientation::Vertical => height as i32,
            _ => width as i32,
        };
        let exit_at = primary.along(exit.pos);
        if primary.across(exit.pos) != primary.lane() || (exit_at != -1 && exit_at != axis_len) {
            return Err(StateError::MisalignedExit);
        }

        Ok(Self { board, pieces })
    }

    pub(crate) fn from_parts(board: Board, pieces: PieceMap) -> Self {
        Self { board, pieces }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pieces(&self) -> &PieceMap {
        &self.pieces
    }

    pub fn signature(&self) -> Signature {
        self.board.signature()
    }

    /// Goal test, decided from the piece map alone: the primary piece shares a
    /// lane with the exit and its footprint has reached the exit coordinate.
    pub fn is_solved(&self) -> bool {
        let (Some(primary), Some(exit)) = (self.pieces.primary(), self.pieces.exit()) else {
            return false;
        };
        if primary.is_exit() || primary.across(exit.pos) != primary.lane() {
            return false;
        }
        let exit_at = primary.along(exit.pos);
        if exit_at > primary.start() {
            primary.end() >= exit_at
        } else {
            primary.start() <= exit_at
        }
    }

    /// Renders the grid with the exit drawn in the margin it sits in.
    pub fn pretty_print(&self) -> String {
        let width = self.board.width as i32;
        let height = self.board.height as i32;
        let exit = self.pieces.exit().map(|piece| piece.pos);
        let exit_symbol = match (self.pieces.primary(), exit) {
            (Some(primary), Some(pos)) if primary.occupies(pos) => primary.id.as_char(),
            _ => PieceId::EXIT.as_char(),
        };
        let symbol = |cell: &Option<PieceId>| cell.map_or(EMPTY_SYMBOL as char, |id| id.as_char());
        let margin_line = |col: i32| format!("{}{exit_symbol}", " ".repeat(col.max(0) as usize));

        let mut lines = Vec::with_capacity(self.board.height + 1);
        if let Some(pos) = exit.filter(|pos| pos.row == -1) {
            lines.push(margin_line(pos.col));
        }
        for (row, cells) in self.board.rows().enumerate() {
            let row = row as i32;
            let mut line = String::with_capacity(self.board.width + 1);
            match exit {
                Some(pos) if pos.col == -1 && pos.row == row => line.push(exit_symbol),
                Some(pos) if pos.col == -1 => line.push(' '),
                _ => {}
            }
            line.extend(cells.iter().map(symbol));
            if exit.is_some_and(|pos| pos.col == width && pos.row == row) {
                line.push(exit_symbol);
            }
            lines.push(line);
        }
        if let Some(pos) = exit.filter(|pos| pos.row == height) {
            lines.push(margin_line(pos.col));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(c: char) -> PieceId {
        PieceId::new(c).unwrap()
    }

    fn primary(row: i32, col: i32) -> Piece {
        Piece::new_primary(
            PieceId::PRIMARY,
            Position::new(row, col),
            Orientation::Horizontal,
            2,
        )
    }

    fn exit(row: i32, col: i32) -> Piece {
        Piece::new_exit(Position::new(row, col))
    }

    #[test]
    fn test_new_state() {
        let blocker = Piece::new(id('A'), Position::new(1, 4), Orientation::Vertical, 2);
        let pieces = PieceMap::new([primary(2, 2), exit(2, 6), blocker]).unwrap();
        let state = State::new(6, 6, pieces).unwrap();
        assert_eq!(state.board().get(Position::new(2, 3)), Some(PieceId::PRIMARY));
        assert_eq!(state.board().get(Position::new(1, 4)), Some(id('A')));
        assert!(state.board().is_vacant(Position::new(0, 0)));
        assert!(!state.board().is_vacant(Position::new(2, 6)));
        assert!(!state.is_solved());
    }

    #[test]
    fn test_overlap_detected() {
        let blocker = Piece::new(id('A'), Position::new(1, 3), Orientation::Vertical, 2);
        let pieces = PieceMap::new([primary(2, 2), exit(2, 6), blocker]).unwrap();
        let err = State::new(6, 6, pieces).unwrap_err();
        assert_eq!(
            err,
            StateError::Overlap {
                row: 2,
                col: 3,
                first: PieceId::PRIMARY,
                second: id('A'),
            }
        );
    }

    #[test]
    fn test_invalid_states() {
        let check = |pieces: Vec<Piece>, expected: StateError| {
            let pieces = PieceMap::new(pieces).unwrap();
            assert_eq!(State::new(6, 6, pieces).unwrap_err(), expected);
        };
        check(vec![exit(2, 6)], StateError::MissingPrimary);
        check(vec![primary(2, 2)], StateError::MissingExit);
        check(vec![primary(2, 2), exit(3, 6)], StateError::MisalignedExit);
        check(vec![primary(2, 2), exit(-1, 2)], StateError::MisalignedExit);
        check(vec![primary(2, 2), exit(2, 5)], StateError::ExitNotOnEdge);
        check(vec![primary(2, 5), exit(2, 6)], StateError::OutOfBounds(PieceId::PRIMARY));
        check(
            vec![
                primary(2, 2),
                exit(2, 6),
                Piece::new(id('A'), Position::new(0, 0), Orientation::Vertical, 1),
            ],
            StateError::PieceTooShort(id('A')),
        );
        assert_eq!(
            State::new(0, 6, PieceMap::default()).unwrap_err(),
            StateError::InvalidDimensions {
                width: 0,
                height: 6
            }
        );
        assert_eq!(
            State::new(6, MAX_DIMENSION + 1, PieceMap::default()).unwrap_err(),
            StateError::InvalidDimensions {
                width: 6,
                height: 256
            }
        );
    }

    #[test]
    fn test_is_solved() {
        let solved = |pos: Position, exit_piece: Piece| {
            let pieces = PieceMap::new([primary(pos.row, pos.col), exit_piece]).unwrap();
            State::from_parts(Board::new(6, 6), pieces).is_solved()
        };
        assert!(solved(Position::new(2, 5), exit(2, 6)));
        assert!(!solved(Position::new(2, 4), exit(2, 6)));
        assert!(solved(Position::new(2, -1), exit(2, -1)));
        assert!(!solved(Position::new(2, 0), exit(2, -1)));
        assert!(!solved(Position::new(3, 5), exit(2, 6)));
    }

    #[test]
    fn test_signature_ignores_piece_order() {
        let a = Piece::new(id('A'), Position::new(0, 0), Orientation::Vertical, 3);
        let b = Piece::new(id('B'), Position::new(5, 3), Orientation::Horizontal, 3);
        let one = State::new(6, 6, PieceMap::new([primary(2, 1), exit(2, 6), a, b]).unwrap()).unwrap();
        let two = State::new(6, 6, PieceMap::new([b, exit(2, 6), a, primary(2, 1)]).unwrap()).unwrap();
        assert_eq!(one.signature(), two.signature());

        let three = State::new(6, 6, PieceMap::new([primary(2, 2), exit(2, 6), a, b]).unwrap()).unwrap();
        assert_ne!(one.signature(), three.signature());
        assert_eq!(
            one.signature().to_string(),
            concat!("A.....", "A.....", "APP...", "......", "......", "...BBB")
        );
    }

    #[test]
    fn test_pretty_print_margins() {
        let right = State::new(4, 2, PieceMap::new([primary(1, 0), exit(1, 4)]).unwrap()).unwrap();
        assert_eq!(right.pretty_print(), "....\nPP..K");

        let left = State::new(4, 2, PieceMap::new([primary(0, 2), exit(0, -1)]).unwrap()).unwrap();
        assert_eq!(left.pretty_print(), "K..PP\n ....");

        let vertical = Piece::new_primary(
            PieceId::PRIMARY,
            Position::new(0, 1),
            Orientation::Vertical,
            2,
        );
        let top = State::new(3, 3, PieceMap::new([vertical, exit(-1, 1)]).unwrap()).unwrap();
        assert_eq!(top.pretty_print(), " K\n.P.\n.P.\n...");
        let bottom = State::new(3, 3, PieceMap::new([vertical, exit(3, 1)]).unwrap()).unwrap();
        assert_eq!(bottom.pretty_print(), ".P.\n.P.\n...\n K");
    }
}
