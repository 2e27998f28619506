use crate::error::StateError;

use smallvec::SmallVec;
use std::fmt;

pub const PRIMARY_SYMBOL: u8 = b'P';
pub const EXIT_SYMBOL: u8 = b'K';
pub const EMPTY_SYMBOL: u8 = b'.';

const INLINE_PIECES: usize = 16;

/// Single-symbol piece identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(u8);

impl PieceId {
    pub const PRIMARY: Self = Self(PRIMARY_SYMBOL);
    pub const EXIT: Self = Self(EXIT_SYMBOL);

    pub fn new(symbol: char) -> Option<Self> {
        if symbol.is_ascii_graphic() && symbol as u8 != EMPTY_SYMBOL {
            Some(Self(symbol as u8))
        } else {
            None
        }
    }

    pub fn symbol(&self) -> u8 {
        self.0
    }

    pub fn as_char(&self) -> char {
        self.0 as char
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    // Reserved for the exit marker.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    /// Top-left-most cell of the footprint.
    pub pos: Position,
    pub orientation: Orientation,
    pub size: u8,
    pub primary: bool,
}

impl Piece {
    pub fn new(id: PieceId, pos: Position, orientation: Orientation, size: u8) -> Self {
        Self {
            id,
            pos,
            orientation,
            size,
            primary: false,
        }
    }

    pub fn new_primary(id: PieceId, pos: Position, orientation: Orientation, size: u8) -> Self {
        Self {
            primary: true,
            ..Self::new(id, pos, orientation, size)
        }
    }

    pub fn new_exit(pos: Position) -> Self {
        Self::new(PieceId::EXIT, pos, Orientation::Unknown, 1)
    }

    pub fn is_exit(&self) -> bool {
        self.orientation == Orientation::Unknown
    }

    /// Coordinate of `pos` along this piece's movement axis.
    pub fn along(&self, pos: Position) -> i32 {
        match self.orientation {
            Orientation::Vertical => pos.row,
            _ => pos.col,
        }
    }

    /// Coordinate of `pos` across this piece's movement axis.
    pub fn across(&self, pos: Position) -> i32 {
        match self.orientation {
            Orientation::Vertical => pos.col,
            _ => pos.row,
        }
    }

    /// The fixed row (horizontal) or column (vertical) the piece slides in.
    pub fn lane(&self) -> i32 {
        self.across(self.pos)
    }

    pub fn start(&self) -> i32 {
        self.along(self.pos)
    }

    pub fn end(&self) -> i32 {
        self.start() + self.size as i32 - 1
    }

    /// The cell at `offset` along the axis, relative to the top-left cell.
    pub fn cell(&self, offset: i32) -> Position {
        match self.orientation {
            Orientation::Vertical => self.pos.offset(offset, 0),
            _ => self.pos.offset(0, offset),
        }
    }

    pub fn footprint(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size as i32).map(|offset| self.cell(offset))
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.across(pos) == self.lane() && (self.start()..=self.end()).contains(&self.along(pos))
    }

    pub fn shifted(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            pos: self.pos.offset(d_row, d_col),
            ..*self
        }
    }
}

/// Pieces keyed by id. Entries are kept sorted by id, so iteration order never
/// depends on the order the pieces were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PieceMap {
    pieces: SmallVec<[Piece; INLINE_PIECES]>,
}

impl PieceMap {
    pub fn new(pieces: impl IntoIterator<Item = Piece>) -> Result<Self, StateError> {
        let mut pieces: SmallVec<[Piece; INLINE_PIECES]> = pieces.into_iter().collect();
        pieces.sort_by_key(|piece| piece.id);
        if let Some(pair) = pieces.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(StateError::DuplicatePiece(pair[0].id));
        }
        Ok(Self { pieces })
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces
            .binary_search_by_key(&id, |piece| piece.id)
            .ok()
            .map(|idx| &self.pieces[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn movable(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|piece| !piece.is_exit())
    }

    pub fn primary(&self) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.primary)
    }

    pub fn exit(&self) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.is_exit())
    }

    /// Returns a copy of the map with the entry for `piece.id` replaced.
    pub fn with_piece(&self, piece: Piece) -> Self {
        let mut pieces = self.pieces.clone();
        if let Ok(idx) = pieces.binary_search_by_key(&piece.id, |p| p.id) {
            pieces[idx] = piece;
        }
        Self { pieces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(c: char) -> PieceId {
        PieceId::new(c).unwrap()
    }

    #[test]
    fn test_piece_id() {
        assert_eq!(id('A').as_char(), 'A');
        assert!(PieceId::new('.').is_none());
        assert!(PieceId::new(' ').is_none());
        assert_eq!(PieceId::PRIMARY.to_string(), "P");
    }

    #[test]
    fn test_footprint() {
        let h = Piece::new(id('A'), Position::new(2, 1), Orientation::Horizontal, 3);
        let cells: Vec<_> = h.footprint().collect();
        assert_eq!(
            cells,
            vec![Position::new(2, 1), Position::new(2, 2), Position::new(2, 3)]
        );
        assert_eq!((h.start(), h.end(), h.lane()), (1, 3, 2));
        assert!(h.occupies(Position::new(2, 3)));
        assert!(!h.occupies(Position::new(3, 3)));

        let v = Piece::new(id('B'), Position::new(0, 4), Orientation::Vertical, 2);
        let cells: Vec<_> = v.footprint().collect();
        assert_eq!(cells, vec![Position::new(0, 4), Position::new(1, 4)]);
        assert_eq!((v.start(), v.end(), v.lane()), (0, 1, 4));
    }

    #[test]
    fn test_piece_map_order_and_duplicates() {
        let a = Piece::new(id('A'), Position::new(0, 0), Orientation::Horizontal, 2);
        let b = Piece::new(id('B'), Position::new(1, 0), Orientation::Horizontal, 2);
        let one = PieceMap::new([a, b]).unwrap();
        let two = PieceMap::new([b, a]).unwrap();
        assert_eq!(one, two);
        assert_eq!(one.get(id('B')), Some(&b));
        assert!(one.get(id('C')).is_none());

        let err = PieceMap::new([a, a]).unwrap_err();
        assert!(matches!(err, StateError::DuplicatePiece(p) if p == id('A')));
    }

    #[test]
    fn test_with_piece_leaves_original_untouched() {
        let a = Piece::new(id('A'), Position::new(0, 0), Orientation::Horizontal, 2);
        let map = PieceMap::new([a]).unwrap();
        let moved = map.with_piece(a.shifted(0, 2));
        assert_eq!(map.get(id('A')).unwrap().pos, Position::new(0, 0));
        assert_eq!(moved.get(id('A')).unwrap().pos, Position::new(0, 2));
    }
}
