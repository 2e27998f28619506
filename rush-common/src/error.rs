use crate::piece::PieceId;

use thiserror::Error;

/// Reasons a board/piece snapshot cannot be searched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Board dimensions must be between 1 and 255 (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Multiple pieces with id {0}")]
    DuplicatePiece(PieceId),

    #[error("Pieces {first} and {second} overlap at row {row}, column {col}")]
    Overlap {
        row: i32,
        col: i32,
        first: PieceId,
        second: PieceId,
    },

    #[error("Piece {0} lies outside the board")]
    OutOfBounds(PieceId),

    #[error("Piece {0} has size below 2")]
    PieceTooShort(PieceId),

    #[error("No primary piece")]
    MissingPrimary,

    #[error("More than one primary piece")]
    MultiplePrimaries,

    #[error("Primary piece {0} has no movement axis")]
    PrimaryNotMovable(PieceId),

    #[error("No exit marker")]
    MissingExit,

    #[error("Multiple exits found")]
    MultipleExits,

    #[error("Exit marker must occupy exactly one cell")]
    InvalidExitSize,

    #[error("Exit must be just outside the edge of the board")]
    ExitNotOnEdge,

    #[error("Exit is not in line with the primary piece's movement axis")]
    MisalignedExit,
}
