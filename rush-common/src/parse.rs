//! Loader for the plain-text puzzle format.
//!
//! ```text
//! 6 6
//! 1
//! ......
//! ....A.
//! ..PPA.K
//! ......
//! ......
//! ......
//! ```
//!
//! The first line holds the width and height, the second the number of pieces
//! besides the primary `P`. The exit `K` is written outside the grid: as a
//! trailing column on its row, as a leading column (every other row then
//! carries a blank pad column), or on its own line above or below the grid.

use crate::board::{MAX_DIMENSION, State};
use crate::piece::{EMPTY_SYMBOL, EXIT_SYMBOL, Orientation, Piece, PieceId, PieceMap, Position};

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;

pub const MAX_PIECES: usize = 24;

enum ExitSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl State {
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.replace("\r\n", "\n");
        let mut lines = content.split('\n');

        let dims_line = lines.next().unwrap_or_default().trim();
        if dims_line.is_empty() {
            bail!("Puzzle file is empty");
        }
        let dims: Vec<&str> = dims_line.split_whitespace().collect();
        let [width, height] = dims[..] else {
            bail!("Invalid board dimensions format '{dims_line}'");
        };
        let width: usize = width
            .parse()
            .with_context(|| format!("Invalid board width '{width}'"))?;
        let height: usize = height
            .parse()
            .with_context(|| format!("Invalid board height '{height}'"))?;
        if width == 0 || height == 0 {
            bail!("Board dimensions must be positive numbers");
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            bail!("Board dimensions must not exceed {MAX_DIMENSION}");
        }

        let count_line = lines.next().context("Missing piece count")?.trim();
        let count: usize = count_line
            .parse()
            .with_context(|| format!("Invalid piece count '{count_line}'"))?;
        if count > MAX_PIECES {
            bail!("At most {MAX_PIECES} pieces are allowed besides the primary piece");
        }

        let grid_lines: Vec<Vec<char>> = lines
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.chars().collect())
            .collect();

        let exit_cells: Vec<(usize, usize)> = grid_lines
            .iter()
            .enumerate()
            .flat_map(|(r, line)| {
                line.iter()
                    .enumerate()
                    .filter(|(_, ch)| **ch == EXIT_SYMBOL as char)
                    .map(move |(c, _)| (r, c))
            })
            .collect();
        let (exit_line, exit_col) = match exit_cells[..] {
            [] => bail!("No exit marker (K) found in the puzzle"),
            [cell] => cell,
            _ => bail!("Multiple exits found"),
        };

        let side = if grid_lines.len() == height + 1 {
            if exit_line == 0 {
                ExitSide::Top
            } else if exit_line == height {
                ExitSide::Bottom
            } else {
                bail!("Exit must be at the edge of the board");
            }
        } else if grid_lines.len() == height {
            if exit_col == 0 && grid_lines[exit_line].len() == width + 1 {
                ExitSide::Left
            } else if exit_col == width {
                ExitSide::Right
            } else {
                bail!("Exit must be at the edge of the board");
            }
        } else {
            bail!(
                "Amount of rows not the same as input (expected {height}, found {})",
                grid_lines.len()
            );
        };

        let (rows, exit) = match side {
            ExitSide::Top | ExitSide::Bottom => {
                let stray = grid_lines[exit_line]
                    .iter()
                    .any(|ch| !ch.is_whitespace() && *ch != EXIT_SYMBOL as char);
                if exit_col >= width || stray {
                    bail!("Exit must be at the edge of the board");
                }
                let (rows, exit_row) = if matches!(side, ExitSide::Top) {
                    (&grid_lines[1..], -1)
                } else {
                    (&grid_lines[..height], height as i32)
                };
                let rows: Vec<&[char]> = rows.iter().map(Vec::as_slice).collect();
                (rows, Position::new(exit_row, exit_col as i32))
            }
            ExitSide::Left => {
                let mut rows = Vec::with_capacity(height);
                for (r, line) in grid_lines.iter().enumerate() {
                    match line.split_first() {
                        Some((pad, rest)) if pad.is_whitespace() || r == exit_line => {
                            rows.push(rest)
                        }
                        _ => bail!("Row {} is missing the exit padding column", r + 1),
                    }
                }
                (rows, Position::new(exit_line as i32, -1))
            }
            ExitSide::Right => {
                if grid_lines[exit_line].len() != width + 1 {
                    bail!(
                        "Row {} contains the exit but doesn't have {} columns",
                        exit_line + 1,
                        width + 1
                    );
                }
                let rows = grid_lines
                    .iter()
                    .enumerate()
                    .map(|(r, line)| {
                        if r == exit_line {
                            &line[..exit_col]
                        } else {
                            line.as_slice()
                        }
                    })
                    .collect();
                (rows, Position::new(exit_line as i32, width as i32))
            }
        };

        let mut cells: BTreeMap<char, Vec<Position>> = BTreeMap::new();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                bail!("Row {} doesn't have {width} columns", r + 1);
            }
            for (c, &ch) in row.iter().enumerate() {
                if ch == EMPTY_SYMBOL as char {
                    continue;
                }
                if !ch.is_ascii_uppercase() {
                    bail!("Invalid piece id '{ch}'. Ids must be single capital letters");
                }
                cells
                    .entry(ch)
                    .or_default()
                    .push(Position::new(r as i32, c as i32));
            }
        }

        let mut pieces = Vec::with_capacity(cells.len() + 1);
        for (ch, positions) in &cells {
            let piece = Self::parse_piece(*ch, positions)?;
            pieces.push(piece);
        }
        if pieces.len() != count + 1 {
            bail!(
                "Numbers of pieces not the same as input (found {}, expected {count} + 1 primary)",
                pieces.len()
            );
        }
        if !pieces.iter().any(|piece| piece.primary) {
            bail!("No primary piece (P) found in the puzzle");
        }
        pieces.push(Piece::new_exit(exit));

        let pieces = PieceMap::new(pieces)?;
        let state = State::new(width, height, pieces).context("Invalid puzzle")?;
        Ok(state)
    }

    fn parse_piece(ch: char, positions: &[Position]) -> Result<Piece> {
        let id = PieceId::new(ch).with_context(|| format!("Invalid piece id '{ch}'"))?;
        let size = positions.len();
        if size < 2 {
            bail!("Piece {ch} has size below 2");
        }
        let first = positions[0];
        let is_run = |f: fn(&Position) -> i32, g: fn(&Position) -> i32| {
            positions
                .iter()
                .enumerate()
                .all(|(i, pos)| f(pos) == f(&first) && g(pos) == g(&first) + i as i32)
        };
        let orientation = if is_run(|p| p.row, |p| p.col) {
            Orientation::Horizontal
        } else if is_run(|p| p.col, |p| p.row) {
            Orientation::Vertical
        } else {
            bail!("Invalid shape for piece {ch}; pieces must be straight lines");
        };
        let size = u8::try_from(size).with_context(|| format!("Piece {ch} is too long"))?;
        Ok(if id == PieceId::PRIMARY {
            Piece::new_primary(id, first, orientation, size)
        } else {
            Piece::new(id, first, orientation, size)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGHT_EXIT: &str = "6 6
1
......
....A.
..PPA.K
......
......
......
";

    fn grid_of(content: &str) -> String {
        content.lines().skip(2).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_parse_right_exit() {
        let state = State::parse(RIGHT_EXIT).unwrap();
        assert_eq!(state.board().width(), 6);
        assert_eq!(state.board().height(), 6);
        let primary = state.pieces().primary().unwrap();
        assert_eq!(primary.pos, Position::new(2, 2));
        assert_eq!(primary.orientation, Orientation::Horizontal);
        assert_eq!(primary.size, 2);
        let a = state.pieces().get(PieceId::new('A').unwrap()).unwrap();
        assert_eq!(a.orientation, Orientation::Vertical);
        assert_eq!(a.pos, Position::new(1, 4));
        assert_eq!(state.pieces().exit().unwrap().pos, Position::new(2, 6));
        assert_eq!(state.pretty_print(), grid_of(RIGHT_EXIT));
    }

    #[test]
    fn test_parse_other_sides() {
        let left = "4 3\n1\n ....\nKPPA.\n ..A.\n";
        let state = State::parse(left).unwrap();
        assert_eq!(state.pieces().exit().unwrap().pos, Position::new(1, -1));
        assert_eq!(state.pieces().primary().unwrap().pos, Position::new(1, 0));
        assert_eq!(state.pretty_print(), grid_of(left));

        let top = "3 4\n0\n K\n.P.\n.P.\n...\n...\n";
        let state = State::parse(top).unwrap();
        assert_eq!(state.pieces().exit().unwrap().pos, Position::new(-1, 1));
        assert_eq!(
            state.pieces().primary().unwrap().orientation,
            Orientation::Vertical
        );
        assert_eq!(state.pretty_print(), grid_of(top));

        let bottom = "3 3\n0\n.P.\n.P.\n...\n K\n";
        let state = State::parse(bottom).unwrap();
        assert_eq!(state.pieces().exit().unwrap().pos, Position::new(3, 1));
        assert_eq!(state.pretty_print(), grid_of(bottom));
    }

    #[test]
    fn test_parse_crlf() {
        let content = RIGHT_EXIT.replace('\n', "\r\n");
        assert!(State::parse(&content).is_ok());
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("", "empty"),
            ("6\n1\n", "dimensions"),
            ("x 6\n1\n", "width"),
            ("6 0\n1\n", "positive"),
            ("300 6\n0\n", "must not exceed 255"),
            ("6 6\nabc\n", "piece count"),
            ("6 6\n30\n", "At most"),
            ("3 2\n0\nPP.\n...\n", "No exit"),
            ("3 2\n0\nPP.K\n..K\n", "Multiple exits"),
            ("3 2\n0\nPK.\n...\n", "edge"),
            ("3 2\n0\nPP.K\n..\n", "columns"),
            ("3 2\n0\nPP.K\n", "Amount of rows"),
            ("3 2\n0\nPP.K\n.a.\n", "Invalid piece id"),
            ("3 2\n1\nPP.K\n..A\n", "size below 2"),
            ("3 3\n1\nPPAK\n.A.\n...\n", "straight"),
            ("3 2\n2\nPP.K\nAA.\n", "Numbers of pieces"),
            ("3 2\n0\nAA.K\n...\n", "No primary"),
            ("3 2\n0\nPP.\n...K\n", "Invalid puzzle"),
        ];
        for (content, expected) in cases {
            let err = State::parse(content).unwrap_err();
            let message = format!("{err:#}");
            assert!(
                message.contains(expected),
                "'{content}' failed with '{message}', expected '{expected}'"
            );
        }
    }
}
