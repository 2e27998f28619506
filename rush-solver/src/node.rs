use rush_common::action::Move;
use rush_common::board::{Signature, State};

use std::cmp::Ordering;

/// One edge of the search tree; `parent` indexes into the owning `MoveTree`.
#[derive(Debug, Copy, Clone)]
pub struct MoveNode {
    pub parent: u32,
    pub mov: Option<Move>,
}

/// Parent-linked arena shared by every node of one search, so frontier
/// entries carry a single index instead of a copy of their move list.
#[derive(Debug, Clone)]
pub struct MoveTree {
    nodes: Vec<MoveNode>,
}

impl Default for MoveTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveTree {
    pub const ROOT: u32 = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![MoveNode {
                parent: Self::ROOT,
                mov: None,
            }],
        }
    }

    pub fn push(&mut self, parent: u32, mov: Move) -> u32 {
        let index = self.nodes.len() as u32;
        self.nodes.push(MoveNode {
            parent,
            mov: Some(mov),
        });
        index
    }

    /// Moves from the root down to `index`, in playing order.
    pub fn path(&self, index: u32) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut current = index;
        while let Some(node) = self.nodes.get(current as usize) {
            let Some(mov) = node.mov else {
                break;
            };
            moves.push(mov);
            current = node.parent;
        }
        moves.reverse();
        moves
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub state: State,
    pub signature: Signature,
    pub g: u32,
    pub h: f64,
    pub f: f64,
    pub seq: u64,
    pub path: u32,
}

impl Node {
    pub fn root(state: &State, h: f64, f: f64) -> Self {
        Self {
            signature: state.signature(),
            state: state.clone(),
            g: 0,
            h,
            f,
            seq: 0,
            path: MoveTree::ROOT,
        }
    }
}

/// Lower `f` first, earlier insertion on ties.
pub fn by_priority(a: &Node, b: &Node) -> Ordering {
    a.f.total_cmp(&b.f).then(a.seq.cmp(&b.seq))
}

/// Lower `h` first, earlier insertion on ties.
pub fn by_estimate(a: &Node, b: &Node) -> Ordering {
    a.h.total_cmp(&b.h).then(a.seq.cmp(&b.seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rush_common::action::Direction;
    use rush_common::piece::PieceId;

    #[test]
    fn test_path() {
        let a = PieceId::new('A').unwrap();
        let up = Move::new(a, Direction::Up, 1);
        let right = Move::new(PieceId::PRIMARY, Direction::Right, 3);
        let down = Move::new(a, Direction::Down, 2);

        let mut tree = MoveTree::new();
        let first = tree.push(MoveTree::ROOT, up);
        let second = tree.push(first, right);
        let sibling = tree.push(first, down);

        assert!(tree.path(MoveTree::ROOT).is_empty());
        assert_eq!(tree.path(second), vec![up, right]);
        assert_eq!(tree.path(sibling), vec![up, down]);
    }
}
