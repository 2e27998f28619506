//! Board, piece and move types shared by the Rush Hour solver and its front ends.
pub mod action;
pub mod board;
pub mod error;
pub mod parse;
pub mod piece;
