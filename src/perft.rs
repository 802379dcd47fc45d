//! Perft: count leaf positions reachable in exactly `depth` legal moves.
//! The canonical correctness benchmark for the move generator. Recursion is
//! copy-and-apply: the position is a small value, there is no unmake.
#![allow(dead_code)]

use crate::move_gen::{generate_legal, MAX_MOVES};
use crate::moves::Move;
use crate::position::Position;

/// Count legal move leaf nodes to a given depth.
/// perft(pos, 0) = 1; for d>0, sum perft(child, d-1) over all legal moves.
pub fn perft(pos: &Position, depth: u32) -> u64 {
  if depth == 0 { return 1; }
  let mut moves = Vec::with_capacity(MAX_MOVES);
  generate_legal(pos, &mut moves);
  if depth == 1 { return moves.len() as u64; }

  let mut nodes = 0;
  for mv in moves {
    let mut child = *pos;
    child.apply(mv);
    nodes += perft(&child, depth - 1);
  }
  nodes
}

/// Perft divide: invoke `visit` once per top-level move with the subtree
/// leaf count, and return the total. Useful for diffing against a reference
/// engine one root move at a time.
pub fn perft_divide<F>(pos: &Position, depth: u32, mut visit: F) -> u64
where
  F: FnMut(Move, u64),
{
  assert!(depth > 0, "divide only makes sense for depth > 0");
  let mut moves = Vec::with_capacity(MAX_MOVES);
  generate_legal(pos, &mut moves);

  let mut total = 0;
  for mv in moves {
    let count = if depth == 1 {
      1
    } else {
      let mut child = *pos;
      child.apply(mv);
      perft(&child, depth - 1)
    };
    visit(mv, count);
    total += count;
  }
  total
}
