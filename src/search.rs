//! Fixed-depth negamax with alpha-beta pruning over copy-and-apply
//! children. Deliberately minimal: no transposition table, no move
//! ordering, no quiescence.
#![allow(dead_code)]

use std::cmp::max;

use crate::eval::eval;
use crate::move_gen::{generate_legal, MAX_MOVES};
use crate::moves::Move;
use crate::position::Position;

const MATE_SCORE: i32 = 30_000;

/// Pick the move with the best negamax score at the given depth (>= 1).
/// Returns `None` when the side to move has no legal moves.
pub fn search_bestmove(pos: &Position, depth: u32) -> Option<Move> {
  let mut moves = Vec::with_capacity(MAX_MOVES);
  generate_legal(pos, &mut moves);

  let mut best_move = None;
  let mut best_score = i32::MIN + 1;
  for mv in moves {
    let mut child = *pos;
    child.apply(mv);
    let score = -negamax(&child, depth.saturating_sub(1), i32::MIN + 1, i32::MAX - 1);
    if score > best_score {
      best_move = Some(mv);
      best_score = score;
    }
  }
  best_move
}

fn negamax(pos: &Position, depth: u32, mut alpha: i32, beta: i32) -> i32 {
  let mut moves = Vec::with_capacity(MAX_MOVES);
  let in_check = generate_legal(pos, &mut moves);

  if moves.is_empty() {
    // Checkmate or stalemate.
    return if in_check { -MATE_SCORE } else { 0 };
  }

  if depth == 0 {
    return eval(pos);
  }

  let mut score = i32::MIN + 1;
  for mv in moves {
    let mut child = *pos;
    child.apply(mv);
    score = max(score, -negamax(&child, depth - 1, -beta, -alpha));
    alpha = max(alpha, score);
    if alpha >= beta {
      break;
    }
  }
  score
}
