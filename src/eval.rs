//! Material-only evaluation from the side to move's perspective. A stub for
//! the search; no positional terms.
#![allow(dead_code)]

use crate::position::{piece_kind_idx, PieceKind, Position};
use crate::{color_idx, Color};

const P: i32 = 100;
const N: i32 = 320;
const B: i32 = 330;
const R: i32 = 500;
const Q: i32 = 900;

fn material(pos: &Position, color: Color) -> i32 {
  let side = &pos.bb[color_idx(color)];
  side[piece_kind_idx(PieceKind::Pawn)].count() as i32 * P
    + side[piece_kind_idx(PieceKind::Knight)].count() as i32 * N
    + side[piece_kind_idx(PieceKind::Bishop)].count() as i32 * B
    + side[piece_kind_idx(PieceKind::Rook)].count() as i32 * R
    + side[piece_kind_idx(PieceKind::Queen)].count() as i32 * Q
}

pub fn eval(pos: &Position) -> i32 {
  let white = material(pos, Color::White);
  let black = material(pos, Color::Black);
  match pos.stm {
    Color::White => white - black,
    Color::Black => black - white,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fen;
  use crate::START_FEN;

  #[test]
  fn startpos_is_balanced() {
    let pos = fen::parse(START_FEN).unwrap();
    assert_eq!(eval(&pos), 0);
  }

  #[test]
  fn score_is_side_to_move_relative() {
    // White is up a queen.
    let w = fen::parse("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
    assert_eq!(eval(&w), Q);
    let b = fen::parse("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
    assert_eq!(eval(&b), -Q);
  }

  #[test]
  fn mixed_material_counts() {
    // White: rook + pawn; Black: bishop + knight.
    let pos = fen::parse("4k3/2bn4/8/8/8/8/4P3/3RK3 w - - 0 1").unwrap();
    assert_eq!(eval(&pos), R + P - B - N);
  }
}
