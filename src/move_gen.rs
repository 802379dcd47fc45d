//! Legal move generation.
//!
//! One pass over the side-to-move's king neighborhood classifies the
//! position (checkers, pinned pieces, where non-king pieces may land); the
//! per-piece emitters then work purely with bitboard masks. No move is ever
//! speculatively applied to test legality.
#![allow(dead_code)]

use crate::attacks::{
  self, between, bishop_attacks, king_attacks_tbl, knight_attacks_tbl, pawn_attack_set,
  pawn_attacks_tbl, ray_tbl, rook_attacks,
};
use crate::bitboard::{Bitboard, FILE_A, FILE_H, RANK_1, RANK_3, RANK_4, RANK_5, RANK_6, RANK_8};
use crate::moves::Move;
use crate::position::{piece_kind_idx, PieceKind, Position};
use crate::square::Square;
use crate::{color_idx, Color};

/// Upper bound on the number of legal moves in any chess position.
/// Callers should reserve this capacity for the move buffer.
pub const MAX_MOVES: usize = 218;

// Castling path masks: squares that must be empty between king and rook,
// and squares that must not be attacked (the king's origin, the square it
// crosses, and its destination).
const WHITE_KING_SIDE_FREE: Bitboard = Bitboard(0x60); // f1, g1
const WHITE_KING_SIDE_SAFE: Bitboard = Bitboard(0x70); // e1, f1, g1
const WHITE_QUEEN_SIDE_FREE: Bitboard = Bitboard(0x0e); // b1, c1, d1
const WHITE_QUEEN_SIDE_SAFE: Bitboard = Bitboard(0x1c); // c1, d1, e1
const BLACK_KING_SIDE_FREE: Bitboard = Bitboard(0x60 << 56); // f8, g8
const BLACK_KING_SIDE_SAFE: Bitboard = Bitboard(0x70 << 56); // e8, f8, g8
const BLACK_QUEEN_SIDE_FREE: Bitboard = Bitboard(0x0e << 56); // b8, c8, d8
const BLACK_QUEEN_SIDE_SAFE: Bitboard = Bitboard(0x1c << 56); // c8, d8, e8

/// Check and pin picture for the side to move.
///
/// `pin_diag`/`pin_straight` hold, for every absolutely pinned piece, the
/// king-to-attacker segment (attacker square included): a pinned piece may
/// only land inside its segment, which permits capturing the pinner and
/// sliding along the pin line.
struct CheckPicture {
  checkers: Bitboard,
  pin_diag: Bitboard,
  pin_straight: Bitboard,
  pins: Bitboard,
  /// Destinations that resolve a single check (capture or block). Widened
  /// to every non-friendly square when there is no check.
  move_mask: Bitboard,
}

/// Append every legal move for the side to move into `moves`; returns
/// whether the side to move is currently in check.
pub fn generate_legal(pos: &Position, moves: &mut Vec<Move>) -> bool {
  let mut cp = check_picture(pos);
  let in_check = cp.checkers.any();

  if cp.checkers.count() <= 1 {
    if !in_check {
      cp.move_mask = !pos.occ_side[color_idx(pos.stm)];
    }
    gen_pawn_pushes(pos, &cp, moves);
    gen_pawn_captures(pos, &cp, moves);
    if pos.ep.any() {
      gen_en_passant(pos, &cp, moves);
    }
    gen_knight_moves(pos, &cp, moves);
    gen_bishop_moves(pos, &cp, moves);
    gen_rook_moves(pos, &cp, moves);
    gen_queen_moves(pos, &cp, moves);
  }
  // Double check: only the king may move.
  gen_king_moves(pos, in_check, moves);

  in_check
}

/// Discover checkers and pins in one sweep using the superpiece technique:
/// stand on the king square, look outward as each piece kind, and intersect
/// with the matching enemy pieces. For sliders, the number of blockers on
/// the king-attacker segment decides between "checker" (0) and "pin" (1).
fn check_picture(pos: &Position) -> CheckPicture {
  let us = pos.stm;
  let ui = color_idx(us);
  let ti = ui ^ 1;
  let king_sq = pos.bb[ui][piece_kind_idx(PieceKind::King)]
    .lsb_square()
    .expect("side to move has no king");

  let mut checkers = knight_attacks_tbl(king_sq) & pos.bb[ti][piece_kind_idx(PieceKind::Knight)];
  checkers |= pawn_attacks_tbl(king_sq, us) & pos.bb[ti][piece_kind_idx(PieceKind::Pawn)];

  let mut pin_diag = Bitboard::empty();
  let mut pin_straight = Bitboard::empty();
  let mut move_mask = Bitboard::empty();

  let queens = pos.bb[ti][piece_kind_idx(PieceKind::Queen)];

  let diag_rays = ray_tbl(attacks::NORTH_EAST, king_sq)
    | ray_tbl(attacks::SOUTH_EAST, king_sq)
    | ray_tbl(attacks::SOUTH_WEST, king_sq)
    | ray_tbl(attacks::NORTH_WEST, king_sq);
  let mut diag_attackers =
    (pos.bb[ti][piece_kind_idx(PieceKind::Bishop)] | queens) & diag_rays;

  while let Some(idx) = diag_attackers.pop_lsb() {
    let sq = Square::from_index(idx).unwrap();
    let path = between(king_sq, sq);
    match (path & pos.occ_all).count() {
      0 => {
        checkers.set(sq);
        move_mask |= path;
      }
      1 => pin_diag |= path | Bitboard::from_square(sq),
      _ => {}
    }
  }

  let straight_rays = ray_tbl(attacks::NORTH, king_sq)
    | ray_tbl(attacks::EAST, king_sq)
    | ray_tbl(attacks::SOUTH, king_sq)
    | ray_tbl(attacks::WEST, king_sq);
  let mut straight_attackers =
    (pos.bb[ti][piece_kind_idx(PieceKind::Rook)] | queens) & straight_rays;

  while let Some(idx) = straight_attackers.pop_lsb() {
    let sq = Square::from_index(idx).unwrap();
    let path = between(king_sq, sq);
    match (path & pos.occ_all).count() {
      0 => {
        checkers.set(sq);
        move_mask |= path;
      }
      1 => pin_straight |= path | Bitboard::from_square(sq),
      _ => {}
    }
  }

  move_mask |= checkers;

  CheckPicture {
    checkers,
    pin_diag,
    pin_straight,
    pins: pin_diag | pin_straight,
    move_mask,
  }
}

// Per-color pawn geometry as signed rotate amounts plus rank masks.
struct PawnConfig {
  push: i32,
  west: i32, // capture toward the a-file
  east: i32, // capture toward the h-file
  start_plus_one: Bitboard, // squares reached by a single push off the start rank
  promo_rank: Bitboard,
  ep_rank: Bitboard, // rank our pawns stand on when capturing en passant
}

fn pawn_config(us: Color) -> PawnConfig {
  match us {
    Color::White => PawnConfig {
      push: 8,
      west: 7,
      east: 9,
      start_plus_one: RANK_3,
      promo_rank: RANK_8,
      ep_rank: RANK_5,
    },
    Color::Black => PawnConfig {
      push: -8,
      west: -9,
      east: -7,
      start_plus_one: RANK_6,
      promo_rank: RANK_1,
      ep_rank: RANK_4,
    },
  }
}

fn push_pawn_move(moves: &mut Vec<Move>, from: Square, to: Square, promo: bool) {
  if promo {
    moves.push(Move::promotion(from, to, PieceKind::Queen));
    moves.push(Move::promotion(from, to, PieceKind::Rook));
    moves.push(Move::promotion(from, to, PieceKind::Bishop));
    moves.push(Move::promotion(from, to, PieceKind::Knight));
  } else {
    moves.push(Move::new(from, to, PieceKind::Pawn));
  }
}

fn gen_pawn_pushes(pos: &Position, cp: &CheckPicture, moves: &mut Vec<Move>) {
  let us = pos.stm;
  let cfg = pawn_config(us);

  // A diagonally pinned pawn can never push. A straight-pinned pawn may,
  // but only if the destination stays on its pin segment, so restrict the
  // source set to pinned pawns whose destination lies on a segment.
  let pawns = pos.bb[color_idx(us)][piece_kind_idx(PieceKind::Pawn)] & !cp.pin_diag;
  let pinned = pawns & cp.pin_straight.rotl(-cfg.push);
  let free = pawns & !cp.pin_straight;
  let movers = pinned | free;

  let single = movers.rotl(cfg.push) & !pos.occ_all;

  let mut pushes = single & cp.move_mask;
  while let Some(to_idx) = pushes.pop_lsb() {
    let to = Square::from_index(to_idx).unwrap();
    let from = Square::from_index((to_idx as i32 - cfg.push) as u8).unwrap();
    push_pawn_move(moves, from, to, (Bitboard::from_square(to) & cfg.promo_rank).any());
  }

  let mut doubles = (single & cfg.start_plus_one).rotl(cfg.push) & !pos.occ_all & cp.move_mask;
  while let Some(to_idx) = doubles.pop_lsb() {
    let to = Square::from_index(to_idx).unwrap();
    let from = Square::from_index((to_idx as i32 - 2 * cfg.push) as u8).unwrap();
    moves.push(Move::double_push(from, to));
  }
}

fn gen_pawn_captures(pos: &Position, cp: &CheckPicture, moves: &mut Vec<Move>) {
  let us = pos.stm;
  let cfg = pawn_config(us);
  let enemies = pos.enemy_occ();

  // A straight-pinned pawn can never capture; a diagonally pinned pawn only
  // along its pin segment.
  let pawns = pos.bb[color_idx(us)][piece_kind_idx(PieceKind::Pawn)] & !cp.pin_straight;

  // Two passes: captures toward the a-file and toward the h-file. `edge`
  // masks source pawns that would wrap; `dest_edge` masks pin segments the
  // un-shift would wrap out of.
  for (shift, edge, dest_edge) in [(cfg.west, FILE_A, FILE_H), (cfg.east, FILE_H, FILE_A)] {
    let sources = pawns & !edge;
    let pinned = sources & (cp.pin_diag & !dest_edge).rotl(-shift);
    let free = sources & !cp.pin_diag;

    let mut attacks = (pinned | free).rotl(shift) & enemies & cp.move_mask;
    while let Some(to_idx) = attacks.pop_lsb() {
      let to = Square::from_index(to_idx).unwrap();
      let from = Square::from_index((to_idx as i32 - shift) as u8).unwrap();
      push_pawn_move(moves, from, to, (Bitboard::from_square(to) & cfg.promo_rank).any());
    }
  }
}

fn gen_en_passant(pos: &Position, cp: &CheckPicture, moves: &mut Vec<Move>) {
  let us = pos.stm;
  let ui = color_idx(us);
  let ti = ui ^ 1;
  let cfg = pawn_config(us);

  let dest = pos.ep_destination();

  // While in check the capture must either take the checking pawn itself or
  // land on the check-resolution mask (blocking). Without a check the move
  // mask holds every non-friendly square, so this always passes.
  if (pos.ep & cp.checkers).is_empty() && (dest & cp.move_mask).is_empty() {
    return;
  }

  let king_sq = pos.bb[ui][piece_kind_idx(PieceKind::King)].lsb_square().unwrap();
  let enemy_rook_queen =
    pos.bb[ti][piece_kind_idx(PieceKind::Rook)] | pos.bb[ti][piece_kind_idx(PieceKind::Queen)];

  let candidates = pos.bb[ui][piece_kind_idx(PieceKind::Pawn)] & cfg.ep_rank & !cp.pin_straight;
  let west_pawn = candidates & (pos.ep & !FILE_A).rotl(-1);
  let east_pawn = candidates & (pos.ep & !FILE_H).rotl(1);

  for capturer in [west_pawn, east_pawn] {
    let Some(from) = capturer.lsb_square() else { continue };
    let from_bit = Bitboard::from_square(from);

    // A diagonally pinned pawn may capture en passant only along its pin.
    if (from_bit & cp.pin_diag).any() && (dest & cp.pin_diag).is_empty() {
      continue;
    }

    // The horizontal discovered check: lift both pawns off the rank, land
    // the capturer behind, and see whether a rook or queen now reaches the
    // king along our en-passant rank.
    let occupied_after = (pos.occ_all & !(from_bit | pos.ep)) | dest;
    let rank_path = rook_attacks(occupied_after, king_sq) & cfg.ep_rank;
    if (rank_path & enemy_rook_queen).any() {
      continue;
    }

    moves.push(Move::en_passant(from, dest.lsb_square().unwrap()));
  }
}

fn gen_knight_moves(pos: &Position, cp: &CheckPicture, moves: &mut Vec<Move>) {
  // A pinned knight can never move: no knight move stays on a line.
  let mut knights = pos.bb[color_idx(pos.stm)][piece_kind_idx(PieceKind::Knight)] & !cp.pins;

  while let Some(from_idx) = knights.pop_lsb() {
    let from = Square::from_index(from_idx).unwrap();
    let mut targets = knight_attacks_tbl(from) & cp.move_mask;
    while let Some(to_idx) = targets.pop_lsb() {
      moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::Knight));
    }
  }
}

fn gen_bishop_moves(pos: &Position, cp: &CheckPicture, moves: &mut Vec<Move>) {
  // A bishop pinned on a rank or file is immobile.
  let bishops = pos.bb[color_idx(pos.stm)][piece_kind_idx(PieceKind::Bishop)] & !cp.pin_straight;

  let mut pinned = bishops & cp.pin_diag;
  while let Some(from_idx) = pinned.pop_lsb() {
    let from = Square::from_index(from_idx).unwrap();
    let mut targets = bishop_attacks(pos.occ_all, from) & cp.move_mask & cp.pin_diag;
    while let Some(to_idx) = targets.pop_lsb() {
      moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::Bishop));
    }
  }

  let mut free = bishops & !cp.pin_diag;
  while let Some(from_idx) = free.pop_lsb() {
    let from = Square::from_index(from_idx).unwrap();
    let mut targets = bishop_attacks(pos.occ_all, from) & cp.move_mask;
    while let Some(to_idx) = targets.pop_lsb() {
      moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::Bishop));
    }
  }
}

fn gen_rook_moves(pos: &Position, cp: &CheckPicture, moves: &mut Vec<Move>) {
  // A rook pinned on a diagonal is immobile.
  let rooks = pos.bb[color_idx(pos.stm)][piece_kind_idx(PieceKind::Rook)] & !cp.pin_diag;

  let mut pinned = rooks & cp.pin_straight;
  while let Some(from_idx) = pinned.pop_lsb() {
    let from = Square::from_index(from_idx).unwrap();
    let mut targets = rook_attacks(pos.occ_all, from) & cp.move_mask & cp.pin_straight;
    while let Some(to_idx) = targets.pop_lsb() {
      moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::Rook));
    }
  }

  let mut free = rooks & !cp.pin_straight;
  while let Some(from_idx) = free.pop_lsb() {
    let from = Square::from_index(from_idx).unwrap();
    let mut targets = rook_attacks(pos.occ_all, from) & cp.move_mask;
    while let Some(to_idx) = targets.pop_lsb() {
      moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::Rook));
    }
  }
}

fn gen_queen_moves(pos: &Position, cp: &CheckPicture, moves: &mut Vec<Move>) {
  // Three passes: a diagonally pinned queen keeps only its bishop moves
  // inside the pin, a straight-pinned queen only its rook moves, and an
  // unpinned queen both.
  let queens = pos.bb[color_idx(pos.stm)][piece_kind_idx(PieceKind::Queen)];

  let mut diag_pinned = queens & cp.pin_diag;
  while let Some(from_idx) = diag_pinned.pop_lsb() {
    let from = Square::from_index(from_idx).unwrap();
    let mut targets = bishop_attacks(pos.occ_all, from) & cp.move_mask & cp.pin_diag;
    while let Some(to_idx) = targets.pop_lsb() {
      moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::Queen));
    }
  }

  let mut straight_pinned = queens & cp.pin_straight;
  while let Some(from_idx) = straight_pinned.pop_lsb() {
    let from = Square::from_index(from_idx).unwrap();
    let mut targets = rook_attacks(pos.occ_all, from) & cp.move_mask & cp.pin_straight;
    while let Some(to_idx) = targets.pop_lsb() {
      moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::Queen));
    }
  }

  let mut free = queens & !cp.pins;
  while let Some(from_idx) = free.pop_lsb() {
    let from = Square::from_index(from_idx).unwrap();
    let mut targets =
      (rook_attacks(pos.occ_all, from) | bishop_attacks(pos.occ_all, from)) & cp.move_mask;
    while let Some(to_idx) = targets.pop_lsb() {
      moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::Queen));
    }
  }
}

/// Every square the enemy attacks, with our king lifted off the board so a
/// slider keeps attacking "through" the king: the king may not step back
/// along the line of a check.
fn enemy_attacks(pos: &Position, us: Color) -> Bitboard {
  let ui = color_idx(us);
  let ti = ui ^ 1;
  let occupied = pos.occ_all & !pos.bb[ui][piece_kind_idx(PieceKind::King)];

  let them = us.opponent();
  let mut attacked = pawn_attack_set(pos.bb[ti][piece_kind_idx(PieceKind::Pawn)], them);

  let mut knights = pos.bb[ti][piece_kind_idx(PieceKind::Knight)];
  while let Some(idx) = knights.pop_lsb() {
    attacked |= knight_attacks_tbl(Square::from_index(idx).unwrap());
  }

  let enemy_king = pos.bb[ti][piece_kind_idx(PieceKind::King)]
    .lsb_square()
    .expect("opponent has no king");
  attacked |= king_attacks_tbl(enemy_king);

  let queens = pos.bb[ti][piece_kind_idx(PieceKind::Queen)];

  let mut diagonal = pos.bb[ti][piece_kind_idx(PieceKind::Bishop)] | queens;
  while let Some(idx) = diagonal.pop_lsb() {
    attacked |= bishop_attacks(occupied, Square::from_index(idx).unwrap());
  }

  let mut straight = pos.bb[ti][piece_kind_idx(PieceKind::Rook)] | queens;
  while let Some(idx) = straight.pop_lsb() {
    attacked |= rook_attacks(occupied, Square::from_index(idx).unwrap());
  }

  attacked
}

fn gen_king_moves(pos: &Position, in_check: bool, moves: &mut Vec<Move>) {
  let us = pos.stm;
  let ui = color_idx(us);
  let from = pos.bb[ui][piece_kind_idx(PieceKind::King)]
    .lsb_square()
    .expect("side to move has no king");

  let potential = king_attacks_tbl(from) & !pos.occ_side[ui];
  if potential.is_empty() {
    // Boxed in by friendly pieces; castling needs those squares too.
    return;
  }

  let attacked = enemy_attacks(pos, us);

  let mut targets = potential & !attacked;
  while let Some(to_idx) = targets.pop_lsb() {
    moves.push(Move::new(from, Square::from_index(to_idx).unwrap(), PieceKind::King));
  }

  // No castling out of check.
  if in_check {
    return;
  }

  match us {
    Color::White => {
      if pos.castling & crate::position::WHITE_KING_SIDE != 0
        && (WHITE_KING_SIDE_FREE & pos.occ_all).is_empty()
        && (WHITE_KING_SIDE_SAFE & attacked).is_empty()
      {
        moves.push(Move::castle_king_side(Square::E1, Square::G1));
      }
      if pos.castling & crate::position::WHITE_QUEEN_SIDE != 0
        && (WHITE_QUEEN_SIDE_FREE & pos.occ_all).is_empty()
        && (WHITE_QUEEN_SIDE_SAFE & attacked).is_empty()
      {
        moves.push(Move::castle_queen_side(Square::E1, Square::C1));
      }
    }
    Color::Black => {
      if pos.castling & crate::position::BLACK_KING_SIDE != 0
        && (BLACK_KING_SIDE_FREE & pos.occ_all).is_empty()
        && (BLACK_KING_SIDE_SAFE & attacked).is_empty()
      {
        moves.push(Move::castle_king_side(Square::E8, Square::G8));
      }
      if pos.castling & crate::position::BLACK_QUEEN_SIDE != 0
        && (BLACK_QUEEN_SIDE_FREE & pos.occ_all).is_empty()
        && (BLACK_QUEEN_SIDE_SAFE & attacked).is_empty()
      {
        moves.push(Move::castle_queen_side(Square::E8, Square::C8));
      }
    }
  }
}
