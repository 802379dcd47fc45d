//! FEN parsing and rendering: piece placement, side-to-move, castling
//! rights, en-passant target and the move clocks.
//!
//! FEN stores the en-passant target as the square *behind* the double-pushed
//! pawn; the internal position stores the pawn's own square. The conversion
//! depends on the side to move and happens only here.
#![allow(dead_code)]

use crate::bitboard::Bitboard;
use crate::position::{Piece, PieceKind, Position};
use crate::square::Square;
use crate::{color_idx, Color};

/// Error returned when a FEN string is structurally invalid.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid FEN string: {fen}")]
pub struct FenError {
  fen: String,
}

impl FenError {
  fn new(fen: &str) -> FenError {
    FenError { fen: fen.to_string() }
  }
}

/// Parse a FEN string into a `Position`.
///
/// Expectations:
/// - Exactly 8 ranks in field 1, separated by 7 slashes '/'.
/// - Each rank sums to exactly 8 files (pieces + digits).
/// - Field 2 is either "w" or "b".
/// - Field 3 is a subset of "KQkq" or "-"; field 4 an algebraic square or "-".
/// - Fields 5 and 6 (halfmove clock, fullmove number) may be omitted and
///   default to 0 and 1.
pub fn parse(fen: &str) -> Result<Position, FenError> {
  let mut parts = fen.split_whitespace();
  // Piece placement data
  let ppd = parts.next().ok_or_else(|| FenError::new(fen))?;
  // Active color
  let ac = parts.next().ok_or_else(|| FenError::new(fen))?;
  // Castling rights
  let cr = parts.next().ok_or_else(|| FenError::new(fen))?;
  // En passant target
  let ep = parts.next().ok_or_else(|| FenError::new(fen))?;

  let mut position = Position::empty();
  let mut file: u8 = 0; // 0..=7
  let mut rank: u8 = 7; // 7..=0 (start from rank 8 and go down)
  let mut slashes: u8 = 0; // must be exactly 7

  for c in ppd.chars() {
    match c {
      '1'..='8' => {
        let empty_squares = c.to_digit(10).unwrap() as u8;
        file = file.saturating_add(empty_squares);
        if file > 8 {
          return Err(FenError::new(fen));
        }
      }
      '/' => {
        // End of a rank: must have exactly 8 files completed
        if file != 8 { return Err(FenError::new(fen)); }
        slashes = slashes.saturating_add(1);
        if slashes > 7 { return Err(FenError::new(fen)); }
        file = 0;
        // Move down one rank; if already at 0, underflow -> invalid
        if rank == 0 { return Err(FenError::new(fen)); }
        rank -= 1;
      }
      'p' | 'P' | 'n' | 'N' | 'b' | 'B' | 'r' | 'R' | 'q' | 'Q' | 'k' | 'K' => {
        if file >= 8 { return Err(FenError::new(fen)); }
        let sq = Square::from_file_rank(file, rank).ok_or_else(|| FenError::new(fen))?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        let kind = match c.to_ascii_lowercase() {
          'p' => PieceKind::Pawn,
          'n' => PieceKind::Knight,
          'b' => PieceKind::Bishop,
          'r' => PieceKind::Rook,
          'q' => PieceKind::Queen,
          'k' => PieceKind::King,
          _ => unreachable!(),
        };
        position.set_piece(sq, Piece { kind, color });
        file += 1;
      }
      _ => return Err(FenError::new(fen)),
    }
  }

  // After processing, we must be at the end of the last rank with exactly 8 files
  if !(slashes == 7 && rank == 0 && file == 8) {
    return Err(FenError::new(fen));
  }

  position.stm = match ac {
    "w" => Color::White,
    "b" => Color::Black,
    _ => return Err(FenError::new(fen)),
  };

  // Castling rights bitmask: WK=0b0001, WQ=0b0010, BK=0b0100, BQ=0b1000. '-' means none.
  for c in cr.chars() {
    match c {
      'K' => position.castling |= crate::position::WHITE_KING_SIDE,
      'Q' => position.castling |= crate::position::WHITE_QUEEN_SIDE,
      'k' => position.castling |= crate::position::BLACK_KING_SIDE,
      'q' => position.castling |= crate::position::BLACK_QUEEN_SIDE,
      '-' => {} // no castling rights
      _ => return Err(FenError::new(fen)),
    }
  }

  // En passant: '-' for none, otherwise the square behind the double-pushed
  // pawn ("e3"/"d6" style). Internally we keep the pawn's own square, one
  // rank toward the mover whose pawn it is.
  if ep != "-" {
    let behind = Square::parse(ep).ok_or_else(|| FenError::new(fen))?;
    let pawn_sq = match position.stm {
      // Black just double-pushed: behind is on rank 6, the pawn on rank 5.
      Color::White => behind.offset(-8),
      // White just double-pushed: behind is on rank 3, the pawn on rank 4.
      Color::Black => behind.offset(8),
    }
    .ok_or_else(|| FenError::new(fen))?;
    let pawn_bit = Bitboard::from_square(pawn_sq);
    // The pawn must land on rank 4 or 5; anything else is malformed.
    if (pawn_bit & (crate::bitboard::RANK_4 | crate::bitboard::RANK_5)).is_empty() {
      return Err(FenError::new(fen));
    }
    position.ep = pawn_bit;
  }

  if let Some(half) = parts.next() {
    position.halfmove = half.parse().map_err(|_| FenError::new(fen))?;
  }
  if let Some(full) = parts.next() {
    position.fullmove = full.parse().map_err(|_| FenError::new(fen))?;
  }

  Ok(position)
}

/// Render a position as a standard six-field FEN string.
pub fn render(pos: &Position) -> String {
  let mut out = String::with_capacity(90);

  for rank in (0..8).rev() {
    let mut empty = 0;
    for file in 0..8 {
      let sq = Square::from_file_rank(file, rank).unwrap();
      match pos.piece_at(sq) {
        Some(piece) => {
          if empty > 0 {
            out.push(char::from_digit(empty, 10).unwrap());
            empty = 0;
          }
          out.push(piece_char(piece));
        }
        None => empty += 1,
      }
    }
    if empty > 0 {
      out.push(char::from_digit(empty, 10).unwrap());
    }
    if rank > 0 {
      out.push('/');
    }
  }

  out.push(' ');
  out.push(match pos.stm {
    Color::White => 'w',
    Color::Black => 'b',
  });

  out.push(' ');
  if pos.castling == 0 {
    out.push('-');
  } else {
    // Contiguous letters in KQkq order.
    for (bit, c) in [
      (crate::position::WHITE_KING_SIDE, 'K'),
      (crate::position::WHITE_QUEEN_SIDE, 'Q'),
      (crate::position::BLACK_KING_SIDE, 'k'),
      (crate::position::BLACK_QUEEN_SIDE, 'q'),
    ] {
      if pos.castling & bit != 0 {
        out.push(c);
      }
    }
  }

  out.push(' ');
  match pos.ep_destination().lsb_square() {
    // `ep_destination` is exactly the FEN behind-square for the side to move.
    Some(sq) => out.push_str(&sq.to_string()),
    None => out.push('-'),
  }

  out.push_str(&format!(" {} {}", pos.halfmove, pos.fullmove));
  out
}

fn piece_char(piece: Piece) -> char {
  let c = match piece.kind {
    PieceKind::Pawn => 'p',
    PieceKind::Knight => 'n',
    PieceKind::Bishop => 'b',
    PieceKind::Rook => 'r',
    PieceKind::Queen => 'q',
    PieceKind::King => 'k',
  };
  if color_idx(piece.color) == 0 {
    c.to_ascii_uppercase()
  } else {
    c
  }
}
