//! Precomputed attack tables for every piece kind.
//! Leapers (knight, king, pawn) use bitboard shifts with **file-edge masks**
//! to prevent horizontal wrap. Sliders (bishop, rook, queen) go through
//! magic-bitboard lookup tables; the per-direction blocker scans remain as
//! the reference implementation the tables are filled from.
//! Indexing matches `Square`: A1=0..H8=63; N=+8, S=-8, E=+1, W=-1.
#![allow(dead_code)]
#![allow(clippy::needless_range_loop)]

use crate::square::Square;
use crate::bitboard::Bitboard;
use crate::{Color, color_idx};

use once_cell::sync::Lazy;
use rand::{rngs::StdRng, Rng, SeedableRng};

const FILE_A: u64 = crate::bitboard::FILE_A.0;
const FILE_B: u64 = crate::bitboard::FILE_B.0;
const FILE_G: u64 = crate::bitboard::FILE_G.0;
const FILE_H: u64 = crate::bitboard::FILE_H.0;

const FILE_AB: u64 = FILE_A | FILE_B; // a,b files
const FILE_GH: u64 = FILE_G | FILE_H; // g,h files

/// Ray directions, indexable into the ray table. Opposite direction is +4 mod 8.
pub const NORTH: usize = 0;
pub const NORTH_EAST: usize = 1;
pub const EAST: usize = 2;
pub const SOUTH_EAST: usize = 3;
pub const SOUTH: usize = 4;
pub const SOUTH_WEST: usize = 5;
pub const WEST: usize = 6;
pub const NORTH_WEST: usize = 7;

// (rank, file) steps in the same order as the direction constants.
const DIR_STEPS: [(i8, i8); 8] = [
  (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1),
];

/// Force every table (including the magic tables) to be built now.
/// Called once at program start; all tables are immutable afterwards and
/// safe to share across threads.
pub fn init() {
  Lazy::force(&KNIGHT_TBL);
  Lazy::force(&KING_TBL);
  Lazy::force(&PAWN_TBL);
  Lazy::force(&RAY_TBL);
  Lazy::force(&BETWEEN_TBL);
  Lazy::force(&LINE_TBL);
  Lazy::force(&BISHOP_MAGIC);
  Lazy::force(&ROOK_MAGIC);
}

/// Knight attack mask on an empty board from `sq` (no blockers).
pub fn knight_attacks(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  // Piece position
  let s = 1u64 << sq.index();

  bitboard.0 |=
    (s & !FILE_A)  << 15 |   // 2N+1W
    (s & !FILE_H)  << 17 |   // 2N+1E
    (s & !FILE_GH) << 10 |   // 2E+1N
    (s & !FILE_GH) >> 6  |   // 2E+1S
    (s & !FILE_H)  >> 15 |   // 2S+1E
    (s & !FILE_A)  >> 17 |   // 2S+1W
    (s & !FILE_AB) >> 10 |  // 2W+1S
    (s & !FILE_AB) << 6;    // 2W+1N
  bitboard
}

/// Table-backed knight attacks (precomputed via once_cell::Lazy).
pub fn knight_attacks_tbl(sq: Square) -> Bitboard {
  KNIGHT_TBL[sq.index() as usize]
}

/// King attack mask on an empty board from `sq` (no blockers).
pub fn king_attacks(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  // Piece position
  let s = 1u64 << sq.index();

  bitboard.0 |=
    (s & !FILE_A) << 7 | // NW
    (s & !FILE_A) >> 1 | // W
    (s & !FILE_A) >> 9 | // SW
    (s & !FILE_H) << 9 | // NE
    (s & !FILE_H) << 1 | // E
    (s & !FILE_H) >> 7 | // SE
    s << 8 | // N
    s >> 8;  // S
  bitboard
}

/// Table-backed king attacks (precomputed).
pub fn king_attacks_tbl(sq: Square) -> Bitboard {
  KING_TBL[sq.index() as usize]
}

/// Pawn attack mask on an empty board from `sq` for `color` (diagonals only; no pushes).
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
  pawn_attack_set(Bitboard(1u64 << sq.index()), color)
}

/// Table-backed pawn attacks (precomputed).
pub fn pawn_attacks_tbl(sq: Square, color: Color) -> Bitboard {
  PAWN_TBL[color_idx(color)][sq.index() as usize]
}

/// Squares attacked by a whole set of pawns of `color` at once.
pub fn pawn_attack_set(pawns: Bitboard, color: Color) -> Bitboard {
  let p = pawns.0;
  match color {
    Color::White => Bitboard(
      (p & !FILE_A) << 7 | // NW
      (p & !FILE_H) << 9,  // NE
    ),
    Color::Black => Bitboard(
      (p & !FILE_A) >> 9 | // SW
      (p & !FILE_H) >> 7,  // SE
    ),
  }
}

/// Empty-board ray in the N direction from `sq` (stops at board edge).
pub fn ray_n(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while s != 0 {
    bitboard.0 |= s << 8;
    s <<= 8;
  }
  bitboard
}

/// Empty-board ray in the S direction from `sq` (stops at board edge).
pub fn ray_s(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while s != 0 {
    bitboard.0 |= s >> 8;
    s >>= 8;
  }
  bitboard
}

/// Empty-board ray in the E direction from `sq` (stops at board edge).
pub fn ray_e(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_H) != 0 {
    bitboard.0 |= s << 1;
    s <<= 1;
  }
  bitboard
}

/// Empty-board ray in the W direction from `sq` (stops at board edge).
pub fn ray_w(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_A) != 0 {
    bitboard.0 |= s >> 1;
    s >>= 1;
  }
  bitboard
}

/// Empty-board ray in the NE direction from `sq` (stops at board edge).
pub fn ray_ne(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_H) != 0 {
    bitboard.0 |= s << 9;
    s <<= 9;
  }
  bitboard
}

/// Empty-board ray in the NW direction from `sq` (stops at board edge).
pub fn ray_nw(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_A) != 0 {
    bitboard.0 |= s << 7;
    s <<= 7;
  }
  bitboard
}

/// Empty-board ray in the SE direction from `sq` (stops at board edge).
pub fn ray_se(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_H) != 0 {
    bitboard.0 |= s >> 7;
    s >>= 7;
  }
  bitboard
}

/// Empty-board ray in the SW direction from `sq` (stops at board edge).
pub fn ray_sw(sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_A) != 0 {
    bitboard.0 |= s >> 9;
    s >>= 9;
  }
  bitboard
}

/// Empty-board ray by direction index.
pub fn ray(dir: usize, sq: Square) -> Bitboard {
  match dir {
    NORTH => ray_n(sq),
    NORTH_EAST => ray_ne(sq),
    EAST => ray_e(sq),
    SOUTH_EAST => ray_se(sq),
    SOUTH => ray_s(sq),
    SOUTH_WEST => ray_sw(sq),
    WEST => ray_w(sq),
    NORTH_WEST => ray_nw(sq),
    _ => unreachable!("invalid ray direction"),
  }
}

/// Table-backed empty-board ray by direction index.
pub fn ray_tbl(dir: usize, sq: Square) -> Bitboard {
  RAY_TBL[dir][sq.index() as usize]
}

/// Squares strictly between two collinear squares; empty if not collinear.
pub fn between(a: Square, b: Square) -> Bitboard {
  BETWEEN_TBL[a.index() as usize][b.index() as usize]
}

/// The full rank, file or diagonal through two collinear squares (both
/// endpoints included); empty if not collinear.
pub fn line_through(a: Square, b: Square) -> Bitboard {
  LINE_TBL[a.index() as usize][b.index() as usize]
}

/// Blocker-aware attacks in the N direction: includes the first blocker and stops.
pub fn attack_n(occ: Bitboard, sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while s != 0 {
    s <<= 8;
    bitboard.0 |= s;

    if (s & occ.0) != 0 { break; }
  }
  bitboard
}

/// Blocker-aware attacks in the S direction: includes the first blocker and stops.
pub fn attack_s(occ: Bitboard, sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while s != 0 {
    s >>= 8;
    bitboard.0 |= s;

    if (s & occ.0) != 0 { break; }
  }
  bitboard
}

/// Blocker-aware attacks in the E direction: includes the first blocker and stops.
pub fn attack_e(occ: Bitboard, sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_H) != 0 {
    s <<= 1;
    bitboard.0 |= s;

    if (s & occ.0) != 0 { break; }
  }
  bitboard
}

/// Blocker-aware attacks in the W direction: includes the first blocker and stops.
pub fn attack_w(occ: Bitboard, sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_A) != 0 {
    s >>= 1;
    bitboard.0 |= s;

    if (s & occ.0) != 0 { break; }
  }
  bitboard
}

/// Blocker-aware attacks in the NE direction: includes the first blocker and stops.
pub fn attack_ne(occ: Bitboard, sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_H) != 0 {
    s <<= 9;
    bitboard.0 |= s;

    if (s & occ.0) != 0 { break; }
  }
  bitboard
}

/// Blocker-aware attacks in the SE direction: includes the first blocker and stops.
pub fn attack_se(occ: Bitboard, sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_H) != 0 {
    s >>= 7;
    bitboard.0 |= s;

    if (s & occ.0) != 0 { break; }
  }
  bitboard
}

/// Blocker-aware attacks in the NW direction: includes the first blocker and stops.
pub fn attack_nw(occ: Bitboard, sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_A) != 0 {
    s <<= 7;
    bitboard.0 |= s;

    if (s & occ.0) != 0 { break; }
  }
  bitboard
}

/// Blocker-aware attacks in the SW direction: includes the first blocker and stops.
pub fn attack_sw(occ: Bitboard, sq: Square) -> Bitboard {
  let mut bitboard = Bitboard::empty();
  let mut s = 1u64 << sq.index();

  while (s & !FILE_A) != 0 {
    s >>= 9;
    bitboard.0 |= s;

    if (s & occ.0) != 0 { break; }
  }
  bitboard
}

/// Empty-board sliding attacks (no blockers).
pub fn rook_attacks_empty(sq: Square) -> Bitboard { ray_n(sq) | ray_s(sq) | ray_e(sq) | ray_w(sq) }
/// Empty-board sliding attacks (no blockers).
pub fn bishop_attacks_empty(sq: Square) -> Bitboard { ray_ne(sq) | ray_nw(sq) | ray_se(sq) | ray_sw(sq) }
/// Empty-board sliding attacks (no blockers).
pub fn queen_attacks_empty(sq: Square) -> Bitboard { rook_attacks_empty(sq) | bishop_attacks_empty(sq) }

/// Reference rook attacks via per-direction blocker scans.
pub fn rook_attacks_ray(occ: Bitboard, sq: Square) -> Bitboard {
  attack_n(occ, sq) | attack_s(occ, sq) | attack_e(occ, sq) | attack_w(occ, sq)
}

/// Reference bishop attacks via per-direction blocker scans.
pub fn bishop_attacks_ray(occ: Bitboard, sq: Square) -> Bitboard {
  attack_ne(occ, sq) | attack_nw(occ, sq) | attack_se(occ, sq) | attack_sw(occ, sq)
}

/// Rook attacks given board occupancy (includes the first blocker in each ray).
/// Magic-bitboard lookup: `attacks[((occ & mask) * magic) >> shift]`.
pub fn rook_attacks(occ: Bitboard, sq: Square) -> Bitboard {
  ROOK_MAGIC[sq.index() as usize].lookup(occ)
}

/// Bishop attacks given board occupancy (includes the first blocker in each ray).
pub fn bishop_attacks(occ: Bitboard, sq: Square) -> Bitboard {
  BISHOP_MAGIC[sq.index() as usize].lookup(occ)
}

/// Queen attacks: the union of bishop and rook attacks from the same square.
pub fn queen_attacks(occ: Bitboard, sq: Square) -> Bitboard {
  rook_attacks(occ, sq) | bishop_attacks(occ, sq)
}

static KNIGHT_TBL: Lazy<[Bitboard; 64]> = Lazy::new(|| {
  let mut table = [Bitboard::empty(); 64];
  for s in 0..64 {
    table[s] = knight_attacks(Square::from_index(s as u8).unwrap());
  }
  table
});

static KING_TBL: Lazy<[Bitboard; 64]> = Lazy::new(|| {
  let mut table = [Bitboard::empty(); 64];
  for s in 0..64 {
    table[s] = king_attacks(Square::from_index(s as u8).unwrap());
  }
  table
});

static PAWN_TBL: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
  let mut table = [[Bitboard::empty(); 64]; 2];
  for s in 0..64 {
    let sq = Square::from_index(s as u8).unwrap();
    table[0][s] = pawn_attacks(sq, Color::White);
    table[1][s] = pawn_attacks(sq, Color::Black);
  }
  table
});

static RAY_TBL: Lazy<[[Bitboard; 64]; 8]> = Lazy::new(|| {
  let mut table = [[Bitboard::empty(); 64]; 8];
  for dir in 0..8 {
    for s in 0..64 {
      table[dir][s] = ray(dir, Square::from_index(s as u8).unwrap());
    }
  }
  table
});

static BETWEEN_TBL: Lazy<[[Bitboard; 64]; 64]> = Lazy::new(|| {
  let mut table = [[Bitboard::empty(); 64]; 64];
  for a in 0..64usize {
    let (rank, file) = (a as i8 / 8, a as i8 % 8);
    for dir in 0..8 {
      let (dr, df) = DIR_STEPS[dir];
      let mut seen = Bitboard::empty();
      let (mut r, mut f) = (rank + dr, file + df);
      while (0..8).contains(&r) && (0..8).contains(&f) {
        let b = (r * 8 + f) as usize;
        table[a][b] = seen;
        seen.0 |= 1u64 << b;
        r += dr;
        f += df;
      }
    }
  }
  table
});

static LINE_TBL: Lazy<[[Bitboard; 64]; 64]> = Lazy::new(|| {
  let mut table = [[Bitboard::empty(); 64]; 64];
  for a in 0..64usize {
    let sq = Square::from_index(a as u8).unwrap();
    let (rank, file) = (a as i8 / 8, a as i8 % 8);
    for dir in 0..8 {
      // The whole line through `a` in this direction and its opposite.
      let line = ray(dir, sq) | ray((dir + 4) % 8, sq) | Bitboard(1u64 << a);
      let (dr, df) = DIR_STEPS[dir];
      let (mut r, mut f) = (rank + dr, file + df);
      while (0..8).contains(&r) && (0..8).contains(&f) {
        let b = (r * 8 + f) as usize;
        table[a][b] = line;
        r += dr;
        f += df;
      }
    }
  }
  table
});

/// One magic-bitboard record: `attacks[((occ & mask) * magic) >> shift]`
/// yields the slider's attack set for any occupancy.
pub struct Magic {
  mask: Bitboard,
  magic: u64,
  shift: u32,
  attacks: Vec<Bitboard>,
}

impl Magic {
  #[inline]
  fn lookup(&self, occ: Bitboard) -> Bitboard {
    let idx = ((occ.0 & self.mask.0).wrapping_mul(self.magic) >> self.shift) as usize;
    self.attacks[idx]
  }
}

static BISHOP_MAGIC: Lazy<[Magic; 64]> = Lazy::new(|| {
  std::array::from_fn(|s| make_magic(Square::from_index(s as u8).unwrap(), true))
});

static ROOK_MAGIC: Lazy<[Magic; 64]> = Lazy::new(|| {
  std::array::from_fn(|s| make_magic(Square::from_index(s as u8).unwrap(), false))
});

/// The occupancy mask of relevant blockers: ray squares excluding the board
/// edge in each direction (an edge square never changes the attack set).
fn relevant_mask(sq: Square, bishop: bool) -> Bitboard {
  let mut mask = Bitboard::empty();
  let (rank, file) = (sq.rank() as i8, sq.file() as i8);
  let dirs: [usize; 4] = if bishop {
    [NORTH_EAST, SOUTH_EAST, SOUTH_WEST, NORTH_WEST]
  } else {
    [NORTH, EAST, SOUTH, WEST]
  };

  for dir in dirs {
    let (dr, df) = DIR_STEPS[dir];
    let (mut r, mut f) = (rank + dr, file + df);
    // Stop before the last on-board square of the ray.
    while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
      mask.0 |= 1u64 << (r * 8 + f);
      r += dr;
      f += df;
    }
  }
  mask
}

/// Expand the i-th subset of `mask` into an occupancy bitboard.
fn occupancy_subset(index: usize, mask: Bitboard) -> Bitboard {
  let mut occ = Bitboard::empty();
  let mut rest = mask;
  let mut i = 0;
  while let Some(sq) = rest.pop_lsb() {
    if index & (1 << i) != 0 {
      occ.0 |= 1u64 << sq;
    }
    i += 1;
  }
  occ
}

/// Search for a perfect-hash multiplier for this square and build its attack
/// table. The RNG is seeded per square, so the constants are stable across
/// runs, and every table entry is checked for destructive collisions before
/// the magic is accepted.
fn make_magic(sq: Square, bishop: bool) -> Magic {
  let mask = relevant_mask(sq, bishop);
  let bits = mask.count();
  let shift = 64 - bits;
  let size = 1usize << bits;

  let mut occupancies = Vec::with_capacity(size);
  let mut reference = Vec::with_capacity(size);
  for i in 0..size {
    let occ = occupancy_subset(i, mask);
    occupancies.push(occ);
    reference.push(if bishop {
      bishop_attacks_ray(occ, sq)
    } else {
      rook_attacks_ray(occ, sq)
    });
  }

  let seed = sq.index() as u64 + if bishop { 0 } else { 64 };
  let mut rng = StdRng::seed_from_u64(seed);
  let mut attacks = vec![Bitboard::empty(); size];

  'candidates: loop {
    // Sparse candidates (few set bits) converge much faster.
    let magic = rng.random::<u64>() & rng.random::<u64>() & rng.random::<u64>();
    if (mask.0.wrapping_mul(magic) & 0xff00_0000_0000_0000).count_ones() < 6 {
      continue;
    }

    for entry in attacks.iter_mut() {
      *entry = Bitboard::empty();
    }

    for (occ, want) in occupancies.iter().zip(&reference) {
      let idx = (occ.0.wrapping_mul(magic) >> shift) as usize;
      // An attack set is never empty, so empty marks an unused slot.
      if attacks[idx].is_empty() {
        attacks[idx] = *want;
      } else if attacks[idx] != *want {
        continue 'candidates;
      }
    }

    return Magic { mask, magic, shift, attacks };
  }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;
    use crate::bitboard::Bitboard;

    fn bb_from_indices(idxs: &[u8]) -> Bitboard {
        let mut bb = Bitboard::empty();
        for &i in idxs { bb.0 |= 1u64 << i; }
        bb
    }

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn knight_attacks_edges_and_center() {
        assert_eq!(knight_attacks(sq("a1")).count(), 2);   // b3,c2
        assert_eq!(knight_attacks(sq("h8")).count(), 2);   // f7,g6
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
    }

    #[test]
    fn king_attacks_edges_and_center() {
        assert_eq!(king_attacks(sq("a1")).count(), 3);     // a2,b1,b2
        assert_eq!(king_attacks(sq("h8")).count(), 3);     // g8,g7,h7
        assert_eq!(king_attacks(sq("d4")).count(), 8);
    }

    #[test]
    fn pawn_attacks_white_black_edges() {
        assert_eq!(pawn_attacks(sq("b2"), Color::White).count(), 2); // a3,c3
        assert_eq!(pawn_attacks(sq("a2"), Color::White).count(), 1); // b3
        assert_eq!(pawn_attacks(sq("h2"), Color::White).count(), 1); // g3
        assert_eq!(pawn_attacks(sq("b7"), Color::Black).count(), 2); // a6,c6
        assert_eq!(pawn_attacks(sq("a7"), Color::Black).count(), 1); // b6
        assert_eq!(pawn_attacks(sq("h7"), Color::Black).count(), 1); // g6
    }

    #[test]
    fn pawn_attack_set_matches_per_square_masks() {
        let pawns = bb_from_indices(&[8, 15, 35]); // a2, h2, d5
        for color in [Color::White, Color::Black] {
            let mut want = Bitboard::empty();
            for s in [8u8, 15, 35] {
                want |= pawn_attacks(Square::from_index(s).unwrap(), color);
            }
            assert_eq!(pawn_attack_set(pawns, color), want);
        }
    }

    #[test]
    fn tables_match_generators() {
        for i in 0u8..64 {
            let s = Square::from_index(i).unwrap();
            assert_eq!(knight_attacks_tbl(s), knight_attacks(s));
            assert_eq!(king_attacks_tbl(s), king_attacks(s));
            assert_eq!(pawn_attacks_tbl(s, Color::White), pawn_attacks(s, Color::White));
            assert_eq!(pawn_attacks_tbl(s, Color::Black), pawn_attacks(s, Color::Black));
            for dir in 0..8 {
                assert_eq!(ray_tbl(dir, s), ray(dir, s));
            }
        }
    }

    #[test]
    fn rays_counts_basic() {
        let a1 = sq("a1");
        let d4 = sq("d4");
        assert_eq!(ray_e(a1).count(), 7);
        assert_eq!(ray_n(a1).count(), 7);
        assert_eq!(ray_ne(a1).count(), 7);
        assert_eq!(ray_w(a1).count(), 0);
        assert_eq!(ray_s(a1).count(), 0);
        assert_eq!(ray_nw(a1).count(), 0);
        assert_eq!(ray_se(a1).count(), 0);
        assert_eq!(ray_sw(a1).count(), 0);
        // d4 center
        assert_eq!(ray_n(d4).count(), 4);
        assert_eq!(ray_s(d4).count(), 3);
        assert_eq!(ray_e(d4).count(), 4);
        assert_eq!(ray_w(d4).count(), 3);
        assert_eq!(ray_ne(d4).count(), 4);
        assert_eq!(ray_nw(d4).count(), 3);
        assert_eq!(ray_se(d4).count(), 3);
        assert_eq!(ray_sw(d4).count(), 3);
    }

    #[test]
    fn opposite_rays_are_disjoint_and_exclude_origin() {
        for i in 0u8..64 {
            let s = Square::from_index(i).unwrap();
            for dir in 0..8 {
                let fwd = ray_tbl(dir, s);
                let back = ray_tbl((dir + 4) % 8, s);
                assert!((fwd & back).is_empty(), "rays overlap from {}", s);
                assert!(!fwd.test(s), "ray contains its own origin {}", s);
            }
        }
    }

    #[test]
    fn between_examples() {
        // Same diagonal
        assert_eq!(between(sq("a1"), sq("h8")).count(), 6);
        assert!(between(sq("a1"), sq("h8")).test(sq("d4")));
        // Same file, adjacent: nothing in between
        assert!(between(sq("e1"), sq("e2")).is_empty());
        assert_eq!(between(sq("e1"), sq("e8")).count(), 6);
        // Not collinear
        assert!(between(sq("a1"), sq("b3")).is_empty());
    }

    #[test]
    fn between_is_symmetric() {
        for a in 0u8..64 {
            for b in 0u8..64 {
                let (sa, sb) = (Square::from_index(a).unwrap(), Square::from_index(b).unwrap());
                assert_eq!(between(sa, sb), between(sb, sa));
            }
        }
    }

    #[test]
    fn line_through_examples() {
        let diag = line_through(sq("a1"), sq("h8"));
        assert_eq!(diag.count(), 8);
        assert!(diag.test(sq("a1")) && diag.test(sq("h8")) && diag.test(sq("e5")));
        let file = line_through(sq("e2"), sq("e7"));
        assert_eq!(file.count(), 8);
        assert!(file.test(sq("e1")) && file.test(sq("e8")));
        assert!(line_through(sq("a1"), sq("c2")).is_empty());
    }

    #[test]
    fn line_through_is_symmetric() {
        for a in 0u8..64 {
            for b in 0u8..64 {
                let (sa, sb) = (Square::from_index(a).unwrap(), Square::from_index(b).unwrap());
                assert_eq!(line_through(sa, sb), line_through(sb, sa));
            }
        }
    }

    #[test]
    fn empty_sliders_counts() {
        let a1 = sq("a1");
        let d4 = sq("d4");
        assert_eq!(rook_attacks_empty(a1).count(), 14);
        assert_eq!(bishop_attacks_empty(a1).count(), 7);
        assert_eq!(queen_attacks_empty(a1).count(), 21);
        assert_eq!(rook_attacks_empty(d4).count(), 14);
        assert_eq!(bishop_attacks_empty(d4).count(), 13);
        assert_eq!(queen_attacks_empty(d4).count(), 27);
    }

    #[test]
    fn rook_blocker_examples() {
        let d4 = sq("d4");
        // blockers: g4 and d6
        let occ = bb_from_indices(&[30, 43]);
        let attacks = rook_attacks(occ, d4);
        // east stops at g4
        assert!(attacks.test(sq("e4")));
        assert!(attacks.test(sq("f4")));
        assert!(attacks.test(sq("g4")));
        assert!(!attacks.test(sq("h4")));
        // west to the edge
        assert!(attacks.test(sq("c4")));
        assert!(attacks.test(sq("b4")));
        assert!(attacks.test(sq("a4")));
        // north stops at d6
        assert!(attacks.test(sq("d5")));
        assert!(attacks.test(sq("d6")));
        assert!(!attacks.test(sq("d7")));
        // south to the edge
        assert!(attacks.test(sq("d3")));
        assert!(attacks.test(sq("d2")));
        assert!(attacks.test(sq("d1")));
    }

    #[test]
    fn bishop_blocker_examples() {
        let d4 = sq("d4");
        // blockers: b6 and f2
        let occ = bb_from_indices(&[41, 13]);
        let attacks = bishop_attacks(occ, d4);
        // NE to the edge
        assert!(attacks.test(sq("e5")));
        assert!(attacks.test(sq("f6")));
        assert!(attacks.test(sq("g7")));
        assert!(attacks.test(sq("h8")));
        // NW stops at b6
        assert!(attacks.test(sq("c5")));
        assert!(attacks.test(sq("b6")));
        assert!(!attacks.test(sq("a7")));
        // SE stops at f2
        assert!(attacks.test(sq("e3")));
        assert!(attacks.test(sq("f2")));
        assert!(!attacks.test(sq("g1")));
        // SW to the edge
        assert!(attacks.test(sq("c3")));
        assert!(attacks.test(sq("b2")));
        assert!(attacks.test(sq("a1")));
    }

    #[test]
    fn magic_lookup_matches_ray_scan_on_random_occupancies() {
        let mut rng = StdRng::seed_from_u64(0xbeef);
        for _ in 0..200 {
            // A plausible board density: ~16 occupied squares.
            let occ = Bitboard(rng.random::<u64>() & rng.random::<u64>());
            for i in 0u8..64 {
                let s = Square::from_index(i).unwrap();
                assert_eq!(rook_attacks(occ, s), rook_attacks_ray(occ, s), "rook {} occ {:x}", s, occ.0);
                assert_eq!(bishop_attacks(occ, s), bishop_attacks_ray(occ, s), "bishop {} occ {:x}", s, occ.0);
                assert_eq!(queen_attacks(occ, s), rook_attacks_ray(occ, s) | bishop_attacks_ray(occ, s));
            }
        }
    }

    #[test]
    fn relevant_masks_exclude_edges() {
        assert_eq!(relevant_mask(sq("a1"), false).count(), 12);
        assert_eq!(relevant_mask(sq("a4"), false).count(), 11);
        assert_eq!(relevant_mask(sq("d4"), false).count(), 10);
        assert_eq!(relevant_mask(sq("d4"), true).count(), 9);
        assert_eq!(relevant_mask(sq("a1"), true).count(), 6);
    }
}
