//! UCI shell over stdin/stdout.
//! Supported commands:
//! - `uci` → id/author + `uciok`
//! - `isready` → `readyok`
//! - `ucinewgame` → reset position to startpos
//! - `position startpos [moves ...]` or `position fen <FEN 6 fields> [moves ...]`
//! - `go depth N` → search and print `bestmove`
//! - `go perft N` → total node count with timing
//! - `perft N` → divide output, one `<move>: <count>` line per root move
//! - `stop` → report the last best move, if any
//! - `quit` → return from the run loop
//!
//! Unknown commands are logged as `info string` lines and ignored. Parsing
//! and handlers stay explicit: no async, no threads.
#![allow(dead_code)]

use std::io::{self, BufRead, Write};
use std::time::Instant;

use crate::fen;
use crate::moves::{parse_move, Move};
use crate::perft::{perft, perft_divide};
use crate::position::Position;
use crate::search::search_bestmove;
use crate::START_FEN;

/// The UCI engine state. Owns the current position and the last search result.
pub struct UciEngine {
  pub pos: Position,
  best_move: Option<Move>,
}

impl UciEngine {
  pub fn new() -> Self {
    Self {
      pos: fen::parse(START_FEN).expect("startpos FEN must parse"),
      best_move: None,
    }
  }

  /// Main read-eval-print loop for UCI over stdin/stdout.
  /// Returns when it sees `quit`.
  pub fn run_stdio(&mut self) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
      let Ok(line) = line else { break }; // EOF or error ends the loop
      let line = line.trim();
      if line.is_empty() { continue; }
      if self.handle_line(line, &mut stdout) { break; }
    }
  }

  /// Handle a single UCI command line. Returns true if we should quit.
  pub fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> bool {
    let mut it = line.split_whitespace();
    let Some(cmd) = it.next() else { return false };
    match cmd {
      "uci" => {
        writeln!(out, "id name pincer").ok();
        writeln!(out, "id author pincer developers").ok();
        writeln!(out, "uciok").ok();
        out.flush().ok();
      }
      "isready" => {
        writeln!(out, "readyok").ok();
        out.flush().ok();
      }
      "ucinewgame" => {
        self.reset();
      }
      "position" => {
        let rest: Vec<&str> = it.collect();
        self.handle_position(&rest, out);
      }
      "go" => {
        let rest: Vec<&str> = it.collect();
        self.handle_go(&rest, out);
      }
      "perft" => {
        let rest: Vec<&str> = it.collect();
        self.handle_perft(&rest, out);
      }
      "stop" => {
        if let Some(mv) = self.best_move {
          writeln!(out, "bestmove {}", mv).ok();
          out.flush().ok();
        }
      }
      "quit" => {
        return true;
      }
      _ => {
        writeln!(out, "info string unknown command: {}", cmd).ok();
        out.flush().ok();
      }
    }
    false
  }

  /// `position` command handler.
  /// Accepts: `startpos [moves ...]` or `fen <6 fields> [moves ...]`.
  fn handle_position(&mut self, tokens: &[&str], out: &mut dyn Write) {
    if tokens.is_empty() { return; }

    let moves_at = match tokens[0] {
      "startpos" => {
        self.reset();
        1
      }
      "fen" => {
        // Everything up to the optional `moves` keyword is the FEN.
        let end = tokens.iter().position(|&t| t == "moves").unwrap_or(tokens.len());
        let fen_fields = tokens[1..end].join(" ");
        match fen::parse(&fen_fields) {
          Ok(p) => {
            self.pos = p;
            self.best_move = None;
          }
          Err(e) => {
            writeln!(out, "info string {}", e).ok();
            return;
          }
        }
        end
      }
      other => {
        writeln!(out, "info string unknown position argument: {}", other).ok();
        return;
      }
    };

    if tokens.get(moves_at) == Some(&"moves") {
      for token in &tokens[moves_at + 1..] {
        match parse_move(token, &self.pos) {
          Ok(mv) => self.pos.apply(mv),
          Err(e) => {
            // Leave the position as it was before the bad move.
            writeln!(out, "info string {}", e).ok();
            return;
          }
        }
      }
    }
  }

  /// `go` command handler: `go perft N` and `go depth N`.
  fn handle_go(&mut self, tokens: &[&str], out: &mut dyn Write) {
    if tokens.len() >= 2 && tokens[0] == "perft" {
      if let Ok(depth) = tokens[1].parse::<u32>() {
        let start = Instant::now();
        let nodes = perft(&self.pos, depth);
        let elapsed = start.elapsed();
        writeln!(
          out,
          "nodes {} time {} ms nps {}",
          nodes,
          elapsed.as_millis(),
          (nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64
        ).ok();
        out.flush().ok();
      }
      return;
    }

    if tokens.len() >= 2 && tokens[0] == "depth" {
      if let Ok(depth) = tokens[1].parse::<u32>() {
        if let Some(mv) = search_bestmove(&self.pos, depth.max(1)) {
          writeln!(out, "bestmove {}", mv).ok();
          out.flush().ok();
          self.best_move = Some(mv);
          // Keep playing from the chosen move, as GUIs expect.
          self.pos.apply(mv);
        }
      }
    }
  }

  /// `perft N` command handler: divide output plus a summary line.
  fn handle_perft(&mut self, tokens: &[&str], out: &mut dyn Write) {
    let depth = match tokens.first() {
      Some(d) => match d.parse::<u32>() {
        Ok(d) if d > 0 => d,
        _ => {
          writeln!(out, "info string invalid perft depth: {}", d).ok();
          return;
        }
      },
      None => 1,
    };

    let start = Instant::now();
    let total = perft_divide(&self.pos, depth, |mv, count| {
      writeln!(out, "{}: {}", mv, count).ok();
    });
    let elapsed = start.elapsed();
    writeln!(
      out,
      "nodes {} time {} ms nps {}",
      total,
      elapsed.as_millis(),
      (total as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64
    ).ok();
    out.flush().ok();
  }

  fn reset(&mut self) {
    self.pos = fen::parse(START_FEN).expect("startpos FEN must parse");
    self.best_move = None;
  }
}

impl Default for UciEngine {
  fn default() -> Self {
    UciEngine::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn run(eng: &mut UciEngine, line: &str) -> String {
    let mut out = Vec::new();
    eng.handle_line(line, &mut out);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn uci_handshake() {
    let mut eng = UciEngine::new();
    let out = run(&mut eng, "uci");
    assert!(out.contains("id name pincer"));
    assert!(out.ends_with("uciok\n"));
    assert_eq!(run(&mut eng, "isready"), "readyok\n");
  }

  #[test]
  fn quit_stops_the_loop() {
    let mut eng = UciEngine::new();
    let mut out = Vec::new();
    assert!(eng.handle_line("quit", &mut out));
    assert!(!eng.handle_line("isready", &mut out));
  }

  #[test]
  fn unknown_commands_are_logged() {
    let mut eng = UciEngine::new();
    let out = run(&mut eng, "flarp 12");
    assert!(out.contains("unknown command: flarp"));
  }

  #[test]
  fn position_startpos_with_moves() {
    let mut eng = UciEngine::new();
    run(&mut eng, "position startpos moves e2e4 c7c5 g1f3");
    assert_eq!(
      fen::render(&eng.pos),
      "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
  }

  #[test]
  fn position_fen_with_moves() {
    let mut eng = UciEngine::new();
    run(&mut eng, "position fen r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1 moves e1g1");
    assert_eq!(fen::render(&eng.pos), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
  }

  #[test]
  fn bad_fen_and_bad_move_are_reported() {
    let mut eng = UciEngine::new();
    let out = run(&mut eng, "position fen not a fen at all -");
    assert!(out.contains("invalid FEN"));
    let out = run(&mut eng, "position startpos moves e9e4");
    assert!(out.contains("invalid move string"));
  }

  #[test]
  fn go_perft_reports_node_count() {
    let mut eng = UciEngine::new();
    run(&mut eng, "position startpos");
    let out = run(&mut eng, "go perft 2");
    assert!(out.starts_with("nodes 400 "), "unexpected output: {}", out);
  }

  #[test]
  fn perft_divide_lists_every_root_move() {
    let mut eng = UciEngine::new();
    run(&mut eng, "position startpos");
    let out = run(&mut eng, "perft 2");
    let lines: Vec<&str> = out.lines().collect();
    // 20 root moves plus the summary.
    assert_eq!(lines.len(), 21);
    assert!(lines.iter().any(|l| *l == "e2e4: 20"));
    assert!(lines.last().unwrap().starts_with("nodes 400"));
  }

  #[test]
  fn go_depth_reports_and_plays_a_bestmove() {
    let mut eng = UciEngine::new();
    run(&mut eng, "position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let out = run(&mut eng, "go depth 2");
    assert_eq!(out, "bestmove a1a8\n");
    // The engine keeps playing from the move it chose.
    assert_eq!(eng.pos.stm, crate::Color::Black);
    let out = run(&mut eng, "stop");
    assert_eq!(out, "bestmove a1a8\n");
  }
}
