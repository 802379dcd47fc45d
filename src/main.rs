use pincer::{attacks, uci};

fn main() {
  // Build all attack tables (including the magic tables) before the first
  // command arrives, so `position`/`perft` never pay the init cost.
  attacks::init();

  let mut eng = uci::UciEngine::new();
  eng.run_stdio();
}
