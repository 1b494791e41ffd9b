//! Core game state: players, the card arena, and seeded randomness.

mod player;
mod rng;
mod state;

pub use player::{Player, PlayerId, THREAT_LIMIT};
pub use rng::GameRng;
pub use state::GameState;
