//! # rust-lcg
//!
//! A rules engine for a cooperative, phase-structured living card game.
//!
//! ## Design Principles
//!
//! 1. **Cards are data**: one [`Card`](cards::Card) struct with a tagged
//!    [`CardKind`](cards::CardKind) union; zone placement and capability
//!    checks branch on the kind, never on downcasts.
//!
//! 2. **Behavior via hooks**: the engine knows no specific cards. Card
//!    modules register [`Hook`](events::Hook)s against named topics and
//!    mutate the published [`EventContext`](events::EventContext) to alter
//!    generic outcomes.
//!
//! 3. **Decisions are external**: every player decision goes through the
//!    [`ChoiceProvider`](choice::ChoiceProvider) capability. The engine
//!    ships a scripted test double; UIs and AIs live outside the crate.
//!
//! 4. **Deterministic**: all randomness flows through a seeded
//!    [`GameRng`](core::GameRng), so a seed plus a decision script replays
//!    a whole game.
//!
//! ## Modules
//!
//! - `core`: players, threat, the card arena, seeded RNG
//! - `cards`: the card data model and capability overrides
//! - `events`: topic-keyed dispatcher, hooks, event contexts
//! - `choice`: the choice-provider capability and test double
//! - `effects`: data-driven one-shot effects and shadow effects
//! - `rules`: resolution algorithms (draw, play, quest, engagement, combat)
//! - `phases`: the seven-phase round state machine
//! - `game`: setup builder, round loop, win/loss evaluation

pub mod cards;
pub mod choice;
pub mod core;
pub mod effects;
pub mod error;
pub mod events;
pub mod game;
pub mod phases;
pub mod rules;

// Re-export commonly used types
pub use crate::cards::{Card, CardId, CardKind, Character, Sphere};
pub use crate::choice::{ChoiceOption, ChoiceProvider, ScriptedChoices};
pub use crate::core::{GameRng, GameState, Player, PlayerId, THREAT_LIMIT};
pub use crate::effects::{Effect, ShadowEffect, Stat};
pub use crate::error::IllegalAction;
pub use crate::events::{EventContext, EventDispatcher, Hook, HookId};
pub use crate::game::{Game, GameBuilder, GameOutcome, LossReason, PlayerSetup};
pub use crate::phases::Phase;
