//! Resolution algorithms.
//!
//! Each submodule is one of the generic procedures the phases run: drawing,
//! resource generation, card play, quest resolution, engagement, combat.
//! They mutate [`GameState`](crate::core::GameState), publish events at
//! their fixed points, and ask the [`ChoiceProvider`](crate::choice) for
//! every player decision.
//!
//! Shared collections (staging area, engaged sets, committed characters)
//! are always snapshotted before iteration; hooks fired mid-loop may mutate
//! the originals.

pub mod combat;
pub mod draw;
pub mod engagement;
pub mod play;
pub mod quest;
pub mod resource;
