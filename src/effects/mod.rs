//! Data-driven one-shot effects.
//!
//! Event cards and shadow cards describe what they do as data; the engine
//! interprets it. Anything richer than these verbs belongs in a card
//! behavior module registered on the event dispatcher.

use serde::{Deserialize, Serialize};

use crate::choice::{choose_one, ChoiceOption, ChoiceProvider};
use crate::core::{GameState, PlayerId};
use crate::events::EventDispatcher;

/// A character stat targeted by a modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    Willpower,
    Attack,
    Defense,
    HitPoints,
}

/// One-shot effect of an event card.
///
/// Targets are resolved when the effect is applied: "choose a character"
/// verbs ask the controller through the choice provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Lower the controller's threat.
    ReduceThreat { amount: i64 },

    /// Raise every player's threat (Doomed-style).
    RaiseThreatAll { amount: i64 },

    /// Controller draws cards.
    DrawCards { count: u32 },

    /// Place progress on the active location, or the active quest if none.
    AddProgress { amount: i64 },

    /// Deal damage to a character of the controller's choice.
    DamageCharacter { amount: i64 },

    /// Heal a character of the controller's choice.
    HealCharacter { amount: i64 },

    /// Permanently modify a stat on a character of the controller's choice.
    ModifyStat { stat: Stat, delta: i64 },
}

/// One-shot modifier revealed from the encounter deck during an enemy
/// attack. Applies to that attack only and is never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowEffect {
    /// Add to the attacking enemy's attack for this attack.
    BoostAttack(i64),
    /// Add to the attacking enemy's defense for this attack.
    BoostDefense(i64),
    /// Deal damage to the declared defender after the attack resolves.
    DamageDefender(i64),
}

/// Apply an event-card effect on behalf of `controller`.
pub fn apply(
    effect: &Effect,
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    controller: PlayerId,
) {
    match effect {
        Effect::ReduceThreat { amount } => {
            state.player_mut(controller).reduce_threat(*amount);
        }
        Effect::RaiseThreatAll { amount } => {
            for id in state.player_ids() {
                state.player_mut(id).raise_threat(*amount);
            }
        }
        Effect::DrawCards { count } => {
            crate::rules::draw::draw_cards(state, events, choices, controller, *count);
        }
        Effect::AddProgress { amount } => {
            crate::rules::quest::place_progress(state, events, choices, *amount);
        }
        Effect::DamageCharacter { amount } => {
            if let Some(target) = pick_character(state, choices, "Deal damage to a character:") {
                crate::rules::combat::damage_character(state, events, choices, target, *amount);
            }
        }
        Effect::HealCharacter { amount } => {
            if let Some(target) = pick_character(state, choices, "Heal a character:") {
                state.card_mut(target).character_mut().hit_points += amount;
            }
        }
        Effect::ModifyStat { stat, delta } => {
            if let Some(target) = pick_character(state, choices, "Modify a character:") {
                let stats = state.card_mut(target).character_mut();
                match stat {
                    Stat::Willpower => stats.willpower += delta,
                    Stat::Attack => stats.attack += delta,
                    Stat::Defense => stats.defense += delta,
                    Stat::HitPoints => stats.hit_points += delta,
                }
            }
        }
    }
}

/// Ask the controller to pick any character currently in play.
fn pick_character(
    state: &GameState,
    choices: &mut dyn ChoiceProvider,
    prompt: &str,
) -> Option<crate::cards::CardId> {
    let mut candidates = Vec::new();
    for id in state.player_ids() {
        candidates.extend(state.player(id).characters());
    }
    if candidates.is_empty() {
        return None;
    }

    let options: Vec<ChoiceOption> = candidates
        .iter()
        .map(|&c| ChoiceOption::for_card(state.card(c).title.clone(), c))
        .collect();
    let idx = choose_one(choices, prompt, &options);
    Some(candidates[idx])
}
