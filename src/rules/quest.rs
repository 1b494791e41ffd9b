//! Quest commitment and progress resolution.

use crate::cards::{CardId, CardKind};
use crate::choice::{choose_one, ChoiceOption, ChoiceProvider};
use crate::core::GameState;
use crate::events::{topics, EventContext, EventDispatcher};

/// Each player in turn order commits willing characters to the quest.
///
/// Eligible characters are uncommitted, ready, and able to quest. Players
/// pick one at a time until they finish.
pub fn commit_characters(state: &mut GameState, choices: &mut dyn ChoiceProvider) {
    for player in state.players_in_turn_order() {
        loop {
            let available: Vec<CardId> = state
                .player(player)
                .characters()
                .filter(|&id| {
                    let c = state.card(id).character();
                    !c.committed && !c.exhausted && c.can_quest()
                })
                .collect();
            if available.is_empty() {
                break;
            }

            let mut options: Vec<ChoiceOption> = available
                .iter()
                .map(|&id| {
                    let c = state.card(id);
                    ChoiceOption::for_card(
                        format!("Commit {} (Willpower {})", c.title, c.character().willpower),
                        id,
                    )
                })
                .collect();
            options.push(ChoiceOption::new("Finish"));

            let idx = choose_one(choices, "Commit characters to the quest:", &options);
            if idx == options.len() - 1 {
                break;
            }
            state.card_mut(available[idx]).character_mut().committed = true;
        }
    }
}

/// Total willpower of every committed, ready, quest-capable character.
#[must_use]
pub fn committed_willpower(state: &GameState) -> i64 {
    contributors(state)
        .iter()
        .map(|&id| state.card(id).character().willpower)
        .sum()
}

fn contributors(state: &GameState) -> Vec<CardId> {
    let mut out = Vec::new();
    for player in state.player_ids() {
        out.extend(state.player(player).characters().filter(|&id| {
            let c = state.card(id).character();
            c.committed && !c.exhausted && c.can_quest()
        }));
    }
    out
}

/// Resolve the quest: net progress = committed willpower minus staging
/// threat.
///
/// Positive net progress goes to the active location, or to the active
/// quest if no location is active, never both. A non-positive result raises
/// every player's threat by the shortfall. Afterward each committed
/// character exhausts unless a hook sets `prevent_exhaustion`, and all
/// commitments are cleared.
pub fn resolve_quest(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
) {
    let willpower = committed_willpower(state);
    let threat = state.staging_threat();
    let net = willpower - threat;
    tracing::info!(willpower, staging_threat = threat, net, "quest resolution");

    if net > 0 {
        place_progress(state, events, choices, net);
    } else {
        let shortfall = -net;
        for player in state.player_ids() {
            state.player_mut(player).raise_threat(shortfall);
        }
    }

    // Exhaust committed characters, honoring per-character vetoes.
    for player in state.player_ids() {
        let committed: Vec<CardId> = state
            .player(player)
            .characters()
            .filter(|&id| state.card(id).character().committed)
            .collect();
        for id in committed {
            let mut ctx = EventContext::new()
                .with_card("character", id)
                .with_player("player", player);
            ctx.set_bool("prevent_exhaustion", false);
            events.publish(topics::BEFORE_QUEST_EXHAUSTION, &mut ctx, state, choices);

            let character = state.card_mut(id).character_mut();
            if !ctx.bool_value("prevent_exhaustion") {
                character.exhausted = true;
            }
            character.committed = false;
        }
    }
}

/// Place progress on the active location, or the active quest if no
/// location is active. Non-positive amounts are ignored.
///
/// A location reaching its quest points is explored: it stops being the
/// active location and moves to the victory display when it carries victory
/// points, otherwise to the encounter discard.
pub fn place_progress(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    amount: i64,
) {
    if amount <= 0 {
        return;
    }
    if let Some(loc_id) = state.active_location {
        let location = state
            .card_mut(loc_id)
            .as_location_mut()
            .expect("active location is a location");
        location.progress += amount;
        if location.progress >= location.quest_points {
            location.explored = true;
            let victory = location.victory_points > 0;
            state.active_location = None;
            if victory {
                state.victory_display.push(loc_id);
            } else {
                state.encounter_discard.push(loc_id);
            }
            tracing::info!(location = %state.card(loc_id).title, "explored");

            let mut ctx = EventContext::new().with_card("location", loc_id);
            events.publish(topics::LOCATION_EXPLORED, &mut ctx, state, choices);
        }
    } else if let Some(quest_id) = state.active_quest {
        if let CardKind::Quest(q) = &mut state.card_mut(quest_id).kind {
            q.progress += amount;
        }
    }
}

/// The full Quest phase body.
pub fn quest_phase(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
) {
    if state.active_quest.is_none() {
        tracing::warn!("quest phase with no active quest");
        return;
    }
    commit_characters(state, choices);
    resolve_quest(state, events, choices);
}
