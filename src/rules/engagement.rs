//! Enemy engagement checks.

use crate::cards::{CardId, CardKind};
use crate::choice::ChoiceProvider;
use crate::core::{GameState, PlayerId};
use crate::events::{topics, EventContext, EventDispatcher};

/// Move `enemy` from staging to `player`'s engaged set.
pub fn engage(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    enemy: CardId,
    player: PlayerId,
) {
    let mut before = EventContext::new()
        .with_card("enemy", enemy)
        .with_player("player", player);
    events.publish(topics::BEFORE_ENEMY_ENGAGEMENT, &mut before, state, choices);

    state.staging.retain(|&id| id != enemy);
    state.card_mut(enemy).enemy_stats_mut().engaged_with = Some(player);
    state.player_mut(player).engaged.push(enemy);
    tracing::info!(enemy = %state.card(enemy).title, %player, "engaged");

    let mut after = EventContext::new()
        .with_card("enemy", enemy)
        .with_player("player", player);
    events.publish(topics::AFTER_ENEMY_ENGAGEMENT, &mut after, state, choices);
}

/// Run engagement checks for every enemy in staging.
///
/// Players are scanned in turn order starting from the active player; the
/// first player whose threat meets the enemy's engagement threshold engages
/// it. Enemies nobody is eligible for stay in staging. Iterates a snapshot
/// of the staging area since engaging mutates it.
pub fn resolve_engagement(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
) {
    let staged: Vec<CardId> = state.staging.clone();
    for id in staged {
        if !matches!(state.card(id).kind, CardKind::Enemy(_)) {
            continue;
        }
        if !state.staging.contains(&id) {
            // A hook already moved it.
            continue;
        }
        let threshold = state.card(id).enemy_stats().engagement;
        let target = state
            .players_in_turn_order()
            .into_iter()
            .find(|&p| state.player(p).threat() >= threshold);
        if let Some(player) = target {
            engage(state, events, choices, id, player);
        }
    }
}
