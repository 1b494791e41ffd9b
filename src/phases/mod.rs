//! The seven-phase round state machine.
//!
//! A round runs the phases in fixed order. Each phase brackets its body
//! with a `<Name>PhaseStart` / `<Name>PhaseEnd` event pair and delegates
//! the actual work to the [`rules`](crate::rules) procedures. The machine
//! never halts on its own; the orchestrator decides when to stop.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardKind};
use crate::choice::{choose_one, ChoiceOption, ChoiceProvider};
use crate::core::GameState;
use crate::events::{topics, EventContext, EventDispatcher};
use crate::rules;

/// One phase of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Resource,
    Planning,
    Quest,
    Travel,
    Encounter,
    Combat,
    Refresh,
}

impl Phase {
    /// The per-round phase order.
    pub const ALL: [Phase; 7] = [
        Phase::Resource,
        Phase::Planning,
        Phase::Quest,
        Phase::Travel,
        Phase::Encounter,
        Phase::Combat,
        Phase::Refresh,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Phase::Resource => "Resource",
            Phase::Planning => "Planning",
            Phase::Quest => "Quest",
            Phase::Travel => "Travel",
            Phase::Encounter => "Encounter",
            Phase::Combat => "Combat",
            Phase::Refresh => "Refresh",
        }
    }

    /// Topic published when this phase begins.
    #[must_use]
    pub fn start_topic(self) -> &'static str {
        match self {
            Phase::Resource => "ResourcePhaseStart",
            Phase::Planning => "PlanningPhaseStart",
            Phase::Quest => "QuestPhaseStart",
            Phase::Travel => "TravelPhaseStart",
            Phase::Encounter => "EncounterPhaseStart",
            Phase::Combat => "CombatPhaseStart",
            Phase::Refresh => "RefreshPhaseStart",
        }
    }

    /// Topic published when this phase ends.
    #[must_use]
    pub fn end_topic(self) -> &'static str {
        match self {
            Phase::Resource => "ResourcePhaseEnd",
            Phase::Planning => "PlanningPhaseEnd",
            Phase::Quest => "QuestPhaseEnd",
            Phase::Travel => "TravelPhaseEnd",
            Phase::Encounter => "EncounterPhaseEnd",
            Phase::Combat => "CombatPhaseEnd",
            Phase::Refresh => "RefreshPhaseEnd",
        }
    }

    /// Execute this phase, bracketed by its start and end events.
    pub fn run(
        self,
        state: &mut GameState,
        events: &mut EventDispatcher,
        choices: &mut dyn ChoiceProvider,
    ) {
        state.current_phase = Some(self);
        tracing::info!(phase = self.name(), round = state.round_number, "phase start");

        let mut start = EventContext::new();
        events.publish(self.start_topic(), &mut start, state, choices);

        match self {
            Phase::Resource => rules::resource::collect_resources(state),
            Phase::Planning => rules::play::planning_round(state, events, choices),
            Phase::Quest => rules::quest::quest_phase(state, events, choices),
            Phase::Travel => travel_phase(state, events, choices),
            Phase::Encounter => encounter_phase(state, events, choices),
            Phase::Combat => combat_phase(state, events, choices),
            Phase::Refresh => refresh_phase(state, events, choices),
        }

        let mut end = EventContext::new();
        events.publish(self.end_topic(), &mut end, state, choices);
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Travel: with no active location, the active player may pick one staging
/// location to travel to. Its progress resets to zero.
fn travel_phase(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
) {
    if state.active_location.is_some() {
        return;
    }
    let locations: Vec<CardId> = state
        .staging
        .iter()
        .copied()
        .filter(|&id| matches!(state.card(id).kind, CardKind::Location(_)))
        .collect();
    if locations.is_empty() {
        return;
    }

    let mut options: Vec<ChoiceOption> = locations
        .iter()
        .map(|&id| ChoiceOption::for_card(state.card(id).title.clone(), id))
        .collect();
    options.push(ChoiceOption::new("Do not travel"));
    let idx = choose_one(choices, "Travel to a location?", &options);
    let Some(&location) = locations.get(idx) else {
        return;
    };

    state.staging.retain(|&id| id != location);
    let loc = state
        .card_mut(location)
        .as_location_mut()
        .expect("travel target is a location");
    loc.progress = 0;
    state.active_location = Some(location);
    tracing::info!(location = %state.card(location).title, "traveled");

    let mut ctx = EventContext::new()
        .with_card("location", location)
        .with_player("player", state.active_player());
    events.publish(topics::LOCATION_TRAVELED, &mut ctx, state, choices);
}

/// Encounter: reveal one encounter card per player into staging, then run
/// engagement checks.
fn encounter_phase(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
) {
    for _ in state.player_ids() {
        let Some(card) = state.draw_encounter_card() else {
            tracing::warn!("encounter deck and discard empty");
            break;
        };
        state.staging.push(card);
        tracing::info!(card = %state.card(card).title, "revealed");

        let mut ctx = EventContext::new().with_card("card", card);
        events.publish(topics::ENCOUNTER_CARD_REVEALED, &mut ctx, state, choices);
    }

    rules::engagement::resolve_engagement(state, events, choices);
}

/// Combat: every enemy attack resolves before any player attacks back.
fn combat_phase(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
) {
    for player in state.players_in_turn_order() {
        rules::combat::resolve_enemy_attacks(state, events, choices, player);
    }
    for player in state.players_in_turn_order() {
        if !state.player(player).engaged.is_empty() {
            rules::combat::resolve_player_attacks(state, events, choices, player);
        }
    }
}

/// Refresh: ready everyone, bump threat, draw, advance the round.
fn refresh_phase(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
) {
    for player in state.player_ids() {
        let characters: Vec<CardId> = state.player(player).characters().collect();
        for id in characters {
            state.card_mut(id).character_mut().exhausted = false;
        }
        state.player_mut(player).new_allies_this_round.clear();
        state.player_mut(player).raise_threat(1);
        rules::draw::draw_cards(state, events, choices, player, 1);
    }
    state.round_number += 1;
    state.rotate_active_player();
}
