//! Playing cards from hand: affordability, cost payment, zone placement.

use crate::cards::{CardId, CardKind, Sphere};
use crate::choice::{choose_one, ChoiceOption, ChoiceProvider};
use crate::core::{GameState, PlayerId};
use crate::error::IllegalAction;
use crate::events::{topics, EventContext, EventDispatcher};

/// Heroes of `player` able to pay toward a `sphere` cost, in list order:
/// matching sphere (any sphere for Neutral cards), not exhausted, holding
/// at least one resource.
fn paying_heroes(state: &GameState, player: PlayerId, sphere: Sphere) -> Vec<CardId> {
    state
        .player(player)
        .heroes
        .iter()
        .copied()
        .filter(|&id| {
            let card = state.card(id);
            let Some(hero) = card.as_hero() else { return false };
            let matches = sphere == Sphere::Neutral || card.sphere == sphere;
            matches && !hero.stats.exhausted && hero.resources > 0
        })
        .collect()
}

/// Can `player` pay for `card` right now?
#[must_use]
pub fn affordable(state: &GameState, player: PlayerId, card: CardId) -> bool {
    let (cost, sphere) = {
        let c = state.card(card);
        (c.cost, c.sphere)
    };
    let available: i64 = paying_heroes(state, player, sphere)
        .iter()
        .map(|&id| state.card(id).as_hero().map_or(0, |h| h.resources))
        .sum();
    available >= cost
}

/// Pay `card`'s cost from matching-sphere hero pools.
///
/// Heroes contribute in list order, first eligible hero first. Every hero
/// that contributes resources exhausts as a side effect of spending.
pub fn pay_cost(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    player: PlayerId,
    card: CardId,
) -> Result<(), IllegalAction> {
    let (cost, sphere, title) = {
        let c = state.card(card);
        (c.cost, c.sphere, c.title.clone())
    };
    if !affordable(state, player, card) {
        return Err(IllegalAction::Unaffordable { title, cost, sphere });
    }

    let mut remaining = cost;
    for hero_id in paying_heroes(state, player, sphere) {
        if remaining == 0 {
            break;
        }
        let hero = state
            .card_mut(hero_id)
            .as_hero_mut()
            .expect("paying hero is a hero");
        let spent = hero.resources.min(remaining);
        hero.resources -= spent;
        remaining -= spent;
        hero.stats.exhausted = true;

        let mut ctx = EventContext::new()
            .with_card("card", hero_id)
            .with_player("player", player);
        events.publish(topics::AFTER_EXHAUSTED, &mut ctx, state, choices);
    }
    debug_assert_eq!(remaining, 0);
    Ok(())
}

/// Legal attachment hosts: every character in any play area, plus every
/// card in the staging area.
fn attach_targets(state: &GameState) -> Vec<CardId> {
    let mut targets = Vec::new();
    for player in state.player_ids() {
        targets.extend(state.player(player).characters());
    }
    targets.extend(state.staging.iter().copied());
    targets
}

/// Play `card` from `player`'s hand: validate, pay, place, publish.
///
/// On any `Err` the game state is unchanged; the planning loop surfaces the
/// refusal as a re-prompt. Heroes and encounter-side kinds are not playable
/// from hand.
pub fn play_card(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    player: PlayerId,
    card: CardId,
) -> Result<(), IllegalAction> {
    let title = state.card(card).title.clone();
    if !state.player(player).hand.contains(&card) {
        return Err(IllegalAction::NotInHand { title });
    }
    match &state.card(card).kind {
        CardKind::Ally(_) | CardKind::Attachment(_) | CardKind::Event(_) => {}
        _ => return Err(IllegalAction::NotPlayable { title }),
    }

    // Attachment legality is checked before anything is paid.
    let attach_to = match &state.card(card).kind {
        CardKind::Attachment(a) => {
            if a.attached_to.is_some() {
                return Err(IllegalAction::AlreadyAttached { title });
            }
            let targets = attach_targets(state);
            if targets.is_empty() {
                return Err(IllegalAction::NoAttachTarget { title });
            }
            let options: Vec<ChoiceOption> = targets
                .iter()
                .map(|&t| ChoiceOption::for_card(state.card(t).title.clone(), t))
                .collect();
            let idx = choose_one(choices, &format!("Attach {title} to:"), &options);
            Some(targets[idx])
        }
        _ => None,
    };

    if !affordable(state, player, card) {
        let c = state.card(card);
        return Err(IllegalAction::Unaffordable {
            title,
            cost: c.cost,
            sphere: c.sphere,
        });
    }

    let mut before = EventContext::new()
        .with_card("card", card)
        .with_player("player", player);
    events.publish(topics::BEFORE_ANY_CARD_PLAYED, &mut before, state, choices);

    pay_cost(state, events, choices, player, card)?;
    state.player_mut(player).remove_from_hand(card);
    tracing::info!(%player, card = %state.card(card).title, "played");

    match state.card(card).kind.clone() {
        CardKind::Ally(_) => {
            state.player_mut(player).allies.push(card);
            state.player_mut(player).new_allies_this_round.insert(card);
            let mut ctx = EventContext::new()
                .with_card("ally", card)
                .with_player("player", player);
            events.publish(topics::AFTER_ALLY_PLAYED, &mut ctx, state, choices);
        }
        CardKind::Attachment(_) => {
            let host = attach_to.expect("attachment target was chosen");
            state
                .card_mut(card)
                .as_attachment_mut()
                .expect("attachment kind")
                .attached_to = Some(host);
            state.card_mut(host).attachments.push(card);
        }
        CardKind::Event(event_card) => {
            crate::effects::apply(&event_card.effect, state, events, choices, player);
            state.player_mut(player).discard.push(card);
        }
        _ => unreachable!("kind was validated above"),
    }

    let mut after = EventContext::new()
        .with_card("card", card)
        .with_player("player", player);
    events.publish(topics::AFTER_CARD_PLAYED, &mut after, state, choices);
    Ok(())
}

/// The Planning-phase loop: each player in turn order repeatedly plays an
/// affordable hand card or passes, then gets an action window.
pub fn planning_round(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
) {
    for player in state.players_in_turn_order() {
        loop {
            let playable: Vec<CardId> = state
                .player(player)
                .hand
                .iter()
                .copied()
                .filter(|&id| {
                    matches!(
                        state.card(id).kind,
                        CardKind::Ally(_) | CardKind::Attachment(_) | CardKind::Event(_)
                    ) && affordable(state, player, id)
                })
                .collect();
            if playable.is_empty() {
                break;
            }

            let mut options: Vec<ChoiceOption> = playable
                .iter()
                .map(|&id| {
                    let c = state.card(id);
                    ChoiceOption::for_card(format!("{} ({} {})", c.title, c.cost, c.sphere), id)
                })
                .collect();
            options.push(ChoiceOption::new("Pass"));

            let idx = choose_one(choices, "Play a card:", &options);
            if idx == options.len() - 1 {
                break;
            }
            if let Err(err) = play_card(state, events, choices, player, playable[idx]) {
                tracing::warn!(%player, %err, "refused play");
            }
        }

        let mut ctx = EventContext::new().with_player("player", player);
        events.publish(topics::PLAYER_ACTIONS, &mut ctx, state, choices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::choice::ScriptedChoices;
    use crate::core::Player;
    use crate::effects::Effect;

    fn leadership_state(resources: i64) -> (GameState, PlayerId, CardId) {
        let mut state = GameState::new(vec![Player::new("gav")], 5);
        let p = PlayerId::new(0);
        let hero = state.add_card(Card::hero("Boromir", Sphere::Leadership, 11, 1, 3, 2, 5));
        state.card_mut(hero).as_hero_mut().unwrap().resources = resources;
        state.player_mut(p).heroes.push(hero);
        (state, p, hero)
    }

    #[test]
    fn affordability_checks_matching_sphere_only() {
        let (mut state, p, _) = leadership_state(3);
        let matching = state.add_card(Card::ally("Errand-rider", 2, Sphere::Leadership, 1, 0, 0, 1));
        let off_sphere = state.add_card(Card::ally("Wandering Took", 2, Sphere::Spirit, 1, 0, 0, 2));
        let neutral = state.add_card(Card::ally("Treebeard", 3, Sphere::Neutral, 2, 3, 3, 9));

        assert!(affordable(&state, p, matching));
        assert!(!affordable(&state, p, off_sphere));
        // Neutral costs can be paid from any sphere.
        assert!(affordable(&state, p, neutral));
    }

    #[test]
    fn paying_exhausts_contributing_heroes_in_list_order() {
        let (mut state, p, first) = leadership_state(1);
        let second = state.add_card(Card::hero("Aragorn", Sphere::Leadership, 12, 2, 3, 2, 5));
        state.card_mut(second).as_hero_mut().unwrap().resources = 2;
        state.player_mut(p).heroes.push(second);

        let ally = state.add_card(Card::ally("Faramir", 2, Sphere::Leadership, 2, 1, 2, 3));
        state.player_mut(p).hand.push(ally);
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new();

        play_card(&mut state, &mut events, &mut choices, p, ally).unwrap();

        // First hero drained first, both contributors exhausted.
        assert_eq!(state.card(first).as_hero().unwrap().resources, 0);
        assert_eq!(state.card(second).as_hero().unwrap().resources, 1);
        assert!(state.card(first).character().exhausted);
        assert!(state.card(second).character().exhausted);
        assert_eq!(state.player(p).allies, vec![ally]);
        assert!(state.player(p).new_allies_this_round.contains(&ally));
    }

    #[test]
    fn unaffordable_play_changes_nothing() {
        let (mut state, p, hero) = leadership_state(1);
        let ally = state.add_card(Card::ally("Faramir", 4, Sphere::Leadership, 2, 1, 2, 3));
        state.player_mut(p).hand.push(ally);
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new();

        let err = play_card(&mut state, &mut events, &mut choices, p, ally).unwrap_err();
        assert!(matches!(err, IllegalAction::Unaffordable { .. }));
        assert_eq!(state.player(p).hand, vec![ally]);
        assert_eq!(state.card(hero).as_hero().unwrap().resources, 1);
        assert!(!state.card(hero).character().exhausted);
    }

    #[test]
    fn attachment_validates_target_before_paying() {
        // No characters in play and nothing in staging: refuse before
        // touching any resource pool.
        let mut state = GameState::new(vec![Player::new("gav")], 5);
        let p = PlayerId::new(0);
        let att = state.add_card(Card::attachment("Steward of Gondor", 2, Sphere::Leadership));
        state.player_mut(p).hand.push(att);
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new();

        let err = play_card(&mut state, &mut events, &mut choices, p, att).unwrap_err();
        assert!(matches!(err, IllegalAction::NoAttachTarget { .. }));
        assert_eq!(state.player(p).hand, vec![att]);
    }

    #[test]
    fn attachment_binds_to_chosen_host() {
        let (mut state, p, hero) = leadership_state(2);
        let att = state.add_card(Card::attachment("Steward of Gondor", 2, Sphere::Leadership));
        state.player_mut(p).hand.push(att);
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new().then_one(0);

        play_card(&mut state, &mut events, &mut choices, p, att).unwrap();

        assert_eq!(state.card(att).as_attachment().unwrap().attached_to, Some(hero));
        assert_eq!(state.card(hero).attachments.as_slice(), &[att]);
    }

    #[test]
    fn event_card_applies_then_discards() {
        let (mut state, p, _) = leadership_state(1);
        state.player_mut(p).set_threat(10);
        let ev = state.add_card(Card::event(
            "The Galadhrim's Greeting",
            1,
            Sphere::Leadership,
            Effect::ReduceThreat { amount: 6 },
        ));
        state.player_mut(p).hand.push(ev);
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new();

        play_card(&mut state, &mut events, &mut choices, p, ev).unwrap();
        assert_eq!(state.player(p).threat(), 4);
        assert_eq!(state.player(p).discard, vec![ev]);
    }

    #[test]
    fn heroes_are_not_playable_from_hand() {
        let (mut state, p, _) = leadership_state(5);
        let stray = state.add_card(Card::hero("Gandalf", Sphere::Neutral, 14, 3, 3, 3, 5));
        state.player_mut(p).hand.push(stray);
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new();

        let err = play_card(&mut state, &mut events, &mut choices, p, stray).unwrap_err();
        assert!(matches!(err, IllegalAction::NotPlayable { .. }));
    }

    #[test]
    fn planning_round_plays_until_pass() {
        let (mut state, p, _) = leadership_state(3);
        let a = state.add_card(Card::ally("Errand-rider", 1, Sphere::Leadership, 1, 0, 0, 1));
        let b = state.add_card(Card::ally("Faramir", 2, Sphere::Leadership, 2, 1, 2, 3));
        state.player_mut(p).hand.push(a);
        state.player_mut(p).hand.push(b);
        let mut events = EventDispatcher::new();
        // Play the first listed card, then pass.
        let mut choices = ScriptedChoices::new().then_one(0);

        planning_round(&mut state, &mut events, &mut choices);
        assert_eq!(state.player(p).allies, vec![a]);
        assert_eq!(state.player(p).hand, vec![b]);
    }
}
