//! Card drawing and deck reshuffling.

use crate::choice::ChoiceProvider;
use crate::core::{GameState, PlayerId, THREAT_LIMIT};
use crate::events::{topics, EventContext, EventDispatcher};

/// Draw `count` cards for `player`, reshuffling the discard pile into the
/// deck whenever the deck runs dry.
///
/// A required draw with both deck and discard empty is a loss: the player's
/// threat is forced to [`THREAT_LIMIT`] and no card is added to hand.
/// Repeating the draw changes nothing further. Returns the number of cards
/// actually drawn.
pub fn draw_cards(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    player: PlayerId,
    count: u32,
) -> u32 {
    let mut drawn = 0;
    for _ in 0..count {
        let mut before = EventContext::new().with_player("player", player);
        events.publish(topics::BEFORE_DRAW_CARD, &mut before, state, choices);

        if state.player(player).deck.is_empty() && !state.player(player).discard.is_empty() {
            reshuffle_discard(state, events, choices, player);
        }

        let Some(card) = state.player_mut(player).deck.pop() else {
            tracing::info!(%player, "deck and discard empty on a required draw");
            state.player_mut(player).set_threat(THREAT_LIMIT);
            break;
        };
        state.player_mut(player).hand.push(card);
        drawn += 1;

        let mut after = EventContext::new()
            .with_player("player", player)
            .with_card("card", card);
        events.publish(topics::AFTER_DRAW_CARD, &mut after, state, choices);
    }
    drawn
}

/// Shuffle `player`'s discard pile back into their deck.
pub fn reshuffle_discard(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    player: PlayerId,
) {
    let mut ctx = EventContext::new().with_player("player", player);
    events.publish(topics::BEFORE_RESHUFFLE_DISCARD, &mut ctx, state, choices);

    state.player_mut(player).return_discard_to_deck();
    let mut deck = std::mem::take(&mut state.player_mut(player).deck);
    state.rng.shuffle(&mut deck);
    state.player_mut(player).deck = deck;
    tracing::debug!(%player, "reshuffled discard into deck");

    let mut ctx = EventContext::new().with_player("player", player);
    events.publish(topics::AFTER_RESHUFFLE_DISCARD, &mut ctx, state, choices);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Sphere};
    use crate::choice::ScriptedChoices;
    use crate::core::Player;

    fn state_with_cards(deck: usize, discard: usize) -> (GameState, PlayerId) {
        let mut state = GameState::new(vec![Player::new("gav")], 3);
        let p = PlayerId::new(0);
        for i in 0..deck {
            let id = state.add_card(Card::ally(format!("deck {i}"), 1, Sphere::Lore, 1, 0, 0, 1));
            state.player_mut(p).deck.push(id);
        }
        for i in 0..discard {
            let id = state.add_card(Card::ally(format!("pile {i}"), 1, Sphere::Lore, 1, 0, 0, 1));
            state.player_mut(p).discard.push(id);
        }
        (state, p)
    }

    #[test]
    fn draws_from_the_end_of_the_deck() {
        let (mut state, p) = state_with_cards(3, 0);
        let top = *state.player(p).deck.last().unwrap();
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new();

        assert_eq!(draw_cards(&mut state, &mut events, &mut choices, p, 1), 1);
        assert_eq!(state.player(p).hand, vec![top]);
        assert_eq!(state.player(p).deck.len(), 2);
    }

    #[test]
    fn empty_deck_reshuffles_discard() {
        let (mut state, p) = state_with_cards(0, 4);
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new();

        assert_eq!(draw_cards(&mut state, &mut events, &mut choices, p, 2), 2);
        assert_eq!(state.player(p).hand.len(), 2);
        assert_eq!(state.player(p).deck.len(), 2);
        assert!(state.player(p).discard.is_empty());
    }

    #[test]
    fn both_piles_empty_is_a_loss_and_idempotent() {
        let (mut state, p) = state_with_cards(0, 0);
        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new();

        assert_eq!(draw_cards(&mut state, &mut events, &mut choices, p, 1), 0);
        assert_eq!(state.player(p).threat(), THREAT_LIMIT);
        assert!(state.player(p).hand.is_empty());

        // Drawing again never changes hand size or threat further.
        assert_eq!(draw_cards(&mut state, &mut events, &mut choices, p, 3), 0);
        assert_eq!(state.player(p).threat(), THREAT_LIMIT);
        assert!(state.player(p).hand.is_empty());
    }

    #[test]
    fn draw_events_fire_per_card() {
        let (mut state, p) = state_with_cards(2, 0);
        let mut events = EventDispatcher::new();
        events.register(crate::events::Hook::new(topics::AFTER_DRAW_CARD, |state, _, ctx, _| {
            let drawn = ctx.card("card").unwrap();
            // Track draws on the card itself.
            state.card_mut(drawn).set_flag("seen", 1);
        }));
        let mut choices = ScriptedChoices::new();

        draw_cards(&mut state, &mut events, &mut choices, p, 2);
        for &id in &state.player(p).hand {
            assert_eq!(state.card(id).get_flag("seen", 0), 1);
        }
    }
}
