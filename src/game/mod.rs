//! Game setup and the round loop.
//!
//! The orchestrator owns the phase list: before round 1 every player draws
//! five cards, then rounds run all seven phases in order. Win and loss are
//! evaluated after every phase so the loop stops mid-round the moment a
//! terminal condition appears; loss is checked before win.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, CardKind};
use crate::choice::ChoiceProvider;
use crate::core::{GameState, Player, PlayerId};
use crate::events::EventDispatcher;
use crate::phases::Phase;

const OPENING_HAND: u32 = 5;

/// Why the game was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// The player's threat reached the limit.
    ThreatLimit,
    /// The player has no surviving heroes.
    HeroesLost,
}

/// Terminal result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The active quest reached its required progress.
    Won,
    Lost { player: PlayerId, reason: LossReason },
}

/// Per-seat setup: a name, starting heroes, and a deck (top of the deck is
/// the end of the vec; the builder shuffles).
pub struct PlayerSetup {
    pub name: String,
    pub heroes: Vec<Card>,
    pub deck: Vec<Card>,
}

impl PlayerSetup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heroes: Vec::new(),
            deck: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hero(mut self, hero: Card) -> Self {
        self.heroes.push(hero);
        self
    }

    #[must_use]
    pub fn with_deck_card(mut self, card: Card) -> Self {
        self.deck.push(card);
        self
    }
}

/// Builds a ready-to-run [`Game`].
///
/// Heroes enter play directly, bypassing Planning-phase cost checks, and
/// each player's starting threat is the sum of their hero threat-costs.
pub struct GameBuilder {
    seed: u64,
    players: Vec<PlayerSetup>,
    quest: Option<Card>,
    encounter_deck: Vec<Card>,
}

impl GameBuilder {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            players: Vec::new(),
            quest: None,
            encounter_deck: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_player(mut self, setup: PlayerSetup) -> Self {
        self.players.push(setup);
        self
    }

    #[must_use]
    pub fn with_quest(mut self, quest: Card) -> Self {
        self.quest = Some(quest);
        self
    }

    #[must_use]
    pub fn with_encounter_card(mut self, card: Card) -> Self {
        self.encounter_deck.push(card);
        self
    }

    /// Assemble the game: register every card, seat the players, shuffle
    /// the decks, and activate the quest.
    ///
    /// # Panics
    ///
    /// Panics if no players or no quest were configured.
    #[must_use]
    pub fn build(self) -> Game {
        assert!(!self.players.is_empty(), "a game needs at least one player");
        let quest_card = self.quest.expect("a game needs a quest");

        let players: Vec<Player> = self.players.iter().map(|s| Player::new(&s.name)).collect();
        let mut state = GameState::new(players, self.seed);

        for (i, setup) in self.players.into_iter().enumerate() {
            let player = PlayerId::new(i as u8);
            let mut starting_threat = 0;
            for hero in setup.heroes {
                let threat_cost = hero.as_hero().map_or(0, |h| h.threat_cost);
                starting_threat += threat_cost;
                let id = state.add_card(hero);
                state.player_mut(player).heroes.push(id);
            }
            state.player_mut(player).set_threat(starting_threat);

            let mut deck: Vec<CardId> =
                setup.deck.into_iter().map(|c| state.add_card(c)).collect();
            state.rng.shuffle(&mut deck);
            state.player_mut(player).deck = deck;
        }

        let quest = state.add_card(quest_card);
        if let CardKind::Quest(q) = &mut state.card_mut(quest).kind {
            q.active = true;
        }
        state.active_quest = Some(quest);

        let mut encounter: Vec<CardId> = self
            .encounter_deck
            .into_iter()
            .map(|c| state.add_card(c))
            .collect();
        state.rng.shuffle(&mut encounter);
        state.encounter_deck = encounter;

        Game {
            state,
            events: EventDispatcher::new(),
            opening_drawn: false,
        }
    }
}

/// A running game: the state plus the hook registry.
pub struct Game {
    pub state: GameState,
    pub events: EventDispatcher,
    opening_drawn: bool,
}

impl Game {
    /// Each player draws their opening hand. Happens once per game;
    /// repeated calls are no-ops.
    pub fn opening_draw(&mut self, choices: &mut dyn ChoiceProvider) {
        if self.opening_drawn {
            return;
        }
        self.opening_drawn = true;
        for player in self.state.player_ids() {
            crate::rules::draw::draw_cards(
                &mut self.state,
                &mut self.events,
                choices,
                player,
                OPENING_HAND,
            );
        }
    }

    /// The current terminal condition, if any. Loss is checked before win,
    /// so a simultaneous threshold cross reports as a loss.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        for player in self.state.player_ids() {
            if self.state.player(player).threat_maxed() {
                return Some(GameOutcome::Lost {
                    player,
                    reason: LossReason::ThreatLimit,
                });
            }
            if self.state.player(player).heroes.is_empty() {
                return Some(GameOutcome::Lost {
                    player,
                    reason: LossReason::HeroesLost,
                });
            }
        }
        let quest = self.state.active_quest?;
        let q = self.state.card(quest).as_quest()?;
        if q.progress >= q.required_progress {
            return Some(GameOutcome::Won);
        }
        None
    }

    /// Run one round, stopping after the first phase that produces a
    /// terminal condition.
    pub fn play_round(&mut self, choices: &mut dyn ChoiceProvider) -> Option<GameOutcome> {
        for phase in Phase::ALL {
            phase.run(&mut self.state, &mut self.events, choices);
            if let Some(outcome) = self.outcome() {
                tracing::info!(?outcome, phase = %phase, "game over");
                return Some(outcome);
            }
        }
        None
    }

    /// Run rounds until the game ends, drawing opening hands first.
    pub fn run(&mut self, choices: &mut dyn ChoiceProvider) -> GameOutcome {
        self.opening_draw(choices);
        if let Some(outcome) = self.outcome() {
            return outcome;
        }
        loop {
            if let Some(outcome) = self.play_round(choices) {
                return outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Sphere;
    use crate::choice::ScriptedChoices;

    fn minimal_game() -> Game {
        GameBuilder::new(17)
            .with_player(
                PlayerSetup::new("gav")
                    .with_hero(Card::hero("Boromir", Sphere::Leadership, 11, 1, 3, 2, 5))
                    .with_deck_card(Card::ally("Squire", 1, Sphere::Leadership, 0, 1, 1, 1)),
            )
            .with_quest(Card::quest("Flight from Moria", 10))
            .build()
    }

    #[test]
    fn builder_seats_heroes_and_derives_threat() {
        let game = minimal_game();
        let p = PlayerId::new(0);
        assert_eq!(game.state.player(p).heroes.len(), 1);
        assert_eq!(game.state.player(p).threat(), 11);
        assert_eq!(game.state.player(p).deck.len(), 1);
        assert!(game.state.active_quest.is_some());
    }

    #[test]
    fn loss_reported_before_win() {
        let mut game = minimal_game();
        let p = PlayerId::new(0);
        game.state.player_mut(p).set_threat(50);
        let quest = game.state.active_quest.unwrap();
        game.state.card_mut(quest).as_quest_mut().unwrap().progress = 10;

        assert_eq!(
            game.outcome(),
            Some(GameOutcome::Lost {
                player: p,
                reason: LossReason::ThreatLimit
            })
        );
    }

    #[test]
    fn quest_completion_wins() {
        let mut game = minimal_game();
        let quest = game.state.active_quest.unwrap();
        game.state.card_mut(quest).as_quest_mut().unwrap().progress = 10;

        assert_eq!(game.outcome(), Some(GameOutcome::Won));
    }

    #[test]
    fn losing_all_heroes_loses() {
        let mut game = minimal_game();
        let p = PlayerId::new(0);
        let hero = game.state.player(p).heroes[0];
        game.state.player_mut(p).remove_from_play(hero);

        assert_eq!(
            game.outcome(),
            Some(GameOutcome::Lost {
                player: p,
                reason: LossReason::HeroesLost
            })
        );
    }

    #[test]
    fn opening_draw_is_five_cards() {
        let mut builder = PlayerSetup::new("gav")
            .with_hero(Card::hero("Boromir", Sphere::Leadership, 11, 1, 3, 2, 5));
        for i in 0..8 {
            builder = builder.with_deck_card(Card::ally(
                format!("Ally {i}"),
                1,
                Sphere::Leadership,
                1,
                0,
                0,
                1,
            ));
        }
        let mut game = GameBuilder::new(17)
            .with_player(builder)
            .with_quest(Card::quest("Journey", 10))
            .build();

        let mut choices = ScriptedChoices::new();
        game.opening_draw(&mut choices);
        let p = PlayerId::new(0);
        assert_eq!(game.state.player(p).hand.len(), 5);
        assert_eq!(game.state.player(p).deck.len(), 3);
    }
}
