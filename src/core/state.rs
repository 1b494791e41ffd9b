use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, CardKind};
use crate::core::rng::GameRng;
use crate::core::{Player, PlayerId};
use crate::phases::Phase;

/// Full game state: the card arena, every player, and the shared encounter
/// zones. Zones store [`CardId`]s only; the arena owns every [`Card`].
#[derive(Debug, Serialize, Deserialize)]
pub struct GameState {
    cards: FxHashMap<CardId, Card>,
    next_card_id: u32,
    players: Vec<Player>,
    active_player: PlayerId,
    pub encounter_deck: Vec<CardId>,
    pub encounter_discard: Vec<CardId>,
    pub staging: Vec<CardId>,
    pub victory_display: Vec<CardId>,
    pub active_location: Option<CardId>,
    pub active_quest: Option<CardId>,
    pub round_number: u32,
    pub current_phase: Option<Phase>,
    pub rng: GameRng,
}

impl GameState {
    /// Creates a state for the given players. `seed` fixes every shuffle and
    /// random choice, so two games with the same seed and the same script of
    /// decisions play out identically.
    ///
    /// # Panics
    ///
    /// Panics if `players` is empty.
    #[must_use]
    pub fn new(players: Vec<Player>, seed: u64) -> Self {
        assert!(!players.is_empty(), "a game needs at least one player");
        GameState {
            cards: FxHashMap::default(),
            next_card_id: 0,
            players,
            active_player: PlayerId(0),
            encounter_deck: Vec::new(),
            encounter_discard: Vec::new(),
            staging: Vec::new(),
            victory_display: Vec::new(),
            active_location: None,
            active_quest: None,
            round_number: 0,
            current_phase: None,
            rng: GameRng::new(seed),
        }
    }

    /// Registers a card in the arena, assigning it a fresh id.
    pub fn add_card(&mut self, mut card: Card) -> CardId {
        let id = CardId(self.next_card_id);
        self.next_card_id += 1;
        card.id = id;
        self.cards.insert(id, card);
        id
    }

    /// # Panics
    ///
    /// Panics if `id` was never registered.
    #[must_use]
    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[&id]
    }

    /// # Panics
    ///
    /// Panics if `id` was never registered.
    #[must_use]
    pub fn card_mut(&mut self, id: CardId) -> &mut Card {
        self.cards.get_mut(&id).expect("unknown card id")
    }

    #[must_use]
    pub fn try_card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player_ids(&self) -> Vec<PlayerId> {
        (0..self.players.len()).map(|i| PlayerId(i as u8)).collect()
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    /// Player ids starting from the active player, wrapping around.
    #[must_use]
    pub fn players_in_turn_order(&self) -> Vec<PlayerId> {
        let n = self.players.len();
        let start = self.active_player.index();
        (0..n).map(|i| PlayerId(((start + i) % n) as u8)).collect()
    }

    /// Passes the first-player token clockwise.
    pub fn rotate_active_player(&mut self) {
        let n = self.players.len() as u8;
        self.active_player = PlayerId((self.active_player.0 + 1) % n);
    }

    /// The player whose zones contain `id`, if any. Encounter-side cards
    /// have no owner; an engaged enemy's "owner" is the engaged player.
    #[must_use]
    pub fn owner_of(&self, id: CardId) -> Option<PlayerId> {
        for (i, player) in self.players.iter().enumerate() {
            let held = player.deck.contains(&id)
                || player.hand.contains(&id)
                || player.discard.contains(&id)
                || player.heroes.contains(&id)
                || player.allies.contains(&id)
                || player.engaged.contains(&id);
            if held {
                return Some(PlayerId(i as u8));
            }
        }
        None
    }

    /// Pops the top encounter card, reshuffling the encounter discard when
    /// the deck is empty. Returns `None` only when both piles are empty.
    pub fn draw_encounter_card(&mut self) -> Option<CardId> {
        if self.encounter_deck.is_empty() && !self.encounter_discard.is_empty() {
            self.encounter_deck.append(&mut self.encounter_discard);
            self.rng.shuffle(&mut self.encounter_deck);
        }
        self.encounter_deck.pop()
    }

    /// Every id in staging that contributes threat during quest resolution:
    /// enemies and unexplored locations still in staging.
    #[must_use]
    pub fn staging_threat(&self) -> i64 {
        let mut total: i64 = self.staging.iter().map(|id| self.card(*id).staging_threat()).sum();
        if let Some(loc) = self.active_location {
            if let CardKind::Location(l) = &self.card(loc).kind {
                if !l.explored {
                    total += l.threat;
                }
            }
        }
        total
    }
}
