//! Player identity and per-player zones.
//!
//! A [`Player`] owns the zones that belong to one seat at the table: deck,
//! hand, discard pile, the play area (split into heroes and allies), and the
//! set of enemies currently engaged with them. Cards themselves live in the
//! central arena on `GameState`; zones hold [`CardId`]s only.
//!
//! Threat is the cooperative game's clock. It starts at the sum of the
//! player's hero threat-costs, rises on quest shortfalls and at the end of
//! every round, and reaching [`THREAT_LIMIT`] loses the game for everyone.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// A player's threat reaching this value is an immediate loss.
pub const THREAT_LIMIT: i64 = 50;

/// Player identifier. Indices are 0-based in seating order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One seat at the table: identity, threat, and owned zones.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Display name.
    pub name: String,

    /// Current threat. Clamped to `>= 0`; see [`THREAT_LIMIT`].
    threat: i64,

    /// Ordered deck. The draw position is the end of the vec.
    pub deck: Vec<CardId>,

    /// Hand of cards. Order is not significant.
    pub hand: Vec<CardId>,

    /// Discard pile.
    pub discard: Vec<CardId>,

    /// Heroes in the play area.
    pub heroes: Vec<CardId>,

    /// Allies in the play area.
    pub allies: Vec<CardId>,

    /// Enemies currently engaged with this player.
    pub engaged: Vec<CardId>,

    /// Allies that entered play this round. Cleared during Refresh.
    pub new_allies_this_round: FxHashSet<CardId>,
}

impl Player {
    /// Create a player with empty zones and zero threat.
    ///
    /// Initial threat is derived from hero threat-costs once heroes enter
    /// play; see `GameBuilder`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threat: 0,
            deck: Vec::new(),
            hand: Vec::new(),
            discard: Vec::new(),
            heroes: Vec::new(),
            allies: Vec::new(),
            engaged: Vec::new(),
            new_allies_this_round: FxHashSet::default(),
        }
    }

    /// Current threat level.
    #[must_use]
    pub fn threat(&self) -> i64 {
        self.threat
    }

    /// Set threat directly, clamped to `>= 0`.
    pub fn set_threat(&mut self, value: i64) {
        self.threat = value.max(0);
    }

    /// Raise threat by `amount`.
    pub fn raise_threat(&mut self, amount: i64) {
        self.set_threat(self.threat + amount);
    }

    /// Lower threat by `amount`, clamped to `>= 0`.
    pub fn reduce_threat(&mut self, amount: i64) {
        self.set_threat(self.threat - amount);
    }

    /// Has this player hit the loss threshold?
    #[must_use]
    pub fn threat_maxed(&self) -> bool {
        self.threat >= THREAT_LIMIT
    }

    /// All characters (heroes then allies) in this player's play area.
    pub fn characters(&self) -> impl Iterator<Item = CardId> + '_ {
        self.heroes.iter().chain(self.allies.iter()).copied()
    }

    /// Remove a card from the hand. Returns false if it wasn't there.
    pub fn remove_from_hand(&mut self, card: CardId) -> bool {
        if let Some(pos) = self.hand.iter().position(|&c| c == card) {
            self.hand.remove(pos);
            true
        } else {
            false
        }
    }

    /// Remove a character from whichever play-area zone holds it.
    ///
    /// Returns false if the card was in neither zone.
    pub fn remove_from_play(&mut self, card: CardId) -> bool {
        if let Some(pos) = self.heroes.iter().position(|&c| c == card) {
            self.heroes.remove(pos);
            return true;
        }
        if let Some(pos) = self.allies.iter().position(|&c| c == card) {
            self.allies.remove(pos);
            return true;
        }
        false
    }

    /// Remove an enemy from the engaged set. Returns false if absent.
    pub fn disengage(&mut self, enemy: CardId) -> bool {
        if let Some(pos) = self.engaged.iter().position(|&c| c == enemy) {
            self.engaged.remove(pos);
            true
        } else {
            false
        }
    }

    /// Move the discard pile back into the deck. Caller shuffles.
    pub fn return_discard_to_deck(&mut self) {
        self.deck.append(&mut self.discard);
    }
}
