//! Mutable event context.
//!
//! Every published event carries an [`EventContext`]: a key/value map that
//! hook handlers may mutate in place. This is the mechanism by which card
//! behaviors alter generic outcomes: combat writes `base_attack` and
//! `modified_attack`, a hook adds to `modified_attack`, and combat reads the
//! result back.
//!
//! ## Values are i64 only
//!
//! Like per-card flags, context values are `i64`:
//! - Booleans: 0/1 (`set_bool` / `bool_value`)
//! - Card references: `CardId.0` (`set_card` / `card`)
//! - Player references: `PlayerId.0` (`set_player` / `player`)
//!
//! The field names a topic recognizes are documented on
//! [`topics`](super::topics).

use rustc_hash::FxHashMap;

use crate::cards::CardId;
use crate::core::PlayerId;

/// Mutable key/value payload passed to every hook for a published topic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventContext {
    values: FxHashMap<String, i64>,
}

impl EventContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value with a default.
    #[must_use]
    pub fn value(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    /// Set a value.
    pub fn set(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), value);
    }

    /// Add `delta` to a value (missing keys count as 0).
    pub fn modify(&mut self, key: &str, delta: i64) {
        let current = self.value(key, 0);
        self.values.insert(key.to_string(), current + delta);
    }

    /// Is a flag set (non-zero)?
    #[must_use]
    pub fn bool_value(&self, key: &str) -> bool {
        self.value(key, 0) != 0
    }

    /// Set a boolean flag.
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, i64::from(value));
    }

    /// Get a card reference, if the key is present.
    #[must_use]
    pub fn card(&self, key: &str) -> Option<CardId> {
        self.values.get(key).map(|&v| CardId(v as u32))
    }

    /// Set a card reference.
    pub fn set_card(&mut self, key: impl Into<String>, card: CardId) {
        self.set(key, i64::from(card.0));
    }

    /// Get a player reference, if the key is present.
    #[must_use]
    pub fn player(&self, key: &str) -> Option<PlayerId> {
        self.values.get(key).map(|&v| PlayerId(v as u8))
    }

    /// Set a player reference.
    pub fn set_player(&mut self, key: impl Into<String>, player: PlayerId) {
        self.set(key, i64::from(player.0));
    }

    // === Builder helpers for publish sites ===

    /// Set a value (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: i64) -> Self {
        self.set(key, value);
        self
    }

    /// Set a card reference (builder pattern).
    #[must_use]
    pub fn with_card(mut self, key: impl Into<String>, card: CardId) -> Self {
        self.set_card(key, card);
        self
    }

    /// Set a player reference (builder pattern).
    #[must_use]
    pub fn with_player(mut self, key: impl Into<String>, player: PlayerId) -> Self {
        self.set_player(key, player);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_and_defaults() {
        let mut ctx = EventContext::new();
        assert_eq!(ctx.value("modified_attack", 0), 0);

        ctx.set("modified_attack", 2);
        ctx.modify("modified_attack", 1);
        assert_eq!(ctx.value("modified_attack", 0), 3);
    }

    #[test]
    fn test_bool_round_trip() {
        let mut ctx = EventContext::new();
        assert!(!ctx.bool_value("prevent_exhaustion"));

        ctx.set_bool("prevent_exhaustion", true);
        assert!(ctx.bool_value("prevent_exhaustion"));
    }

    #[test]
    fn test_card_and_player_references() {
        let ctx = EventContext::new()
            .with_card("attacker", CardId(10))
            .with_player("player", PlayerId::new(1));

        assert_eq!(ctx.card("attacker"), Some(CardId(10)));
        assert_eq!(ctx.player("player"), Some(PlayerId::new(1)));
        assert_eq!(ctx.card("defender"), None);
    }
}
