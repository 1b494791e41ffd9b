//! The choice-provider capability.
//!
//! Resolution algorithms never decide for a player; whenever the rules need
//! a decision they ask a [`ChoiceProvider`]. The console UI, an AI, and the
//! scripted test double all sit behind this one trait. Calls are blocking
//! and synchronous; there is no timeout model.
//!
//! Illegal answers (out-of-range indices) are handled by re-asking, never by
//! propagating a fault: use the [`choose_one`] / [`choose_many`] /
//! [`choose_player`] wrappers rather than calling the trait directly.

use std::collections::VecDeque;

use crate::cards::CardId;
use crate::core::PlayerId;

/// One selectable option: a label for presentation plus the card it refers
/// to, if any. Decline-style options ("Pass", "No defender") carry no card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub card: Option<CardId>,
}

impl ChoiceOption {
    /// An option that refers to no card (pass, decline, yes/no).
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), card: None }
    }

    /// An option referring to a specific card.
    #[must_use]
    pub fn for_card(label: impl Into<String>, card: CardId) -> Self {
        Self { label: label.into(), card: Some(card) }
    }
}

/// External decision-maker: human prompt, AI, or test double.
pub trait ChoiceProvider {
    /// Pick exactly one option by index.
    fn choose_one(&mut self, prompt: &str, options: &[ChoiceOption]) -> usize;

    /// Pick any subset of options by index. Empty means "none chosen".
    fn choose_many(&mut self, prompt: &str, options: &[ChoiceOption]) -> Vec<usize>;

    /// Pick one player.
    fn choose_player(&mut self, players: &[PlayerId]) -> PlayerId;
}

/// Ask until the provider returns a valid index.
///
/// Panics if `options` is empty; callers must not pose empty questions.
pub fn choose_one(
    provider: &mut dyn ChoiceProvider,
    prompt: &str,
    options: &[ChoiceOption],
) -> usize {
    assert!(!options.is_empty(), "choose_one posed with no options");
    loop {
        let idx = provider.choose_one(prompt, options);
        if idx < options.len() {
            return idx;
        }
        tracing::debug!(idx, options = options.len(), "invalid choice, re-prompting");
    }
}

/// Ask for a subset; invalid indices are dropped, duplicates collapse.
///
/// An empty result means the player chose nothing.
pub fn choose_many(
    provider: &mut dyn ChoiceProvider,
    prompt: &str,
    options: &[ChoiceOption],
) -> Vec<usize> {
    let raw = provider.choose_many(prompt, options);
    let mut seen = vec![false; options.len()];
    let mut valid = Vec::new();
    for idx in raw {
        if idx < options.len() && !seen[idx] {
            seen[idx] = true;
            valid.push(idx);
        }
    }
    valid
}

/// Ask until the provider names a player from the given list.
pub fn choose_player(provider: &mut dyn ChoiceProvider, players: &[PlayerId]) -> PlayerId {
    assert!(!players.is_empty(), "choose_player posed with no players");
    loop {
        let picked = provider.choose_player(players);
        if players.contains(&picked) {
            return picked;
        }
        tracing::debug!(%picked, "invalid player choice, re-prompting");
    }
}

/// Queue-backed test double.
///
/// Answers are consumed front-to-back per question kind. When a queue runs
/// dry the double declines: last option for `choose_one` (engine convention
/// puts pass/decline last), empty selection for `choose_many`, first player
/// for `choose_player`.
#[derive(Debug, Default)]
pub struct ScriptedChoices {
    ones: VecDeque<usize>,
    manys: VecDeque<Vec<usize>>,
    players: VecDeque<PlayerId>,
}

impl ScriptedChoices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `choose_one` (builder pattern).
    #[must_use]
    pub fn then_one(mut self, idx: usize) -> Self {
        self.ones.push_back(idx);
        self
    }

    /// Queue an answer for the next `choose_many` (builder pattern).
    #[must_use]
    pub fn then_many(mut self, idxs: impl Into<Vec<usize>>) -> Self {
        self.manys.push_back(idxs.into());
        self
    }

    /// Queue an answer for the next `choose_player` (builder pattern).
    #[must_use]
    pub fn then_player(mut self, player: PlayerId) -> Self {
        self.players.push_back(player);
        self
    }
}

impl ChoiceProvider for ScriptedChoices {
    fn choose_one(&mut self, _prompt: &str, options: &[ChoiceOption]) -> usize {
        self.ones
            .pop_front()
            .unwrap_or_else(|| options.len().saturating_sub(1))
    }

    fn choose_many(&mut self, _prompt: &str, _options: &[ChoiceOption]) -> Vec<usize> {
        self.manys.pop_front().unwrap_or_default()
    }

    fn choose_player(&mut self, players: &[PlayerId]) -> PlayerId {
        self.players.pop_front().unwrap_or(players[0])
    }
}
