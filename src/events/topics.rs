//! Recognized event topics.
//!
//! Topics are opaque strings; the dispatcher never interprets them. The
//! constants here name every topic the engine itself publishes, with the
//! context fields each one carries. The set is extensible; card behavior
//! modules may publish and subscribe to topics of their own.
//!
//! Phase bracket topics (`ResourcePhaseStart`, `ResourcePhaseEnd`, ...) are
//! derived from the phase and are not listed individually; see
//! `Phase::start_topic` / `Phase::end_topic`.

/// Before a player draws a card. Fields: `player`.
pub const BEFORE_DRAW_CARD: &str = "BeforeDrawCard";

/// After a player draws a card. Fields: `player`, `card`.
pub const AFTER_DRAW_CARD: &str = "AfterDrawCard";

/// Before a discard pile is reshuffled into an empty deck. Fields: `player`.
pub const BEFORE_RESHUFFLE_DISCARD: &str = "BeforeReshuffleDiscard";

/// After a discard pile is reshuffled into the deck. Fields: `player`.
pub const AFTER_RESHUFFLE_DISCARD: &str = "AfterReshuffleDiscard";

/// Before any card is played from hand. Fields: `card`, `player`.
pub const BEFORE_ANY_CARD_PLAYED: &str = "BeforeAnyCardPlayed";

/// After a card has been played and placed. Fields: `card`, `player`.
pub const AFTER_CARD_PLAYED: &str = "AfterCardPlayed";

/// After an ally enters play from hand. Fields: `ally`, `player`.
pub const AFTER_ALLY_PLAYED: &str = "AfterAllyPlayed";

/// A hero exhausted while paying a cost. Fields: `card`, `player`.
pub const AFTER_EXHAUSTED: &str = "AfterExhausted";

/// Open action window at the end of each player's planning.
/// Fields: `player`.
pub const PLAYER_ACTIONS: &str = "PlayerActions";

/// A committed character is about to exhaust for questing. Mutable field:
/// `prevent_exhaustion` (0/1). Fields: `character`, `player`.
pub const BEFORE_QUEST_EXHAUSTION: &str = "BeforeQuestExhaustion";

/// Before an enemy leaves staging to engage. Fields: `enemy`, `player`.
pub const BEFORE_ENEMY_ENGAGEMENT: &str = "BeforeEnemyEngagement";

/// After an enemy engages a player. Fields: `enemy`, `player`.
pub const AFTER_ENEMY_ENGAGEMENT: &str = "AfterEnemyEngagement";

/// An encounter card has been revealed into staging. Fields: `card`.
pub const ENCOUNTER_CARD_REVEALED: &str = "EncounterCardRevealed";

/// A location became the active location. Fields: `location`, `player`.
pub const LOCATION_TRAVELED: &str = "LocationTraveled";

/// A location was fully explored. Fields: `location`.
pub const LOCATION_EXPLORED: &str = "LocationExplored";

/// An engaged enemy is about to attack. Fields: `enemy`, `player`.
pub const BEFORE_ENEMY_ATTACK: &str = "BeforeEnemyAttack";

/// A shadow card was revealed for an enemy attack.
/// Fields: `enemy`; `shadow_card` when one was available.
pub const SHADOW_CARD_REVEALED: &str = "ShadowCardRevealed";

/// A defender was declared against an enemy attack.
/// Fields: `enemy`, `defender`, `player`.
pub const AFTER_DEFENDER_DECLARED: &str = "AfterDefenderDeclared";

/// An enemy attack (with a declared defender) finished resolving.
/// Fields: `enemy`, `defender`, `player`. Not published for undefended
/// attacks.
pub const AFTER_ENEMY_ATTACK: &str = "AfterEnemyAttack";

/// An attacker's strength is being computed. Mutable field:
/// `modified_attack`. Fields: `attacker`, `base_attack`, `enemy`, `player`.
pub const CALCULATE_ATTACK: &str = "CalculateAttack";

/// An enemy's hit points reached zero. Fields: `enemy`; `player` when
/// defeated while engaged.
pub const ENEMY_DEFEATED: &str = "EnemyDefeated";

/// A hero or ally was defeated. Fields: `character`, `player`.
pub const CHARACTER_DEFEATED: &str = "CharacterDefeated";
