//! Card data model.
//!
//! Every card in a game is a [`Card`]: shared fields (title, cost, sphere,
//! keywords, attachments, per-card counters) plus a [`CardKind`] tagged union
//! carrying only the attributes that kind needs. Code that cares what a card
//! is matches on the kind or uses the typed accessors; there are no
//! downcasts scattered through the rules.
//!
//! Cards are identified by [`CardId`] and live in the central arena on
//! `GameState`. Zones everywhere hold ids, never cards.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::character::Character;
use crate::core::PlayerId;
use crate::effects::{Effect, ShadowEffect};

/// Unique identifier for a card instance in a game.
///
/// Assigned by `GameState::add_card`; id 0 is the unassigned placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A card's resource sphere. Costs are paid from matching-sphere pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sphere {
    Leadership,
    Tactics,
    Spirit,
    Lore,
    /// Neutral cards and encounter-side cards have no sphere of their own.
    Neutral,
}

impl std::fmt::Display for Sphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Sphere::Leadership => "Leadership",
            Sphere::Tactics => "Tactics",
            Sphere::Spirit => "Spirit",
            Sphere::Lore => "Lore",
            Sphere::Neutral => "Neutral",
        };
        f.write_str(name)
    }
}

/// Hero-specific data: a character that carries a resource pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub stats: Character,

    /// Contribution to the owner's starting threat.
    pub threat_cost: i64,

    /// Resource pool of the hero's own sphere. Pools are per-hero, never
    /// shared; collection never exhausts, spending does.
    pub resources: i64,
}

/// Ally-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ally {
    pub stats: Character,
}

/// Enemy-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// A player whose threat reaches this value must engage the enemy.
    pub engagement: i64,

    /// Threat contributed to the staging area while unengaged.
    pub threat: i64,

    pub attack: i64,
    pub defense: i64,
    pub hit_points: i64,

    /// Set while engaged; `None` in staging or after defeat.
    pub engaged_with: Option<PlayerId>,
}

/// Location-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Threat contributed to staging (or to questing while active).
    pub threat: i64,

    /// Progress required to explore this location.
    pub quest_points: i64,

    /// Accumulated progress. Reset to 0 when traveled to.
    pub progress: i64,

    /// Moved to the victory display on exploration when > 0.
    pub victory_points: i64,

    pub explored: bool,
}

/// Attachment-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Back-reference to the host. At most one, and never re-attached.
    pub attached_to: Option<CardId>,
}

/// Event-card data: a one-shot effect, then the card is discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCard {
    pub effect: Effect,
}

/// Quest-card data. Exactly one quest is active at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub required_progress: i64,
    pub progress: i64,
    pub active: bool,
}

/// The tagged union of card kinds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Hero(Hero),
    Ally(Ally),
    Enemy(Enemy),
    Location(Location),
    Attachment(Attachment),
    Event(EventCard),
    Quest(Quest),
}

impl CardKind {
    /// Kind name for logs and prompts.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CardKind::Hero(_) => "Hero",
            CardKind::Ally(_) => "Ally",
            CardKind::Enemy(_) => "Enemy",
            CardKind::Location(_) => "Location",
            CardKind::Attachment(_) => "Attachment",
            CardKind::Event(_) => "Event",
            CardKind::Quest(_) => "Quest",
        }
    }
}

/// A card instance: shared fields plus kind-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Arena id. 0 until registered with `GameState::add_card`.
    pub id: CardId,

    pub title: String,
    pub description: String,

    /// Cost paid from matching-sphere hero pools. 0 for encounter cards.
    pub cost: i64,

    pub sphere: Sphere,

    /// Trait keywords ("Gondor", "Orc", ...). Hooks filter on these.
    pub keywords: SmallVec<[String; 4]>,

    /// Ids of attachments hosted by this card.
    pub attachments: SmallVec<[CardId; 2]>,

    /// One-shot modifier applied when this card is revealed as a shadow card.
    pub shadow: Option<ShadowEffect>,

    /// Per-card counters and flags (tokens, once-per-round markers).
    /// Booleans are stored as 0/1.
    #[serde(default)]
    pub flags: FxHashMap<String, i64>,

    pub kind: CardKind,
}

impl Card {
    fn base(title: impl Into<String>, cost: i64, sphere: Sphere, kind: CardKind) -> Self {
        Self {
            id: CardId(0),
            title: title.into(),
            description: String::new(),
            cost,
            sphere,
            keywords: SmallVec::new(),
            attachments: SmallVec::new(),
            shadow: None,
            flags: FxHashMap::default(),
            kind,
        }
    }

    /// Create a hero card. Heroes are free; they buy in with threat-cost.
    #[must_use]
    pub fn hero(
        title: impl Into<String>,
        sphere: Sphere,
        threat_cost: i64,
        willpower: i64,
        attack: i64,
        defense: i64,
        hit_points: i64,
    ) -> Self {
        Self::base(
            title,
            0,
            sphere,
            CardKind::Hero(Hero {
                stats: Character::new(willpower, attack, defense, hit_points),
                threat_cost,
                resources: 0,
            }),
        )
    }

    /// Create an ally card.
    #[must_use]
    pub fn ally(
        title: impl Into<String>,
        cost: i64,
        sphere: Sphere,
        willpower: i64,
        attack: i64,
        defense: i64,
        hit_points: i64,
    ) -> Self {
        Self::base(
            title,
            cost,
            sphere,
            CardKind::Ally(Ally {
                stats: Character::new(willpower, attack, defense, hit_points),
            }),
        )
    }

    /// Create an enemy card.
    #[must_use]
    pub fn enemy(
        title: impl Into<String>,
        engagement: i64,
        threat: i64,
        attack: i64,
        defense: i64,
        hit_points: i64,
    ) -> Self {
        Self::base(
            title,
            0,
            Sphere::Neutral,
            CardKind::Enemy(Enemy {
                engagement,
                threat,
                attack,
                defense,
                hit_points,
                engaged_with: None,
            }),
        )
    }

    /// Create a location card.
    #[must_use]
    pub fn location(
        title: impl Into<String>,
        threat: i64,
        quest_points: i64,
        victory_points: i64,
    ) -> Self {
        Self::base(
            title,
            0,
            Sphere::Neutral,
            CardKind::Location(Location {
                threat,
                quest_points,
                progress: 0,
                victory_points,
                explored: false,
            }),
        )
    }

    /// Create an attachment card.
    #[must_use]
    pub fn attachment(title: impl Into<String>, cost: i64, sphere: Sphere) -> Self {
        Self::base(
            title,
            cost,
            sphere,
            CardKind::Attachment(Attachment { attached_to: None }),
        )
    }

    /// Create an event card.
    #[must_use]
    pub fn event(title: impl Into<String>, cost: i64, sphere: Sphere, effect: Effect) -> Self {
        Self::base(title, cost, sphere, CardKind::Event(EventCard { effect }))
    }

    /// Create a quest card.
    #[must_use]
    pub fn quest(title: impl Into<String>, required_progress: i64) -> Self {
        Self::base(
            title,
            0,
            Sphere::Neutral,
            CardKind::Quest(Quest {
                required_progress,
                progress: 0,
                active: false,
            }),
        )
    }

    // === Builder helpers ===

    /// Add a trait keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set a shadow effect (builder pattern).
    #[must_use]
    pub fn with_shadow(mut self, shadow: ShadowEffect) -> Self {
        self.shadow = Some(shadow);
        self
    }

    // === Keyword and flag helpers ===

    /// Does this card carry the given keyword?
    #[must_use]
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Get a counter/flag value with a default.
    #[must_use]
    pub fn get_flag(&self, key: &str, default: i64) -> i64 {
        self.flags.get(key).copied().unwrap_or(default)
    }

    /// Set a counter/flag value.
    pub fn set_flag(&mut self, key: impl Into<String>, value: i64) {
        self.flags.insert(key.into(), value);
    }

    // === Typed accessors ===
    //
    // The panicking accessors are for call sites where the kind is an
    // invariant (an id pulled from `player.engaged` must be an Enemy);
    // a mismatch is a programmer error and fails fast.

    /// View as a character stat block (hero or ally).
    #[must_use]
    pub fn as_character(&self) -> Option<&Character> {
        match &self.kind {
            CardKind::Hero(h) => Some(&h.stats),
            CardKind::Ally(a) => Some(&a.stats),
            _ => None,
        }
    }

    /// Mutable character stat block (hero or ally).
    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match &mut self.kind {
            CardKind::Hero(h) => Some(&mut h.stats),
            CardKind::Ally(a) => Some(&mut a.stats),
            _ => None,
        }
    }

    /// Character view, panicking on a non-character card.
    #[must_use]
    pub fn character(&self) -> &Character {
        self.as_character()
            .unwrap_or_else(|| panic!("{} is not a character", self.title))
    }

    /// Mutable character view, panicking on a non-character card.
    pub fn character_mut(&mut self) -> &mut Character {
        let title = self.title.clone();
        self.as_character_mut()
            .unwrap_or_else(|| panic!("{title} is not a character"))
    }

    #[must_use]
    pub fn as_hero(&self) -> Option<&Hero> {
        match &self.kind {
            CardKind::Hero(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_hero_mut(&mut self) -> Option<&mut Hero> {
        match &mut self.kind {
            CardKind::Hero(h) => Some(h),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            CardKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match &mut self.kind {
            CardKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    /// Enemy view, panicking on a non-enemy card. Named apart from the
    /// [`Card::enemy`] constructor.
    #[must_use]
    pub fn enemy_stats(&self) -> &Enemy {
        self.as_enemy()
            .unwrap_or_else(|| panic!("{} is not an enemy", self.title))
    }

    /// Mutable enemy view, panicking on a non-enemy card.
    pub fn enemy_stats_mut(&mut self) -> &mut Enemy {
        let title = self.title.clone();
        self.as_enemy_mut()
            .unwrap_or_else(|| panic!("{title} is not an enemy"))
    }

    #[must_use]
    pub fn as_location(&self) -> Option<&Location> {
        match &self.kind {
            CardKind::Location(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_location_mut(&mut self) -> Option<&mut Location> {
        match &mut self.kind {
            CardKind::Location(l) => Some(l),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_attachment(&self) -> Option<&Attachment> {
        match &self.kind {
            CardKind::Attachment(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_attachment_mut(&mut self) -> Option<&mut Attachment> {
        match &mut self.kind {
            CardKind::Attachment(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_quest(&self) -> Option<&Quest> {
        match &self.kind {
            CardKind::Quest(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_quest_mut(&mut self) -> Option<&mut Quest> {
        match &mut self.kind {
            CardKind::Quest(q) => Some(q),
            _ => None,
        }
    }

    /// Threat this card contributes while sitting in the staging area.
    ///
    /// Cards without a threat attribute contribute nothing.
    #[must_use]
    pub fn staging_threat(&self) -> i64 {
        match &self.kind {
            CardKind::Enemy(e) => e.threat,
            CardKind::Location(l) => l.threat,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_constructor() {
        let boromir = Card::hero("Boromir", Sphere::Leadership, 11, 1, 3, 2, 5)
            .with_keyword("Gondor")
            .with_keyword("Warrior");

        assert_eq!(boromir.id, CardId(0)); // unassigned until added
        let hero = boromir.as_hero().unwrap();
        assert_eq!(hero.threat_cost, 11);
        assert_eq!(hero.resources, 0);
        assert_eq!(hero.stats.attack, 3);
        assert!(boromir.has_keyword("Gondor"));
        assert!(!boromir.has_keyword("Orc"));
    }

    #[test]
    fn test_character_view_covers_heroes_and_allies() {
        let hero = Card::hero("Aragorn", Sphere::Leadership, 12, 2, 3, 2, 5);
        let ally = Card::ally("Faramir", 4, Sphere::Leadership, 2, 1, 2, 3);
        let enemy = Card::enemy("Orc", 20, 2, 2, 1, 3);

        assert!(hero.as_character().is_some());
        assert!(ally.as_character().is_some());
        assert!(enemy.as_character().is_none());
    }

    #[test]
    #[should_panic(expected = "is not an enemy")]
    fn test_wrong_kind_access_panics() {
        let hero = Card::hero("Aragorn", Sphere::Leadership, 12, 2, 3, 2, 5);
        let _ = hero.enemy_stats();
    }

    #[test]
    fn test_staging_threat_by_kind() {
        let enemy = Card::enemy("Orc", 20, 2, 2, 1, 3);
        let location = Card::location("Old Forest Road", 1, 3, 0);
        let quest = Card::quest("Flight", 12);

        assert_eq!(enemy.staging_threat(), 2);
        assert_eq!(location.staging_threat(), 1);
        assert_eq!(quest.staging_threat(), 0);
    }

    #[test]
    fn test_flags() {
        let mut card = Card::hero("Galadriel", Sphere::Spirit, 9, 4, 0, 0, 4);
        assert_eq!(card.get_flag("used_this_round", 0), 0);
        card.set_flag("used_this_round", 1);
        assert_eq!(card.get_flag("used_this_round", 0), 1);
    }

    #[test]
    fn test_card_serialization() {
        let card = Card::ally("Gondor Soldier", 2, Sphere::Leadership, 1, 2, 1, 3)
            .with_keyword("Gondor");
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
