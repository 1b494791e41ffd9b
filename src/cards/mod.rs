//! Card data model: kinds, stats, and identifiers.

mod card;
mod character;

pub use card::{
    Ally, Attachment, Card, CardId, CardKind, Enemy, EventCard, Hero, Location, Quest, Sphere,
};
pub use character::{CapabilityOverrides, Character};
