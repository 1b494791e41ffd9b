//! Error taxonomy for player-initiated actions.
//!
//! Engine-internal invariants (an id in `player.engaged` that is not an
//! enemy, an unknown card id) are programmer errors and panic. Actions a
//! player could legitimately attempt and be refused return
//! [`IllegalAction`].

use crate::cards::Sphere;

/// A player action the rules refuse. The game state is unchanged when one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IllegalAction {
    #[error("{title} is not in hand")]
    NotInHand { title: String },

    #[error("cannot afford {title}: costs {cost} {sphere}")]
    Unaffordable {
        title: String,
        cost: i64,
        sphere: Sphere,
    },

    #[error("{title} cannot be played from hand")]
    NotPlayable { title: String },

    #[error("no legal target to attach {title} to")]
    NoAttachTarget { title: String },

    #[error("{title} is already attached")]
    AlreadyAttached { title: String },
}
