//! Resource generation.

use crate::core::GameState;

/// Each hero gains one resource of its own sphere into its personal pool.
///
/// Pools are per-hero and never shared. Collection never exhausts a hero;
/// only spending does.
pub fn collect_resources(state: &mut GameState) {
    for player in state.player_ids() {
        let heroes = state.player(player).heroes.clone();
        for id in heroes {
            if let Some(hero) = state.card_mut(id).as_hero_mut() {
                hero.resources += 1;
            }
        }
    }
    tracing::debug!("resources collected");
}
