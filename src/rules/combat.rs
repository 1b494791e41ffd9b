//! Combat resolution: enemy attacks, then player attacks.

use crate::cards::CardId;
use crate::choice::{choose_many, choose_one, ChoiceOption, ChoiceProvider};
use crate::core::{GameState, PlayerId};
use crate::effects::ShadowEffect;
use crate::events::{topics, EventContext, EventDispatcher};

/// Deal `amount` damage to a hero or ally, handling defeat.
///
/// A defeated character leaves its play-area zone for the owner's discard
/// pile, its hooks are unregistered, and `CharacterDefeated` is published.
/// Damage to a character already out of play adjusts hit points only.
pub fn damage_character(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    target: CardId,
    amount: i64,
) {
    state.card_mut(target).character_mut().hit_points -= amount;
    if !state.card(target).character().is_defeated() {
        return;
    }

    let Some(owner) = state.owner_of(target) else {
        return;
    };
    if !state.player_mut(owner).remove_from_play(target) {
        return;
    }
    // Attachments fall off with their host.
    let attached = std::mem::take(&mut state.card_mut(target).attachments);
    for att in attached {
        if let Some(a) = state.card_mut(att).as_attachment_mut() {
            a.attached_to = None;
        }
        state.player_mut(owner).discard.push(att);
    }
    state.player_mut(owner).discard.push(target);
    events.remove_for_source(target);
    tracing::info!(character = %state.card(target).title, %owner, "defeated");

    let mut ctx = EventContext::new()
        .with_card("character", target)
        .with_player("player", owner);
    events.publish(topics::CHARACTER_DEFEATED, &mut ctx, state, choices);
}

/// Remove a defeated enemy to the encounter discard and publish
/// `EnemyDefeated`.
pub fn defeat_enemy(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    enemy: CardId,
) {
    let engaged_with = state.card(enemy).enemy_stats().engaged_with;
    if let Some(player) = engaged_with {
        state.player_mut(player).disengage(enemy);
    }
    state.staging.retain(|&id| id != enemy);
    state.card_mut(enemy).enemy_stats_mut().engaged_with = None;
    state.encounter_discard.push(enemy);
    events.remove_for_source(enemy);
    tracing::info!(enemy = %state.card(enemy).title, "defeated");

    let mut ctx = EventContext::new().with_card("enemy", enemy);
    if let Some(player) = engaged_with {
        ctx.set_player("player", player);
    }
    events.publish(topics::ENEMY_DEFEATED, &mut ctx, state, choices);
}

/// Resolve attacks by every enemy engaged with `player`, each in turn.
///
/// Iterates a snapshot; an attack may defeat the enemy or change the
/// engaged set mid-loop.
pub fn resolve_enemy_attacks(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    player: PlayerId,
) {
    let engaged: Vec<CardId> = state.player(player).engaged.clone();
    for enemy in engaged {
        if !state.player(player).engaged.contains(&enemy) {
            continue;
        }
        resolve_enemy_attack(state, events, choices, enemy, player);
    }
}

fn resolve_enemy_attack(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    enemy: CardId,
    player: PlayerId,
) {
    let mut before = EventContext::new()
        .with_card("enemy", enemy)
        .with_player("player", player);
    events.publish(topics::BEFORE_ENEMY_ATTACK, &mut before, state, choices);

    // Shadow card: one-shot modifiers scoped to this attack only.
    let shadow_card = state.draw_encounter_card();
    let shadow = shadow_card.and_then(|id| state.card(id).shadow);
    let mut revealed = EventContext::new().with_card("enemy", enemy);
    if let Some(id) = shadow_card {
        revealed.set_card("shadow_card", id);
    }
    events.publish(topics::SHADOW_CARD_REVEALED, &mut revealed, state, choices);

    let mut attack_bonus = 0;
    let mut defender_burn = 0;
    match shadow {
        Some(ShadowEffect::BoostAttack(n)) => attack_bonus = n,
        // Defense is not consulted while the enemy is the attacker.
        Some(ShadowEffect::BoostDefense(_)) | None => {}
        Some(ShadowEffect::DamageDefender(n)) => defender_burn = n,
    }

    let defender = select_defender(state, choices, enemy, player);
    if let Some(defender) = defender {
        let mut declared = EventContext::new()
            .with_card("enemy", enemy)
            .with_card("defender", defender)
            .with_player("player", player);
        events.publish(topics::AFTER_DEFENDER_DECLARED, &mut declared, state, choices);

        let attack = (state.card(enemy).enemy_stats().attack + attack_bonus).max(0);
        let defense = state.card(defender).character().defense.max(0);
        let damage = (attack - defense).max(0);
        tracing::debug!(attack, defense, damage, "enemy attack");
        damage_character(state, events, choices, defender, damage);
        if defender_burn > 0 {
            damage_character(state, events, choices, defender, defender_burn);
        }
    } else {
        tracing::debug!(enemy = %state.card(enemy).title, "attack undefended");
    }

    // The shadow card is spent regardless of how the attack went.
    if let Some(id) = shadow_card {
        state.encounter_discard.push(id);
    }

    if state.card(enemy).enemy_stats().hit_points <= 0 {
        defeat_enemy(state, events, choices, enemy);
    }

    if let Some(defender) = defender {
        let mut after = EventContext::new()
            .with_card("enemy", enemy)
            .with_card("defender", defender)
            .with_player("player", player);
        events.publish(topics::AFTER_ENEMY_ATTACK, &mut after, state, choices);
    }
}

/// Ask `player` for an optional defender: ready, able to defend.
fn select_defender(
    state: &GameState,
    choices: &mut dyn ChoiceProvider,
    enemy: CardId,
    player: PlayerId,
) -> Option<CardId> {
    let candidates: Vec<CardId> = state
        .player(player)
        .characters()
        .filter(|&id| {
            let c = state.card(id).character();
            !c.exhausted && c.can_defend()
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let mut options: Vec<ChoiceOption> = candidates
        .iter()
        .map(|&id| {
            let c = state.card(id);
            ChoiceOption::for_card(
                format!("{} (Defense {})", c.title, c.character().defense),
                id,
            )
        })
        .collect();
    options.push(ChoiceOption::new("No defender"));

    let prompt = format!("Choose defender against {}:", state.card(enemy).title);
    let idx = choose_one(choices, &prompt, &options);
    candidates.get(idx).copied()
}

/// The player-attack step: while enemies remain engaged, `player` picks one
/// and declares attackers against it, or stops.
///
/// Each attacker exhausts the moment it is declared, before its strength is
/// computed. Attack strength passes through `CalculateAttack` so hooks can
/// add modifiers; damage is the modified total minus the enemy's defense,
/// floored at zero.
pub fn resolve_player_attacks(
    state: &mut GameState,
    events: &mut EventDispatcher,
    choices: &mut dyn ChoiceProvider,
    player: PlayerId,
) {
    loop {
        let enemies: Vec<CardId> = state.player(player).engaged.clone();
        if enemies.is_empty() {
            break;
        }

        let mut options: Vec<ChoiceOption> = enemies
            .iter()
            .map(|&id| ChoiceOption::for_card(state.card(id).title.clone(), id))
            .collect();
        options.push(ChoiceOption::new("Done attacking"));
        let idx = choose_one(choices, "Attack which enemy?", &options);
        let Some(&enemy) = enemies.get(idx) else {
            break;
        };

        let candidates: Vec<CardId> = state
            .player(player)
            .characters()
            .filter(|&id| {
                let c = state.card(id).character();
                !c.exhausted && c.can_attack()
            })
            .collect();
        if candidates.is_empty() {
            break;
        }
        let attacker_options: Vec<ChoiceOption> = candidates
            .iter()
            .map(|&id| {
                let c = state.card(id);
                ChoiceOption::for_card(
                    format!("{} (Attack {})", c.title, c.character().attack),
                    id,
                )
            })
            .collect();
        let picked = choose_many(choices, "Declare attackers:", &attacker_options);
        if picked.is_empty() {
            break;
        }

        let mut total_attack = 0;
        for i in picked {
            let attacker = candidates[i];
            state.card_mut(attacker).character_mut().exhausted = true;

            let base = state.card(attacker).character().attack;
            let mut ctx = EventContext::new()
                .with_card("attacker", attacker)
                .with_card("enemy", enemy)
                .with_player("player", player)
                .with("base_attack", base)
                .with("modified_attack", base);
            events.publish(topics::CALCULATE_ATTACK, &mut ctx, state, choices);
            total_attack += ctx.value("modified_attack", base);
        }

        let defense = state.card(enemy).enemy_stats().defense;
        let damage = (total_attack - defense).max(0);
        tracing::debug!(total_attack, defense, damage, "player attack");
        state.card_mut(enemy).enemy_stats_mut().hit_points -= damage;
        if state.card(enemy).enemy_stats().hit_points <= 0 {
            defeat_enemy(state, events, choices, enemy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Sphere};
    use crate::choice::ScriptedChoices;
    use crate::core::Player;

    fn combat_state() -> (GameState, PlayerId) {
        (GameState::new(vec![Player::new("gav")], 21), PlayerId::new(0))
    }

    fn engage(state: &mut GameState, enemy: CardId, player: PlayerId) {
        state.card_mut(enemy).enemy_stats_mut().engaged_with = Some(player);
        state.player_mut(player).engaged.push(enemy);
    }

    #[test]
    fn defended_attack_damage_is_floored_at_zero() {
        let (mut state, p) = combat_state();
        let hero = state.add_card(Card::hero("Beregond", Sphere::Tactics, 10, 0, 1, 4, 4));
        state.player_mut(p).heroes.push(hero);
        let enemy = state.add_card(Card::enemy("Wolf", 8, 1, 2, 1, 2));
        engage(&mut state, enemy, p);

        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new().then_one(0);
        resolve_enemy_attacks(&mut state, &mut events, &mut choices, p);

        // Attack 2 against defense 4: no damage.
        assert_eq!(state.card(hero).character().hit_points, 4);
    }

    #[test]
    fn undefended_attack_resolves_without_events_or_damage() {
        let (mut state, p) = combat_state();
        let hero = state.add_card(Card::hero("Beregond", Sphere::Tactics, 10, 0, 1, 4, 4));
        state.player_mut(p).heroes.push(hero);
        let enemy = state.add_card(Card::enemy("Wolf", 8, 1, 5, 1, 2));
        engage(&mut state, enemy, p);

        let mut events = EventDispatcher::new();
        events.register(crate::events::Hook::new(topics::AFTER_ENEMY_ATTACK, |state, _, _, _| {
            // Marks the state so the test can detect a stray publish.
            state.round_number += 100;
        }));
        // Decline to defend: last option.
        let mut choices = ScriptedChoices::new().then_one(1);
        resolve_enemy_attacks(&mut state, &mut events, &mut choices, p);

        assert_eq!(state.card(hero).character().hit_points, 4);
        assert_eq!(state.round_number, 0);
    }

    #[test]
    fn defender_defeat_moves_it_to_discard() {
        let (mut state, p) = combat_state();
        let ally = state.add_card(Card::ally("Squire", 1, Sphere::Leadership, 0, 1, 1, 1));
        state.player_mut(p).allies.push(ally);
        let enemy = state.add_card(Card::enemy("Troll", 30, 2, 5, 2, 9));
        engage(&mut state, enemy, p);

        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new().then_one(0);
        resolve_enemy_attacks(&mut state, &mut events, &mut choices, p);

        assert!(state.player(p).allies.is_empty());
        assert_eq!(state.player(p).discard, vec![ally]);
        // The enemy stays engaged across rounds.
        assert_eq!(state.player(p).engaged, vec![enemy]);
    }

    #[test]
    fn shadow_boost_applies_to_this_attack_and_card_is_spent_once() {
        let (mut state, p) = combat_state();
        let hero = state.add_card(Card::hero("Beregond", Sphere::Tactics, 10, 0, 1, 4, 4));
        state.player_mut(p).heroes.push(hero);
        let enemy = state.add_card(Card::enemy("Wolf", 8, 1, 4, 1, 2));
        engage(&mut state, enemy, p);
        let shadow = state.add_card(
            Card::enemy("Lurker", 25, 1, 1, 0, 1).with_shadow(ShadowEffect::BoostAttack(2)),
        );
        state.encounter_deck.push(shadow);

        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new().then_one(0);
        resolve_enemy_attacks(&mut state, &mut events, &mut choices, p);

        // Attack 4 + 2 shadow against defense 4: two damage.
        assert_eq!(state.card(hero).character().hit_points, 2);
        assert_eq!(state.encounter_discard, vec![shadow]);
        assert!(state.encounter_deck.is_empty());
    }

    #[test]
    fn shadow_damage_defender_lands_after_the_attack() {
        let (mut state, p) = combat_state();
        let hero = state.add_card(Card::hero("Beregond", Sphere::Tactics, 10, 0, 1, 4, 4));
        state.player_mut(p).heroes.push(hero);
        let enemy = state.add_card(Card::enemy("Wolf", 8, 1, 2, 1, 2));
        engage(&mut state, enemy, p);
        let shadow = state.add_card(
            Card::enemy("Lurker", 25, 1, 1, 0, 1).with_shadow(ShadowEffect::DamageDefender(1)),
        );
        state.encounter_deck.push(shadow);

        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new().then_one(0);
        resolve_enemy_attacks(&mut state, &mut events, &mut choices, p);

        // Blocked attack, but the shadow effect still burns the defender.
        assert_eq!(state.card(hero).character().hit_points, 3);
    }

    #[test]
    fn attackers_exhaust_on_declaration_and_enemy_takes_net_damage() {
        let (mut state, p) = combat_state();
        let hero = state.add_card(Card::hero("Gimli", Sphere::Tactics, 11, 2, 2, 2, 5));
        let ally = state.add_card(Card::ally("Veteran Axehand", 2, Sphere::Tactics, 0, 2, 1, 2));
        state.player_mut(p).heroes.push(hero);
        state.player_mut(p).allies.push(ally);
        let enemy = state.add_card(Card::enemy("Orc", 10, 2, 2, 1, 5));
        engage(&mut state, enemy, p);

        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new().then_one(0).then_many(vec![0, 1]);
        resolve_player_attacks(&mut state, &mut events, &mut choices, p);

        assert!(state.card(hero).character().exhausted);
        assert!(state.card(ally).character().exhausted);
        // 2 + 2 attack against defense 1: three damage.
        assert_eq!(state.card(enemy).enemy_stats().hit_points, 2);
    }

    #[test]
    fn defeated_enemy_leaves_engagement_for_encounter_discard() {
        let (mut state, p) = combat_state();
        let hero = state.add_card(Card::hero("Gimli", Sphere::Tactics, 11, 2, 5, 2, 5));
        state.player_mut(p).heroes.push(hero);
        let enemy = state.add_card(Card::enemy("Orc", 10, 2, 2, 1, 3));
        engage(&mut state, enemy, p);

        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new().then_one(0).then_many(vec![0]);
        resolve_player_attacks(&mut state, &mut events, &mut choices, p);

        assert!(state.player(p).engaged.is_empty());
        assert_eq!(state.card(enemy).enemy_stats().engaged_with, None);
        assert_eq!(state.encounter_discard, vec![enemy]);
    }

    #[test]
    fn exhausted_characters_cannot_attack() {
        let (mut state, p) = combat_state();
        let hero = state.add_card(Card::hero("Gimli", Sphere::Tactics, 11, 2, 5, 2, 5));
        state.card_mut(hero).character_mut().exhausted = true;
        state.player_mut(p).heroes.push(hero);
        let enemy = state.add_card(Card::enemy("Orc", 10, 2, 2, 1, 3));
        engage(&mut state, enemy, p);

        let mut events = EventDispatcher::new();
        let mut choices = ScriptedChoices::new().then_one(0);
        resolve_player_attacks(&mut state, &mut events, &mut choices, p);

        assert_eq!(state.card(enemy).enemy_stats().hit_points, 3);
        assert_eq!(state.player(p).engaged, vec![enemy]);
    }
}
