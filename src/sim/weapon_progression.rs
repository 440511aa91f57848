//! Weapon upgrade, evolution and fusion
//!
//! All functions are pure: they take weapon records by reference and return
//! new ones. Missing registry entries yield `None` so callers can fall back
//! to a simpler reward.

use crate::catalog::{FusionRecipe, PlayerClass, Weapon, evolution_for, find_fusion, find_weapon};

/// Per-level damage growth (level n multiplies by 1 + 0.1·n)
const DAMAGE_STEP: f64 = 0.1;
/// Attack interval multiplier per upgrade
const ATTACK_SPEED_FACTOR: f64 = 0.95;
/// Highest upgrade level accepted when rebuilding a saved weapon
pub const MAX_UPGRADE_LEVEL: u32 = 100;

fn level_multiplier(level: u32) -> f64 {
    1.0 + DAMAGE_STEP * level as f64
}

fn scale(value: u32, multiplier: f64) -> u32 {
    (value as f64 * multiplier).floor() as u32
}

fn faster(attack_speed: u32) -> u32 {
    scale(attack_speed, ATTACK_SPEED_FACTOR).max(1)
}

/// Upgrade a weapon by one level
///
/// Damage is multiplied on top of its current value; range and elemental
/// damage are left alone.
pub fn upgrade(weapon: &Weapon) -> Weapon {
    let level = weapon.upgrade_level.saturating_add(1);
    Weapon {
        damage: scale(weapon.damage, level_multiplier(level)),
        attack_speed: faster(weapon.attack_speed),
        upgrade_level: level,
        ..weapon.clone()
    }
}

/// Apply the full upgrade stack for `level` to a fresh template, scaling
/// damage, attack speed, range and elemental damage together
pub fn apply_upgrade_stack(template: &Weapon, level: u32) -> Weapon {
    let mut w = template.clone();
    for n in 1..=level {
        let m = level_multiplier(n);
        w.damage = scale(w.damage, m);
        w.attack_speed = faster(w.attack_speed);
        w.range = scale(w.range, m);
        w.elemental_damage = w.elemental_damage.map(|e| scale(e, m));
    }
    w.upgrade_level = level;
    w
}

/// Whether a weapon may evolve now
pub fn can_evolve(weapon: &Weapon) -> bool {
    !weapon.is_evolved
        && evolution_for(&weapon.id).is_some_and(|link| weapon.upgrade_level >= link.required_level)
}

/// Evolve a weapon, carrying its full upgrade level over
pub fn evolve(weapon: &Weapon) -> Option<Weapon> {
    if !can_evolve(weapon) {
        return None;
    }
    let link = evolution_for(&weapon.id)?;
    let target = find_weapon(&link.target_id)?;
    let mut evolved = apply_upgrade_stack(target, weapon.upgrade_level);
    evolved.is_evolved = true;
    log::info!(
        "Evolved {} -> {} at upgrade level {}",
        weapon.id,
        evolved.id,
        evolved.upgrade_level
    );
    Some(evolved)
}

/// Recipe combining two weapons, ignoring class restrictions
pub fn can_fuse(a: &Weapon, b: &Weapon) -> Option<&'static FusionRecipe> {
    find_fusion(&a.id, &b.id)
}

/// Recipe combining two weapons that `class` is allowed to use
pub fn can_fuse_for_class(a: &Weapon, b: &Weapon, class: PlayerClass) -> Option<&'static FusionRecipe> {
    can_fuse(a, b).filter(|recipe| recipe.allows_class(class))
}

/// Fuse two weapons into the recipe result (a fresh, level 0 weapon)
pub fn fuse(a: &Weapon, b: &Weapon, class: PlayerClass) -> Option<Weapon> {
    let recipe = can_fuse_for_class(a, b, class)?;
    let result = find_weapon(recipe.result_id)?.clone();
    log::info!("Fused {} + {} -> {}", a.id, b.id, result.id);
    Some(result)
}

/// Rebuild a weapon from a saved id and upgrade level (clamped to `MAX_UPGRADE_LEVEL`)
pub fn restore_weapon(id: &str, level: u32) -> Option<Weapon> {
    let template = find_weapon(id)?;
    if level > MAX_UPGRADE_LEVEL {
        log::warn!("Upgrade level {level} for {id} out of range, clamping to {MAX_UPGRADE_LEVEL}");
    }
    let level = level.min(MAX_UPGRADE_LEVEL);
    if template.is_evolved {
        return Some(apply_upgrade_stack(template, level));
    }
    let mut w = template.clone();
    for _ in 0..level {
        w = upgrade(&w);
    }
    Some(w)
}
