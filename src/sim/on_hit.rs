//! Weapon-specific secondary effects applied when a player attack lands

use rand::Rng;

use super::state::{Boss, DamageText, DamageTextKind, Debuff, DebuffKind, Player};
use crate::consts::*;

/// Bleed always lasts this long after a refresh
pub const BLEED_DURATION: u32 = 180;
const STUN_DURATION: u32 = 45;
/// Elemental debuff chance for weapons without their own value
pub const DEFAULT_DEBUFF_CHANCE: f64 = 0.30;
/// Fraction of player damage the boss shrugs off without penetration
pub const BOSS_ARMOR: f32 = 0.10;

/// Updated copies after on-hit effects
#[derive(Debug, Clone)]
pub struct OnHitOutcome {
    pub boss: Boss,
    pub player: Player,
    pub damage_texts: Vec<DamageText>,
}

fn heal_on_hit(weapon_id: &str) -> Option<f32> {
    match weapon_id {
        "holy_staff" => Some(3.0),
        "excalibur" => Some(5.0),
        _ => None,
    }
}

fn lifesteal_fraction(weapon_id: &str) -> Option<f32> {
    match weapon_id {
        "vampire_blade" => Some(0.05),
        "blood_reaper" => Some(0.10),
        "blood_fangs" => Some(0.08),
        _ => None,
    }
}

/// Bleed tick damage as a fraction of the hit
fn bleed_fraction(weapon_id: &str) -> Option<f32> {
    match weapon_id {
        "serrated_dagger" => Some(0.20),
        "ripper" => Some(0.30),
        "blood_fangs" => Some(0.25),
        _ => None,
    }
}

fn stun_chance(weapon_id: &str) -> Option<f64> {
    match weapon_id {
        "thunder_rod" => Some(0.10),
        "tempest_rod" => Some(0.15),
        "thunder_maul" => Some(0.20),
        _ => None,
    }
}

/// Apply every on-hit effect of `weapon_id` for a hit of `damage`
///
/// Effects are independent: a weapon may heal, bleed and stun on the same hit.
pub fn resolve_on_hit(
    weapon_id: &str,
    damage: f32,
    boss: &Boss,
    player: &Player,
    texts: &[DamageText],
    rng: &mut impl Rng,
) -> OnHitOutcome {
    let mut boss = boss.clone();
    let mut player = player.clone();
    let mut damage_texts = texts.to_vec();

    if let Some(amount) = heal_on_hit(weapon_id) {
        let healed = player.heal(amount);
        if healed > 0.0 {
            damage_texts.push(DamageText::new(player.center(), healed, DamageTextKind::Heal));
        }
    }

    if let Some(fraction) = lifesteal_fraction(weapon_id) {
        let deficit = player.max_health - player.health;
        let healed = player.heal((damage * fraction).min(deficit));
        if healed > 0.0 {
            damage_texts.push(DamageText::new(player.center(), healed, DamageTextKind::Heal));
        }
    }

    if let Some(fraction) = bleed_fraction(weapon_id) {
        let tick = (damage * fraction).max(1.0);
        match boss.debuffs.iter_mut().find(|d| d.kind == DebuffKind::Bleed) {
            Some(bleed) => {
                bleed.duration = BLEED_DURATION;
                bleed.tick_damage = Some(bleed.tick_damage.map_or(tick, |old| old.max(tick)));
            }
            None => boss.debuffs.push(Debuff {
                kind: DebuffKind::Bleed,
                duration: BLEED_DURATION,
                elapsed: 0,
                tick_damage: Some(tick),
                slow_amount: None,
                stunned: false,
            }),
        }
    }

    if let Some(chance) = stun_chance(weapon_id)
        && !boss.is_stunned()
        && rng.random_bool(chance)
    {
        boss.debuffs.push(Debuff {
            kind: DebuffKind::Stun,
            duration: STUN_DURATION,
            elapsed: 0,
            tick_damage: None,
            slow_amount: None,
            stunned: true,
        });
    }

    OnHitOutcome {
        boss,
        player,
        damage_texts,
    }
}

/// Bonus multiplier against bosses
pub fn boss_damage_multiplier(weapon_id: &str) -> f32 {
    match weapon_id {
        "siege_arbalest" => 1.25,
        "dragon_slayer" => 1.5,
        _ => 1.0,
    }
}

/// Fraction of boss armor ignored
pub fn armor_penetration(weapon_id: &str) -> f32 {
    match weapon_id {
        "crossbow" => 0.10,
        "siege_arbalest" => 0.20,
        "ripper" => 0.15,
        "dragon_slayer" => 0.25,
        _ => 0.0,
    }
}

/// Multiplier for damage after boss armor
pub fn armor_factor(weapon_id: &str) -> f32 {
    1.0 - BOSS_ARMOR * (1.0 - armor_penetration(weapon_id).clamp(0.0, 1.0))
}

/// Whether this hit strikes twice
pub fn rolls_extra_hit(weapon_id: &str, rng: &mut impl Rng) -> bool {
    let chance = match weapon_id {
        "twin_daggers" => 0.20,
        "shadow_fangs" => 0.35,
        "blood_fangs" => 0.25,
        _ => return false,
    };
    rng.random_bool(chance)
}

fn knockback_force(weapon_id: &str) -> Option<f32> {
    match weapon_id {
        "war_hammer" => Some(20.0),
        "earthshaker" => Some(35.0),
        "thunder_maul" => Some(25.0),
        _ => None,
    }
}

/// Push the boss horizontally away from the attacker (`direction` is ±1)
pub fn apply_knockback(boss: &Boss, weapon_id: &str, direction: f32) -> Boss {
    let mut b = boss.clone();
    if let Some(force) = knockback_force(weapon_id) {
        b.pos.x = (b.pos.x + direction.signum() * force).clamp(BOSS_MIN_X, BOSS_MAX_X);
    }
    b
}

/// Chance an elemental hit inflicts its debuff
pub fn debuff_chance(weapon_id: &str) -> f64 {
    match weapon_id {
        "inferno_staff" | "glacier_scepter" | "tempest_rod" => 0.50,
        "flame_blade" | "frost_bow" => 0.45,
        "apprentice_staff" | "frost_wand" | "thunder_rod" => 0.35,
        _ => DEFAULT_DEBUFF_CHANCE,
    }
}

/// Scale applied to elemental debuff durations
pub fn debuff_duration_multiplier(weapon_id: &str) -> f32 {
    match weapon_id {
        "inferno_staff" | "glacier_scepter" | "tempest_rod" => 1.5,
        "frost_bow" => 1.25,
        _ => 1.0,
    }
}
