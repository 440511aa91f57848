//! Reward option generation and application
//!
//! A reward screen always offers exactly three options. Empty candidate
//! pools fall back to a stat option so the screen is never empty.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::state::{Player, StatKind};
use super::weapon_progression::{can_evolve, evolve, fuse, upgrade};
use crate::catalog::{Artifact, Rarity, Skill, Weapon, all_artifacts, all_skills, all_weapons};

/// Points granted by a stat option
pub const STAT_REWARD_AMOUNT: u32 = 3;

const SKILL_FIRST_CHANCE: f64 = 0.6;
const WEAPON_SECOND_CHANCE: f64 = 0.5;
const FUSION_CHANCE: f64 = 0.6;
const EVOLUTION_CHANCE: f64 = 0.5;

/// One choice on a reward screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewardOption {
    Skill { skill: Skill },
    /// A new weapon; the current one moves to the inventory
    Weapon { weapon: Weapon },
    Stat { stat: StatKind, amount: u32 },
    /// Replacement for the equipped weapon, one level higher
    Upgrade { weapon: Weapon },
    /// Evolved replacement for the equipped weapon
    Evolution { weapon: Weapon },
    /// `partner` (an owned weapon) is consumed together with the offered one
    Fusion { partner: String, result: Weapon },
    Artifact { artifact: Artifact },
}

/// Skills the player could learn now
pub fn skill_pool(player: &Player) -> Vec<&'static Skill> {
    all_skills()
        .iter()
        .filter(|s| s.unlock_level <= player.level)
        .filter(|s| s.allows_class(player.class))
        .filter(|s| !player.owns_skill(&s.id))
        .collect()
}

/// Artifacts the player does not own yet
pub fn artifact_pool(player: &Player) -> Vec<&'static Artifact> {
    all_artifacts()
        .iter()
        .filter(|a| !player.owns_artifact(&a.id))
        .collect()
}

fn stat_option(rng: &mut impl Rng) -> RewardOption {
    let stat = StatKind::ALL[rng.random_range(0..StatKind::ALL.len())];
    RewardOption::Stat {
        stat,
        amount: STAT_REWARD_AMOUNT,
    }
}

fn skill_option(player: &Player, rng: &mut impl Rng) -> Option<RewardOption> {
    skill_pool(player).choose(rng).map(|skill| RewardOption::Skill {
        skill: (*skill).clone(),
    })
}

/// Rarity-weighted draw over unowned artifacts
///
/// An empty rolled tier falls back to the first tier that still has candidates.
pub fn draw_artifact(player: &Player, rng: &mut impl Rng) -> Option<&'static Artifact> {
    let pool = artifact_pool(player);
    if pool.is_empty() {
        return None;
    }
    let total: u32 = Rarity::ALL.iter().map(|r| r.weight()).sum();
    let mut roll = rng.random_range(0..total);
    let mut rolled = Rarity::Common;
    for rarity in Rarity::ALL {
        if roll < rarity.weight() {
            rolled = rarity;
            break;
        }
        roll -= rarity.weight();
    }

    let tier = |rarity: Rarity| -> Vec<&'static Artifact> {
        pool.iter().copied().filter(|a| a.rarity == rarity).collect()
    };
    let bucket = Some(tier(rolled))
        .filter(|b| !b.is_empty())
        .or_else(|| Rarity::ALL.into_iter().map(tier).find(|b| !b.is_empty()))?;
    bucket.choose(rng).copied()
}

fn artifact_option(player: &Player, rng: &mut impl Rng) -> Option<RewardOption> {
    draw_artifact(player, rng).map(|a| RewardOption::Artifact { artifact: a.clone() })
}

fn owned_weapons(player: &Player) -> impl Iterator<Item = &Weapon> {
    std::iter::once(&player.equipped_weapon).chain(player.weapons.iter())
}

/// Offer for a randomly dropped weapon: fusion, evolution, upgrade or the weapon itself
pub fn weapon_path_option(player: &Player, rng: &mut impl Rng) -> RewardOption {
    let droppable: Vec<&Weapon> = all_weapons().iter().filter(|w| w.is_droppable()).collect();
    let Some(candidate) = droppable.choose(rng).copied() else {
        return stat_option(rng);
    };

    let fusion = owned_weapons(player).find_map(|owned| {
        let result = fuse(candidate, owned, player.class)?;
        Some((owned.id.clone(), result))
    });
    if let Some((partner, result)) = fusion
        && rng.random_bool(FUSION_CHANCE)
    {
        return RewardOption::Fusion { partner, result };
    }

    let equipped = &player.equipped_weapon;
    if candidate.id == equipped.id {
        if can_evolve(equipped)
            && rng.random_bool(EVOLUTION_CHANCE)
            && let Some(weapon) = evolve(equipped)
        {
            return RewardOption::Evolution { weapon };
        }
        return RewardOption::Upgrade {
            weapon: upgrade(equipped),
        };
    }

    RewardOption::Weapon {
        weapon: candidate.clone(),
    }
}

/// Build the three options for a level-up or wave-milestone screen
pub fn generate_reward_options(player: &Player, wave: u32, rng: &mut impl Rng) -> [RewardOption; 3] {
    let first = if rng.random_bool(SKILL_FIRST_CHANCE) {
        skill_option(player, rng).unwrap_or_else(|| weapon_path_option(player, rng))
    } else {
        weapon_path_option(player, rng)
    };

    let second = if rng.random_bool(WEAPON_SECOND_CHANCE) {
        weapon_path_option(player, rng)
    } else {
        stat_option(rng)
    };

    let third = match rng.random_range(0..10) {
        0..=3 => None,
        4..=6 => skill_option(player, rng),
        _ => artifact_option(player, rng),
    }
    .unwrap_or_else(|| stat_option(rng));

    log::debug!("Reward options generated for wave {wave}");
    [first, second, third]
}

fn equip_first_free<T>(slots: &mut [Option<T>; 3], item: T) {
    if let Some(slot) = slots.iter_mut().find(|s| s.is_none()) {
        *slot = Some(item);
    }
}

/// Apply a chosen reward, returning the updated player
pub fn apply_reward(player: &Player, option: &RewardOption) -> Player {
    let mut p = player.clone();
    match option {
        RewardOption::Skill { skill } => {
            if !p.owns_skill(&skill.id) {
                p.skills.push(skill.clone());
                if !skill.is_passive {
                    equip_first_free(&mut p.equipped_skills, skill.clone());
                }
            }
        }
        RewardOption::Weapon { weapon } => {
            let previous = std::mem::replace(&mut p.equipped_weapon, weapon.clone());
            p.weapons.push(previous);
        }
        RewardOption::Stat { stat, amount } => {
            p.stats = p.stats.with_added(*stat, *amount);
        }
        RewardOption::Upgrade { weapon } | RewardOption::Evolution { weapon } => {
            p.equipped_weapon = weapon.clone();
        }
        RewardOption::Fusion { partner, result } => {
            if p.equipped_weapon.id == *partner {
                p.equipped_weapon = result.clone();
            } else {
                if let Some(idx) = p.weapons.iter().position(|w| w.id == *partner) {
                    p.weapons.remove(idx);
                }
                let previous = std::mem::replace(&mut p.equipped_weapon, result.clone());
                p.weapons.push(previous);
            }
        }
        RewardOption::Artifact { artifact } => {
            if !p.owns_artifact(&artifact.id) {
                p.artifacts.push(artifact.clone());
                equip_first_free(&mut p.equipped_artifacts, artifact.clone());
            }
        }
    }
    p.recompute_max_health();
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PlayerClass, find_weapon};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn option_kind(o: &RewardOption) -> &'static str {
        match o {
            RewardOption::Skill { .. } => "skill",
            RewardOption::Weapon { .. } => "weapon",
            RewardOption::Stat { .. } => "stat",
            RewardOption::Upgrade { .. } => "upgrade",
            RewardOption::Evolution { .. } => "evolution",
            RewardOption::Fusion { .. } => "fusion",
            RewardOption::Artifact { .. } => "artifact",
        }
    }

    fn owner_of_everything(class: PlayerClass) -> Player {
        let mut p = Player::new(class);
        p.level = 99;
        p.skills = all_skills().to_vec();
        p.artifacts = all_artifacts().to_vec();
        p
    }

    #[test]
    fn test_skill_pool_respects_level_and_class() {
        let p = Player::new(PlayerClass::Warrior);
        let pool = skill_pool(&p);
        assert!(pool.iter().all(|s| s.unlock_level <= 1));
        assert!(pool.iter().any(|s| s.id == "power_strike"));
        let mut mage = Player::new(PlayerClass::Mage);
        mage.level = 10;
        assert!(skill_pool(&mage).iter().all(|s| s.id != "whirlwind"));
    }

    #[test]
    fn test_artifact_draw_falls_back_when_tier_empty() {
        let mut p = Player::new(PlayerClass::Warrior);
        p.artifacts = all_artifacts()
            .iter()
            .filter(|a| a.id != "heart_of_titan")
            .cloned()
            .collect();
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..50 {
            assert_eq!(draw_artifact(&p, &mut rng).map(|a| a.id.as_str()), Some("heart_of_titan"));
        }
        p.artifacts = all_artifacts().to_vec();
        assert!(draw_artifact(&p, &mut rng).is_none());
    }

    #[test]
    fn test_artifact_draw_favors_common() {
        let p = Player::new(PlayerClass::Warrior);
        let mut rng = Pcg32::seed_from_u64(8);
        let draws: Vec<Rarity> = (0..2000)
            .filter_map(|_| draw_artifact(&p, &mut rng).map(|a| a.rarity))
            .collect();
        let common = draws.iter().filter(|r| **r == Rarity::Common).count();
        let legendary = draws.iter().filter(|r| **r == Rarity::Legendary).count();
        assert!(common > 800 && common < 1200);
        assert!(legendary < common / 5);
    }

    #[test]
    fn test_weapon_path_offers_every_kind() {
        let mut p = Player::new(PlayerClass::Warrior);
        p.equipped_weapon = crate::sim::weapon_progression::restore_weapon("iron_sword", 5).unwrap();
        let mut rng = Pcg32::seed_from_u64(12);
        let kinds: std::collections::HashSet<&str> = (0..3000)
            .map(|_| option_kind(&weapon_path_option(&p, &mut rng)))
            .collect();
        for kind in ["weapon", "upgrade", "evolution", "fusion"] {
            assert!(kinds.contains(kind), "missing {kind}");
        }
    }

    #[test]
    fn test_apply_fusion_consumes_partner() {
        let p = Player::new(PlayerClass::Warrior);
        let result = find_weapon("flame_blade").cloned().unwrap();
        let option = RewardOption::Fusion {
            partner: "iron_sword".into(),
            result: result.clone(),
        };
        let next = apply_reward(&p, &option);
        assert_eq!(next.equipped_weapon, result);
        assert!(next.weapons.is_empty());
    }

    #[test]
    fn test_apply_skill_and_artifact_equip() {
        let p = Player::new(PlayerClass::Warrior);
        let skill = crate::catalog::find_skill("power_strike").cloned().unwrap();
        let p = apply_reward(&p, &RewardOption::Skill { skill });
        assert!(p.equipped_skills[0].is_some());

        let passive = crate::catalog::find_skill("toughness").cloned().unwrap();
        let before = p.max_health;
        let p = apply_reward(&p, &RewardOption::Skill { skill: passive });
        assert!(p.equipped_skills[1].is_none());
        assert!(p.max_health > before);

        let artifact = crate::catalog::find_artifact("heart_of_titan").cloned().unwrap();
        let p = apply_reward(&p, &RewardOption::Artifact { artifact });
        assert!(p.equipped_artifacts[0].is_some());
        assert!(p.owns_artifact("heart_of_titan"));
    }

    #[test]
    fn test_apply_weapon_moves_old_to_inventory() {
        let p = Player::new(PlayerClass::Archer);
        let weapon = find_weapon("crossbow").cloned().unwrap();
        let p = apply_reward(&p, &RewardOption::Weapon { weapon });
        assert_eq!(p.equipped_weapon.id, "crossbow");
        assert_eq!(p.weapons[0].id, "short_bow");
    }

    #[test]
    fn test_option_json_shape() {
        let option = RewardOption::Stat {
            stat: StatKind::Agility,
            amount: 3,
        };
        let json = serde_json::to_string(&option).unwrap();
        assert!(json.contains("\"type\":\"stat\""));
        let back: RewardOption = serde_json::from_str(&json).unwrap();
        assert_eq!(back, option);
    }

    proptest! {
        #[test]
        fn prop_always_three_options(seed in any::<u64>(), wave in 1u32..=100, level in 1u32..20) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut p = Player::new(PlayerClass::Mage);
            p.level = level;
            let options = generate_reward_options(&p, wave, &mut rng);
            prop_assert_eq!(options.len(), 3);
        }

        #[test]
        fn prop_empty_pools_never_offered(seed in any::<u64>(), class in 0usize..3) {
            let class = [PlayerClass::Warrior, PlayerClass::Archer, PlayerClass::Mage][class];
            let p = owner_of_everything(class);
            let mut rng = Pcg32::seed_from_u64(seed);
            for option in generate_reward_options(&p, 10, &mut rng) {
                let kind = option_kind(&option);
                prop_assert!(kind != "skill" && kind != "artifact");
            }
        }
    }
}
