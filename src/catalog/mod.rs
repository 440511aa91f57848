//! Read-only registries
//!
//! Weapon, skill and artifact definitions are built once on first access and
//! never mutated. Lookups by id return `Option` and never panic.

pub mod artifacts;
pub mod skills;
pub mod weapons;

use serde::{Deserialize, Serialize};

pub use artifacts::{Artifact, ArtifactEffect, all_artifacts, find_artifact};
pub use skills::{PassiveSkillEffect, Skill, SkillKind, all_skills, find_skill};
pub use weapons::{
    EvolutionLink, FusionRecipe, Weapon, WeaponKind, all_weapons, evolution_for, find_fusion,
    find_weapon, fusion_recipes,
};

/// Damage element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Ice,
    Lightning,
    Poison,
    Holy,
    Dark,
}

/// Playable class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayerClass {
    #[default]
    Warrior,
    Archer,
    Mage,
}

impl PlayerClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerClass::Warrior => "Warrior",
            PlayerClass::Archer => "Archer",
            PlayerClass::Mage => "Mage",
        }
    }

    /// Weapon every new run of this class starts with
    pub fn starting_weapon_id(&self) -> &'static str {
        match self {
            PlayerClass::Warrior => "iron_sword",
            PlayerClass::Archer => "short_bow",
            PlayerClass::Mage => "apprentice_staff",
        }
    }
}

/// Artifact rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers, most common first
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    /// Draw weight out of 100
    pub fn weight(&self) -> u32 {
        match self {
            Rarity::Common => 50,
            Rarity::Rare => 30,
            Rarity::Epic => 15,
            Rarity::Legendary => 5,
        }
    }
}
