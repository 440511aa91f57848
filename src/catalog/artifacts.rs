//! Artifact registry
//!
//! Artifacts are immutable once defined; only a player's owned/equipped state
//! changes.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::Rarity;

/// Sparse percentage-based effect bundle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactEffect {
    /// Multiplies wave experience (1.2 = +20%)
    pub exp_multiplier: Option<f32>,
    pub damage_bonus: Option<f32>,
    pub attack_speed_bonus: Option<f32>,
    pub health_bonus: Option<f32>,
    pub crit_bonus: Option<f32>,
    pub defense_bonus: Option<f32>,
    pub speed_bonus: Option<f32>,
    /// Declared for data compatibility; not consumed by the simulation
    pub regen_percent_per_5_sec: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub effect: ArtifactEffect,
}

fn artifact(id: &str, name: &str, rarity: Rarity, effect: ArtifactEffect) -> Artifact {
    Artifact {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        effect,
    }
}

static ARTIFACTS: LazyLock<Vec<Artifact>> = LazyLock::new(|| {
    use Rarity::*;

    vec![
        artifact(
            "lucky_coin",
            "Lucky Coin",
            Common,
            ArtifactEffect {
                exp_multiplier: Some(1.1),
                ..Default::default()
            },
        ),
        artifact(
            "iron_ring",
            "Iron Ring",
            Common,
            ArtifactEffect {
                defense_bonus: Some(5.0),
                ..Default::default()
            },
        ),
        artifact(
            "swift_boots",
            "Swift Boots",
            Common,
            ArtifactEffect {
                speed_bonus: Some(10.0),
                ..Default::default()
            },
        ),
        artifact(
            "sage_tome",
            "Sage's Tome",
            Rare,
            ArtifactEffect {
                exp_multiplier: Some(1.25),
                ..Default::default()
            },
        ),
        artifact(
            "war_banner",
            "War Banner",
            Rare,
            ArtifactEffect {
                damage_bonus: Some(15.0),
                ..Default::default()
            },
        ),
        artifact(
            "quick_gloves",
            "Quick Gloves",
            Rare,
            ArtifactEffect {
                attack_speed_bonus: Some(10.0),
                ..Default::default()
            },
        ),
        artifact(
            "phoenix_feather",
            "Phoenix Feather",
            Epic,
            ArtifactEffect {
                health_bonus: Some(25.0),
                regen_percent_per_5_sec: Some(2.0),
                ..Default::default()
            },
        ),
        artifact(
            "eagle_eye",
            "Eagle Eye",
            Epic,
            ArtifactEffect {
                crit_bonus: Some(10.0),
                ..Default::default()
            },
        ),
        artifact(
            "crown_of_kings",
            "Crown of Kings",
            Legendary,
            ArtifactEffect {
                exp_multiplier: Some(1.5),
                damage_bonus: Some(20.0),
                ..Default::default()
            },
        ),
        artifact(
            "heart_of_titan",
            "Heart of the Titan",
            Legendary,
            ArtifactEffect {
                health_bonus: Some(50.0),
                defense_bonus: Some(15.0),
                ..Default::default()
            },
        ),
    ]
});

/// Every artifact template
pub fn all_artifacts() -> &'static [Artifact] {
    &ARTIFACTS
}

/// Look up an artifact by id
pub fn find_artifact(id: &str) -> Option<&'static Artifact> {
    ARTIFACTS.iter().find(|a| a.id == id)
}
