//! Session snapshot capture and restore

use serde::{Deserialize, Serialize};

use crate::catalog::{PlayerClass, Weapon, find_artifact, find_skill, find_weapon};
use crate::settings::{Difficulty, Settings};
use crate::sim::state::{GameState, Player, Stats};
use crate::sim::weapon_progression::restore_weapon;

/// Current snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Equipped weapon reference (rebuilt from the registry on load)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWeapon {
    pub id: String,
    #[serde(default)]
    pub upgrade_level: u32,
}

/// Reduced, round-trippable session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub score: u64,
    pub wave: u32,
    pub health: f32,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub stats: Stats,
    pub stat_points: u32,
    /// Skill ids per action slot
    pub equipped_skills: [Option<String>; 3],
    /// Every owned skill id
    pub skills: Vec<String>,
    pub equipped_weapon: SavedWeapon,
    pub weapons: Vec<Weapon>,
    pub class: PlayerClass,
    pub artifacts: Vec<String>,
    pub equipped_artifacts: [Option<String>; 3],
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl SessionSnapshot {
    /// Capture the persistent part of a running session
    pub fn capture(state: &GameState) -> Self {
        let p = &state.player;
        Self {
            version: SNAPSHOT_VERSION,
            score: state.score,
            wave: state.wave,
            health: p.health,
            level: p.level,
            experience: p.experience,
            experience_to_next_level: p.experience_to_next_level,
            stats: p.stats,
            stat_points: p.stat_points,
            equipped_skills: p.equipped_skills.clone().map(|s| s.map(|s| s.id)),
            skills: p.skills.iter().map(|s| s.id.clone()).collect(),
            equipped_weapon: SavedWeapon {
                id: p.equipped_weapon.id.clone(),
                upgrade_level: p.equipped_weapon.upgrade_level,
            },
            weapons: p.weapons.clone(),
            class: p.class,
            artifacts: p.artifacts.iter().map(|a| a.id.clone()).collect(),
            equipped_artifacts: p.equipped_artifacts.clone().map(|a| a.map(|a| a.id)),
            difficulty: state.difficulty,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            log::warn!(
                "Snapshot version {} differs from {}, loading anyway",
                snapshot.version,
                SNAPSHOT_VERSION
            );
        }
        Ok(snapshot)
    }

    /// Rebuild a playable session; unknown ids fall back to defaults
    pub fn restore(&self, seed: u64) -> GameState {
        let settings = Settings {
            difficulty: self.difficulty,
            player_class: self.class,
            seed: Some(seed),
            starting_wave: self.wave,
        };
        let mut state = GameState::new(seed, &settings);
        state.score = self.score;
        state.player = self.restore_player();
        log::info!(
            "Restored session: wave {}, level {}, score {}",
            state.wave,
            state.player.level,
            state.score
        );
        state
    }

    fn restore_player(&self) -> Player {
        let mut p = Player::new(self.class);
        p.level = self.level.max(1);
        p.experience = self.experience;
        p.experience_to_next_level = self.experience_to_next_level.max(1);
        p.stats = self.stats;
        p.stat_points = self.stat_points;

        p.skills = self.skills.iter().filter_map(|id| lookup(id, "skill", find_skill)).collect();
        p.equipped_skills = self
            .equipped_skills
            .clone()
            .map(|slot| slot.and_then(|id| lookup(&id, "skill", find_skill)));
        p.artifacts = self
            .artifacts
            .iter()
            .filter_map(|id| lookup(id, "artifact", find_artifact))
            .collect();
        p.equipped_artifacts = self
            .equipped_artifacts
            .clone()
            .map(|slot| slot.and_then(|id| lookup(&id, "artifact", find_artifact)));

        let saved = &self.equipped_weapon;
        match restore_weapon(&saved.id, saved.upgrade_level) {
            Some(weapon) => p.equipped_weapon = weapon,
            None => log::warn!("Unknown weapon {:?} in snapshot, using starting weapon", saved.id),
        }
        p.weapons = self
            .weapons
            .iter()
            .filter(|w| {
                let known = find_weapon(&w.id).is_some();
                if !known {
                    log::warn!("Dropping unknown weapon {:?} from inventory", w.id);
                }
                known
            })
            .cloned()
            .collect();

        p.recompute_max_health();
        p.health = self.health.clamp(0.0, p.max_health);
        p
    }
}

fn lookup<T: Clone + 'static>(id: &str, what: &str, find: fn(&str) -> Option<&'static T>) -> Option<T> {
    let found = find(id).cloned();
    if found.is_none() {
        log::warn!("Unknown {what} {id:?} in snapshot, skipping");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameStatus;
    use crate::sim::weapon_progression::upgrade;

    fn progressed_state() -> GameState {
        let settings = Settings {
            player_class: PlayerClass::Mage,
            difficulty: Difficulty::Hard,
            starting_wave: 23,
            ..Default::default()
        };
        let mut state = GameState::new(42, &settings);
        let p = &mut state.player;
        p.level = 6;
        p.experience = 77;
        p.experience_to_next_level = 759;
        p.stats.vitality = 9;
        p.stat_points = 2;
        let fireball = find_skill("fireball").cloned().unwrap();
        p.skills = vec![fireball.clone(), find_skill("toughness").cloned().unwrap()];
        p.equipped_skills[1] = Some(fireball);
        let coin = find_artifact("lucky_coin").cloned().unwrap();
        p.artifacts = vec![coin.clone(), find_artifact("iron_ring").cloned().unwrap()];
        p.equipped_artifacts[2] = Some(coin);
        p.equipped_weapon = upgrade(&upgrade(&p.equipped_weapon));
        p.weapons = vec![find_weapon("frost_wand").cloned().unwrap()];
        p.recompute_max_health();
        p.health = 61.0;
        state.score = 12_345;
        state
    }

    #[test]
    fn test_snapshot_round_trip() {
        let state = progressed_state();
        let snapshot = SessionSnapshot::capture(&state);
        let json = snapshot.to_json().unwrap();
        let loaded = SessionSnapshot::from_json(&json).unwrap();
        assert_eq!(loaded, snapshot);

        let restored = loaded.restore(7);
        assert_eq!(SessionSnapshot::capture(&restored), snapshot);
        assert_eq!(restored.player.equipped_weapon, state.player.equipped_weapon);
        assert_eq!(restored.player.max_health, state.player.max_health);
    }

    #[test]
    fn test_transient_state_rebuilt() {
        let mut state = progressed_state();
        state.boss.health = 1.0;
        state.player.equipped_skills[1].as_mut().unwrap().current_cooldown = 100;
        let restored = SessionSnapshot::capture(&state).restore(1);
        assert_eq!(restored.status, GameStatus::Playing);
        assert!(restored.projectiles.is_empty());
        assert!(restored.damage_texts.is_empty());
        assert_eq!(restored.wave, 23);
        assert_eq!(restored.boss.health, restored.boss.max_health);
        assert_eq!(restored.player.equipped_skills[1].as_ref().unwrap().current_cooldown, 0);
    }

    #[test]
    fn test_unknown_ids_fall_back() {
        let mut snapshot = SessionSnapshot::capture(&progressed_state());
        snapshot.equipped_weapon = SavedWeapon {
            id: "laser_cannon".into(),
            upgrade_level: 3,
        };
        snapshot.skills.push("teleport".into());
        snapshot.equipped_artifacts[0] = Some("mystery_box".into());
        let mut bogus = find_weapon("crossbow").cloned().unwrap();
        bogus.id = "banana".into();
        snapshot.weapons.push(bogus);

        let restored = snapshot.restore(1);
        assert_eq!(restored.player.equipped_weapon.id, "apprentice_staff");
        assert_eq!(restored.player.equipped_weapon.upgrade_level, 0);
        assert_eq!(restored.player.skills.len(), 2);
        assert!(restored.player.equipped_artifacts[0].is_none());
        assert_eq!(restored.player.weapons.len(), 1);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let mut value = serde_json::to_value(SessionSnapshot::capture(&progressed_state())).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("version");
        obj.remove("difficulty");
        let snapshot: SessionSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        assert!(SessionSnapshot::from_json("{\"score\": \"lots\"}").is_err());
        assert!(SessionSnapshot::from_json("not json").is_err());
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut snapshot = SessionSnapshot::capture(&progressed_state());
        snapshot.wave = 500;
        snapshot.health = 1e9;
        snapshot.level = 0;
        let restored = snapshot.restore(1);
        assert_eq!(restored.wave, crate::consts::MAX_WAVE);
        assert_eq!(restored.player.health, restored.player.max_health);
        assert_eq!(restored.player.level, 1);
    }

    #[test]
    fn test_huge_upgrade_level_clamped() {
        let mut snapshot = SessionSnapshot::capture(&progressed_state());
        snapshot.equipped_weapon.upgrade_level = u32::MAX;
        let restored = snapshot.restore(1);
        assert_eq!(restored.player.equipped_weapon.id, "apprentice_staff");
        assert_eq!(
            restored.player.equipped_weapon.upgrade_level,
            crate::sim::weapon_progression::MAX_UPGRADE_LEVEL
        );
    }
}
