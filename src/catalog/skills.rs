//! Skill registry
//!
//! Active skills occupy one of three action slots. Passive skills apply their
//! bonus bundle just by being owned and never take a slot.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{Element, PlayerClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    Attack,
    Defense,
    Special,
}

/// Always-on percentage bonuses granted by a passive skill
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PassiveSkillEffect {
    pub damage_bonus: f32,
    pub crit_bonus: f32,
    pub health_bonus: f32,
    pub defense_bonus: f32,
    pub speed_bonus: f32,
    pub exp_bonus: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub kind: SkillKind,
    /// Frames between uses
    pub cooldown: u32,
    #[serde(default)]
    pub current_cooldown: u32,
    #[serde(default)]
    pub damage: Option<f32>,
    /// Fraction of max health restored on use
    #[serde(default)]
    pub heal_fraction: Option<f32>,
    /// Effect length in frames
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub is_passive: bool,
    #[serde(default)]
    pub passive: Option<PassiveSkillEffect>,
    /// Player level required before the skill is offered
    #[serde(default)]
    pub unlock_level: u32,
    /// Classes allowed to learn this skill (empty = all)
    #[serde(default)]
    pub classes: Vec<PlayerClass>,
}

impl Skill {
    fn active(id: &str, name: &str, kind: SkillKind, cooldown: u32, unlock_level: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            cooldown,
            current_cooldown: 0,
            damage: None,
            heal_fraction: None,
            duration: None,
            element: None,
            is_passive: false,
            passive: None,
            unlock_level,
            classes: Vec::new(),
        }
    }

    fn passive(id: &str, name: &str, unlock_level: u32, effect: PassiveSkillEffect) -> Self {
        Self {
            is_passive: true,
            passive: Some(effect),
            ..Self::active(id, name, SkillKind::Special, 0, unlock_level)
        }
    }

    fn with_damage(mut self, damage: f32) -> Self {
        self.damage = Some(damage);
        self
    }

    fn with_heal(mut self, fraction: f32) -> Self {
        self.heal_fraction = Some(fraction);
        self
    }

    fn with_duration(mut self, frames: u32) -> Self {
        self.duration = Some(frames);
        self
    }

    fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    fn for_classes(mut self, classes: &[PlayerClass]) -> Self {
        self.classes = classes.to_vec();
        self
    }

    pub fn allows_class(&self, class: PlayerClass) -> bool {
        self.classes.is_empty() || self.classes.contains(&class)
    }

    pub fn is_ready(&self) -> bool {
        !self.is_passive && self.current_cooldown == 0
    }
}

static SKILLS: LazyLock<Vec<Skill>> = LazyLock::new(build_skills);

fn build_skills() -> Vec<Skill> {
    use PlayerClass::*;
    use SkillKind::*;

    vec![
        Skill::active("power_strike", "Power Strike", Attack, 180, 1).with_damage(40.0),
        Skill::active("fireball", "Fireball", Attack, 240, 2)
            .with_damage(30.0)
            .with_element(Element::Fire)
            .for_classes(&[Mage]),
        Skill::active("arrow_rain", "Arrow Rain", Attack, 300, 3)
            .with_damage(12.0)
            .for_classes(&[Archer]),
        Skill::active("whirlwind", "Whirlwind", Attack, 360, 4)
            .with_damage(25.0)
            .for_classes(&[Warrior]),
        Skill::active("iron_skin", "Iron Skin", Defense, 600, 2).with_duration(180),
        Skill::active("second_wind", "Second Wind", Defense, 900, 5).with_heal(0.3),
        Skill::active("time_slow", "Time Slow", Special, 900, 6).with_duration(240),
        Skill::active("berserker", "Berserker", Special, 1200, 8)
            .with_duration(300)
            .for_classes(&[Warrior]),
        Skill::passive(
            "sharp_mind",
            "Sharp Mind",
            1,
            PassiveSkillEffect {
                exp_bonus: 10.0,
                ..Default::default()
            },
        ),
        Skill::passive(
            "toughness",
            "Toughness",
            2,
            PassiveSkillEffect {
                health_bonus: 15.0,
                ..Default::default()
            },
        ),
        Skill::passive(
            "precision",
            "Precision",
            3,
            PassiveSkillEffect {
                crit_bonus: 5.0,
                ..Default::default()
            },
        ),
        Skill::passive(
            "brute_force",
            "Brute Force",
            4,
            PassiveSkillEffect {
                damage_bonus: 10.0,
                ..Default::default()
            },
        ),
        Skill::passive(
            "fleet_foot",
            "Fleet Foot",
            3,
            PassiveSkillEffect {
                speed_bonus: 10.0,
                ..Default::default()
            },
        ),
        Skill::passive(
            "stone_skin",
            "Stone Skin",
            5,
            PassiveSkillEffect {
                defense_bonus: 10.0,
                ..Default::default()
            },
        ),
        Skill::passive(
            "arcane_focus",
            "Arcane Focus",
            6,
            PassiveSkillEffect {
                damage_bonus: 8.0,
                crit_bonus: 3.0,
                ..Default::default()
            },
        )
        .for_classes(&[Mage]),
    ]
}

/// Every skill template
pub fn all_skills() -> &'static [Skill] {
    &SKILLS
}

/// Look up a skill template by id
pub fn find_skill(id: &str) -> Option<&'static Skill> {
    SKILLS.iter().find(|s| s.id == id)
}
