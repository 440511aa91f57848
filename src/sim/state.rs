//! Game state and core simulation types
//!
//! `GameState` is the single value exchanged with the outside world each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::rewards::RewardOption;
use crate::catalog::{Artifact, Element, PlayerClass, Skill, Weapon, find_weapon};
use crate::consts::*;
use crate::settings::{Difficulty, Settings};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Menu,
    Playing,
    /// Ticks are not advanced while paused
    Paused,
    /// Waiting for the player to pick a reward
    Choosing,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Allocatable stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    Strength,
    Vitality,
    Agility,
    Defense,
    CriticalChance,
}

impl StatKind {
    pub const ALL: [StatKind; 5] = [
        StatKind::Strength,
        StatKind::Vitality,
        StatKind::Agility,
        StatKind::Defense,
        StatKind::CriticalChance,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u32,
    pub vitality: u32,
    pub agility: u32,
    pub defense: u32,
    /// Percent
    pub critical_chance: f32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            strength: 5,
            vitality: 5,
            agility: 5,
            defense: 5,
            critical_chance: 5.0,
        }
    }
}

impl Stats {
    /// Return a copy with `amount` added to one stat
    pub fn with_added(&self, stat: StatKind, amount: u32) -> Self {
        let mut stats = *self;
        match stat {
            StatKind::Strength => stats.strength += amount,
            StatKind::Vitality => stats.vitality += amount,
            StatKind::Agility => stats.agility += amount,
            StatKind::Defense => stats.defense += amount,
            StatKind::CriticalChance => stats.critical_chance += amount as f32,
        }
        stats
    }
}

/// Summed percentage bonuses from equipped artifacts and owned passive skills
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bonuses {
    pub damage: f32,
    pub attack_speed: f32,
    pub health: f32,
    pub crit: f32,
    pub defense: f32,
    pub speed: f32,
    /// Product of equipped artifact exp multipliers
    pub exp_multiplier: f32,
    /// Passive exp bonus (percent)
    pub passive_exp: f32,
}

impl Default for Bonuses {
    fn default() -> Self {
        Self {
            damage: 0.0,
            attack_speed: 0.0,
            health: 0.0,
            crit: 0.0,
            defense: 0.0,
            speed: 0.0,
            exp_multiplier: 1.0,
            passive_exp: 0.0,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    pub facing: Facing,
    pub is_jumping: bool,
    pub is_dodging: bool,
    pub is_attacking: bool,
    pub dodge_cooldown: u32,
    pub attack_cooldown: u32,
    /// Frames of damage immunity left (hit recovery)
    pub invulnerable_ticks: u32,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub stats: Stats,
    pub stat_points: u32,
    pub equipped_skills: [Option<Skill>; 3],
    pub skills: Vec<Skill>,
    pub equipped_weapon: Weapon,
    pub weapons: Vec<Weapon>,
    pub artifacts: Vec<Artifact>,
    pub equipped_artifacts: [Option<Artifact>; 3],
    pub class: PlayerClass,
}

impl Player {
    pub fn new(class: PlayerClass) -> Self {
        let equipped_weapon = find_weapon(class.starting_weapon_id())
            .cloned()
            .unwrap_or_else(|| crate::catalog::all_weapons()[0].clone());
        let mut player = Self {
            pos: Vec2::new(100.0, CANVAS_HEIGHT - super::maps::GROUND_HEIGHT - PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            health: PLAYER_BASE_HEALTH,
            max_health: PLAYER_BASE_HEALTH,
            facing: Facing::Right,
            is_jumping: false,
            is_dodging: false,
            is_attacking: false,
            dodge_cooldown: 0,
            attack_cooldown: 0,
            invulnerable_ticks: 0,
            level: 1,
            experience: 0,
            experience_to_next_level: 100,
            stats: Stats::default(),
            stat_points: 0,
            equipped_skills: [None, None, None],
            skills: Vec::new(),
            equipped_weapon,
            weapons: Vec::new(),
            artifacts: Vec::new(),
            equipped_artifacts: [None, None, None],
            class,
        };
        player.recompute_max_health();
        player.health = player.max_health;
        player
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }

    /// Dodge invulnerability window, shield, or hit recovery
    pub fn is_invulnerable(&self) -> bool {
        let dodge_iframes = self.is_dodging && self.dodge_cooldown > DODGE_COOLDOWN - DODGE_IFRAMES;
        dodge_iframes || self.invulnerable_ticks > 0
    }

    /// Equipped artifacts that are present
    pub fn active_artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.equipped_artifacts.iter().flatten()
    }

    pub fn owns_skill(&self, id: &str) -> bool {
        self.skills.iter().any(|s| s.id == id)
    }

    pub fn owns_artifact(&self, id: &str) -> bool {
        self.artifacts.iter().any(|a| a.id == id)
    }

    /// Aggregate bonuses from equipped artifacts and owned passives
    pub fn bonuses(&self) -> Bonuses {
        let mut b = Bonuses::default();
        for artifact in self.active_artifacts() {
            let e = &artifact.effect;
            b.damage += e.damage_bonus.unwrap_or(0.0);
            b.attack_speed += e.attack_speed_bonus.unwrap_or(0.0);
            b.health += e.health_bonus.unwrap_or(0.0);
            b.crit += e.crit_bonus.unwrap_or(0.0);
            b.defense += e.defense_bonus.unwrap_or(0.0);
            b.speed += e.speed_bonus.unwrap_or(0.0);
            b.exp_multiplier *= e.exp_multiplier.unwrap_or(1.0);
        }
        for passive in self.skills.iter().filter_map(|s| s.passive.as_ref()) {
            b.damage += passive.damage_bonus;
            b.crit += passive.crit_bonus;
            b.health += passive.health_bonus;
            b.defense += passive.defense_bonus;
            b.speed += passive.speed_bonus;
            b.passive_exp += passive.exp_bonus;
        }
        b
    }

    /// Recompute max health from vitality and bonuses, keeping health in range
    pub fn recompute_max_health(&mut self) {
        let bonus = self.bonuses().health;
        let base = PLAYER_BASE_HEALTH + self.stats.vitality as f32 * 10.0;
        self.max_health = (base * (1.0 + bonus / 100.0)).floor().max(1.0);
        self.health = self.health.clamp(0.0, self.max_health);
    }

    /// Crit chance in percent, capped at 100
    pub fn crit_chance(&self) -> f32 {
        (self.stats.critical_chance + self.bonuses().crit).clamp(0.0, 100.0)
    }

    /// Fraction of incoming damage absorbed (capped at 75%)
    pub fn damage_reduction(&self) -> f32 {
        let pct = self.stats.defense as f32 + self.bonuses().defense;
        (pct / 100.0).clamp(0.0, 0.75)
    }

    /// Frames between attacks with the equipped weapon
    pub fn attack_interval(&self) -> u32 {
        let bonus = self.bonuses().attack_speed.clamp(0.0, 90.0);
        let frames = self.equipped_weapon.attack_speed as f32 * (1.0 - bonus / 100.0);
        (frames.floor() as u32).max(1)
    }

    /// Apply damage after reduction; returns damage actually taken
    pub fn take_damage(&mut self, raw: f32) -> f32 {
        let dealt = (raw * (1.0 - self.damage_reduction())).max(0.0);
        self.health = (self.health - dealt).clamp(0.0, self.max_health);
        dealt
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }
}

/// Boss max health for a wave (monotonic in wave)
pub fn boss_max_health(wave: u32, difficulty: Difficulty) -> f32 {
    let w = wave.max(1) as f32;
    let base = 300.0 + 120.0 * w + (w.powf(1.5) * 15.0).floor();
    (base * difficulty.health_multiplier()).floor()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebuffKind {
    Burn,
    Chill,
    Shock,
    Poison,
    Curse,
    Bleed,
    Stun,
}

impl DebuffKind {
    /// Debuff applied by an elemental hit (Holy has none)
    pub fn from_element(element: Element) -> Option<Self> {
        match element {
            Element::Fire => Some(DebuffKind::Burn),
            Element::Ice => Some(DebuffKind::Chill),
            Element::Lightning => Some(DebuffKind::Shock),
            Element::Poison => Some(DebuffKind::Poison),
            Element::Dark => Some(DebuffKind::Curse),
            Element::Holy => None,
        }
    }
}

/// Timed status effect on the boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debuff {
    pub kind: DebuffKind,
    /// Frames remaining
    pub duration: u32,
    /// Frames since first applied (refreshes keep counting)
    #[serde(default)]
    pub elapsed: u32,
    pub tick_damage: Option<f32>,
    /// Fraction of movement speed removed (0..1)
    pub slow_amount: Option<f32>,
    pub stunned: bool,
}

/// The boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    pub current_pattern: u32,
    /// Frames until the next pattern fires
    pub pattern_cooldown: i32,
    pub is_attacking: bool,
    pub debuffs: Vec<Debuff>,
}

impl Boss {
    pub fn new(wave: u32, difficulty: Difficulty) -> Self {
        let max_health = boss_max_health(wave, difficulty);
        Self {
            pos: Vec2::new((CANVAS_WIDTH - BOSS_WIDTH) / 2.0, BOSS_MIN_Y + 40.0),
            vel: Vec2::ZERO,
            width: BOSS_WIDTH,
            height: BOSS_HEIGHT,
            health: max_health,
            max_health,
            current_pattern: 0,
            pattern_cooldown: 120,
            is_attacking: false,
            debuffs: Vec::new(),
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }

    pub fn is_stunned(&self) -> bool {
        self.debuffs.iter().any(|d| d.stunned)
    }

    /// Strongest active slow (0 when none)
    pub fn slow_amount(&self) -> f32 {
        self.debuffs
            .iter()
            .filter_map(|d| d.slow_amount)
            .fold(0.0, f32::max)
            .clamp(0.0, 1.0)
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply damage, clamped to [0, max_health]
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
    }
}

/// Render hint for projectiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileShape {
    Orb,
    Arrow,
    Slash,
    Star,
    Diamond,
    Meteor,
}

/// A projectile or attack hitbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub damage: f32,
    pub from_player: bool,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub elemental_damage: Option<f32>,
    #[serde(default)]
    pub piercing: bool,
    #[serde(default)]
    pub tracking: bool,
    #[serde(default)]
    pub shape: Option<ProjectileShape>,
    /// Weapon that fired it (drives on-hit effects)
    #[serde(default)]
    pub weapon_id: Option<String>,
    /// Tick the projectile was spawned on
    pub created_at: u64,
    /// Frames before expiry (None = until off-screen)
    #[serde(default)]
    pub lifetime: Option<u32>,
    /// Piercing projectiles only damage the boss once
    #[serde(default)]
    pub has_hit: bool,
}

impl Projectile {
    /// Boss bullet centered on `center`
    pub fn boss_bullet(center: Vec2, vel: Vec2, size: f32, damage: f32, now: u64) -> Self {
        Self {
            id: 0,
            pos: center - Vec2::splat(size / 2.0),
            vel,
            width: size,
            height: size,
            damage,
            from_player: false,
            element: None,
            elemental_damage: None,
            piercing: false,
            tracking: false,
            shape: Some(ProjectileShape::Orb),
            weapon_id: None,
            created_at: now,
            lifetime: None,
            has_hit: false,
        }
    }

    /// Player attack or hitbox centered on `center`
    pub fn player_shot(center: Vec2, vel: Vec2, size: Vec2, damage: f32, now: u64) -> Self {
        Self {
            pos: center - size * 0.5,
            width: size.x,
            height: size.y,
            from_player: true,
            ..Self::boss_bullet(center, vel, 0.0, damage, now)
        }
    }

    pub fn with_shape(mut self, shape: ProjectileShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_tracking(mut self) -> Self {
        self.tracking = true;
        self
    }

    pub fn with_lifetime(mut self, frames: u32) -> Self {
        self.lifetime = Some(frames);
        self
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.lifetime
            .is_some_and(|life| now.saturating_sub(self.created_at) >= life as u64)
    }
}

/// A platform (read-only during a wave)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Walls also block projectiles
    pub is_wall: bool,
}

impl Platform {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageTextKind {
    BossDamage,
    Critical,
    PlayerDamage,
    Heal,
    DebuffTick,
}

/// Floating combat number (transient, never persisted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageText {
    pub pos: Vec2,
    pub amount: f32,
    pub kind: DamageTextKind,
    pub ttl: u32,
}

impl DamageText {
    pub fn new(pos: Vec2, amount: f32, kind: DamageTextKind) -> Self {
        Self {
            pos,
            amount,
            kind,
            ttl: DAMAGE_TEXT_TICKS,
        }
    }
}

/// Active timed skill effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Boss projectiles move at reduced speed
    pub slow_field_ticks: u32,
    /// Doubled movement speed and bonus damage
    pub berserker_ticks: u32,
    /// Player ignores boss damage
    pub shield_ticks: u32,
}

impl ActiveEffects {
    pub fn berserker_active(&self) -> bool {
        self.berserker_ticks > 0
    }

    pub fn slow_field_active(&self) -> bool {
        self.slow_field_ticks > 0
    }

    pub fn shield_active(&self) -> bool {
        self.shield_ticks > 0
    }

    pub fn decay(&mut self) {
        self.slow_field_ticks = self.slow_field_ticks.saturating_sub(1);
        self.berserker_ticks = self.berserker_ticks.saturating_sub(1);
        self.shield_ticks = self.shield_ticks.saturating_sub(1);
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG stream, advanced only by the simulation
    pub rng: Pcg32,
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub player: Player,
    pub boss: Boss,
    pub projectiles: Vec<Projectile>,
    pub platforms: Vec<Platform>,
    pub map_index: usize,
    pub score: u64,
    /// Current wave (1..=100)
    pub wave: u32,
    /// Wave-milestone reward screens still to show
    pub pending_rewards: u32,
    /// Level-up reward screens still to show
    pub pending_level_ups: u32,
    /// Options on screen while `status == Choosing`
    pub reward_options: Vec<RewardOption>,
    pub damage_texts: Vec<DamageText>,
    pub effects: ActiveEffects,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Create a new run; the first wave is set up immediately
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let wave = settings.effective_starting_wave();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            status: GameStatus::Playing,
            difficulty: settings.difficulty,
            player: Player::new(settings.player_class),
            boss: Boss::new(wave, settings.difficulty),
            projectiles: Vec::new(),
            platforms: Vec::new(),
            map_index: 0,
            score: 0,
            wave,
            pending_rewards: 0,
            pending_level_ups: 0,
            reward_options: Vec::new(),
            damage_texts: Vec::new(),
            effects: ActiveEffects::default(),
            time_ticks: 0,
            next_id: 1,
        };
        super::tick::start_wave(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Give fresh ids to newly spawned projectiles and append them
    pub fn push_projectiles(&mut self, spawned: Vec<Projectile>) {
        for mut p in spawned {
            p.id = self.next_entity_id();
            self.projectiles.push(p);
        }
    }

    /// Ensure projectiles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
    }
}
