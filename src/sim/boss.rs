//! Boss attack pattern state machine, wander movement and debuffs
//!
//! Each pattern is one variant of `BossPattern` with its own unlock gate,
//! fixed cooldown and emitter. When the cooldown runs out the current pattern
//! fires and the boss moves to the next unlocked pattern, looping back to 0
//! once the chain for the current wave tier is exhausted. Unknown or locked
//! ids reset to pattern 0.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::state::{Boss, DamageText, DamageTextKind, Debuff, DebuffKind, Projectile, ProjectileShape};
use crate::catalog::Element;
use crate::consts::*;
use crate::settings::Difficulty;
use crate::{angle_between, angle_to_vec};

/// Per-tick chance to pick a new wander velocity
const WANDER_CHANCE: f64 = 0.02;
const WANDER_SPEED: f32 = 2.5;
/// Debuff tick damage is applied every this many frames
pub const DEBUFF_TICK_INTERVAL: u32 = 30;

const SMALL: f32 = 12.0;
const MEDIUM: f32 = 16.0;
const LARGE: f32 = 24.0;

/// Boss hit damage for a wave, capped so very high waves stay survivable
pub fn base_damage(wave: u32, difficulty: Difficulty) -> f32 {
    (10.0 + 2.0 * wave as f32).min(120.0) * difficulty.damage_multiplier()
}

/// Damage for touching the boss body
pub fn contact_damage(wave: u32, difficulty: Difficulty) -> f32 {
    (base_damage(wave, difficulty) * 0.5).floor()
}

/// Everything a pattern needs to aim and scale its projectiles
#[derive(Debug, Clone, Copy)]
pub struct PatternContext {
    /// Boss center
    pub origin: Vec2,
    /// Player center
    pub target: Vec2,
    pub wave: u32,
    pub difficulty: Difficulty,
    pub now: u64,
    /// Boss health / max health (drives finale escalation)
    pub health_fraction: f32,
}

impl PatternContext {
    pub fn damage(&self, factor: f32) -> f32 {
        (base_damage(self.wave, self.difficulty) * factor).floor()
    }

    /// Base projectile speed, capped
    pub fn speed(&self, factor: f32) -> f32 {
        let base = (4.0 + 0.05 * self.wave as f32).min(9.0);
        base * self.difficulty.speed_multiplier() * factor
    }

    /// Projectile count `base + floor(per_wave · wave)`, capped
    pub fn count(&self, base: u32, per_wave: f32, cap: u32) -> u32 {
        (base + (self.wave as f32 * per_wave).floor() as u32).min(cap)
    }

    fn aim(&self) -> f32 {
        angle_between(self.origin, self.target)
    }

    /// Finale escalation level, 1 at full health up to 5 near death
    fn intensity(&self) -> u32 {
        1 + ((1.0 - self.health_fraction.clamp(0.0, 1.0)) * 4.0).floor() as u32
    }

    fn bullet(&self, angle: f32, speed: f32, size: f32, damage: f32) -> Projectile {
        self.bullet_from(self.origin, angle, speed, size, damage)
    }

    fn bullet_from(&self, from: Vec2, angle: f32, speed: f32, size: f32, damage: f32) -> Projectile {
        Projectile::boss_bullet(from, angle_to_vec(angle) * speed, size, damage, self.now)
    }
}

/// Boss attack patterns, by state id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossPattern {
    AimedBurst = 0,
    Fan = 1,
    Ring = 2,
    Spiral = 3,
    CrossVolley = 4,
    HomingScatter = 5,
    RotatingRays = 6,
    ExpandingRings = 7,
    Zigzag = 8,
    Chaos = 9,
    TwinSpiral = 10,
    StarBurst = 11,
    Pincer = 12,
    ArrowRain = 13,
    Vortex = 14,
    LaserGrid = 15,
    Shotgun = 16,
    OrbitRing = 17,
    MeteorShower = 18,
    Apocalypse = 19,
}

impl BossPattern {
    pub const ALL: [BossPattern; 20] = [
        BossPattern::AimedBurst,
        BossPattern::Fan,
        BossPattern::Ring,
        BossPattern::Spiral,
        BossPattern::CrossVolley,
        BossPattern::HomingScatter,
        BossPattern::RotatingRays,
        BossPattern::ExpandingRings,
        BossPattern::Zigzag,
        BossPattern::Chaos,
        BossPattern::TwinSpiral,
        BossPattern::StarBurst,
        BossPattern::Pincer,
        BossPattern::ArrowRain,
        BossPattern::Vortex,
        BossPattern::LaserGrid,
        BossPattern::Shotgun,
        BossPattern::OrbitRing,
        BossPattern::MeteorShower,
        BossPattern::Apocalypse,
    ];

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn id(self) -> u32 {
        self as u32
    }

    /// First wave on which the pattern can fire
    pub fn min_wave(self) -> u32 {
        match self.id() {
            0..=2 => 1,
            3 => 5,
            4 | 5 => 10,
            6 | 7 => 15,
            _ => MAX_WAVE,
        }
    }

    /// Patterns 10..=19 only appear on Hard
    pub fn hard_only(self) -> bool {
        self.id() >= 10
    }

    /// Frames until the following pattern fires
    pub fn cooldown(self) -> i32 {
        use BossPattern::*;
        match self {
            AimedBurst => 90,
            Fan => 100,
            Ring => 120,
            Spiral => 110,
            CrossVolley => 100,
            HomingScatter => 140,
            RotatingRays => 120,
            ExpandingRings => 150,
            Zigzag => 130,
            Chaos => 160,
            TwinSpiral => 120,
            StarBurst => 130,
            Pincer => 140,
            ArrowRain => 150,
            Vortex => 140,
            LaserGrid => 130,
            Shotgun => 110,
            OrbitRing => 160,
            MeteorShower => 150,
            Apocalypse => 200,
        }
    }

    pub fn is_unlocked(self, wave: u32, difficulty: Difficulty) -> bool {
        wave >= self.min_wave() && (!self.hard_only() || difficulty == Difficulty::Hard)
    }

    /// Next pattern in the chain, or 0 once the unlocked chain is exhausted
    pub fn successor(self, wave: u32, difficulty: Difficulty) -> BossPattern {
        Self::from_id(self.id() + 1)
            .filter(|next| next.is_unlocked(wave, difficulty))
            .unwrap_or(BossPattern::AimedBurst)
    }

    /// Spawn this pattern's projectiles
    pub fn emit(self, ctx: &PatternContext, rng: &mut impl Rng) -> Vec<Projectile> {
        use BossPattern::*;
        match self {
            AimedBurst => emit_aimed_burst(ctx),
            Fan => emit_fan(ctx),
            Ring => emit_ring(ctx),
            Spiral => emit_spiral(ctx),
            CrossVolley => emit_cross_volley(ctx),
            HomingScatter => emit_homing_scatter(ctx, rng),
            RotatingRays => emit_rotating_rays(ctx),
            ExpandingRings => emit_expanding_rings(ctx),
            Zigzag => emit_zigzag(ctx),
            Chaos => emit_chaos(ctx, rng),
            TwinSpiral => emit_twin_spiral(ctx),
            StarBurst => emit_star_burst(ctx),
            Pincer => emit_pincer(ctx),
            ArrowRain => emit_arrow_rain(ctx, rng),
            Vortex => emit_vortex(ctx),
            LaserGrid => emit_laser_grid(ctx),
            Shotgun => emit_shotgun(ctx, rng),
            OrbitRing => emit_orbit_ring(ctx),
            MeteorShower => emit_meteor_shower(ctx, rng),
            Apocalypse => emit_apocalypse(ctx, rng),
        }
    }
}

fn spread(ctx: &PatternContext, count: u32, center: f32, step: f32, speed: f32, size: f32, damage: f32) -> Vec<Projectile> {
    let half = (count as f32 - 1.0) / 2.0;
    (0..count)
        .map(|i| ctx.bullet(center + (i as f32 - half) * step, speed, size, damage))
        .collect()
}

fn ring(ctx: &PatternContext, count: u32, offset: f32, speed: f32, size: f32, damage: f32) -> Vec<Projectile> {
    (0..count)
        .map(|i| ctx.bullet(offset + TAU * i as f32 / count as f32, speed, size, damage))
        .collect()
}

fn emit_aimed_burst(ctx: &PatternContext) -> Vec<Projectile> {
    let n = ctx.count(3, 0.05, 5);
    spread(ctx, n, ctx.aim(), 0.15, ctx.speed(1.2), SMALL, ctx.damage(1.0))
}

fn emit_fan(ctx: &PatternContext) -> Vec<Projectile> {
    let n = ctx.count(5, 0.1, 9);
    let step = (PI / 3.0) / (n - 1) as f32;
    spread(ctx, n, ctx.aim(), step, ctx.speed(1.0), SMALL, ctx.damage(0.9))
}

fn emit_ring(ctx: &PatternContext) -> Vec<Projectile> {
    let n = ctx.count(8, 0.8, 20);
    ring(ctx, n, 0.0, ctx.speed(0.9), MEDIUM, ctx.damage(1.0))
}

fn emit_spiral(ctx: &PatternContext) -> Vec<Projectile> {
    let n = ctx.count(12, 0.2, 24);
    let offset = ctx.now as f32 * 0.05;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            ctx.bullet(offset + t * TAU * 1.5, ctx.speed(0.6 + 0.6 * t), SMALL, ctx.damage(0.8))
        })
        .collect()
}

fn emit_cross_volley(ctx: &PatternContext) -> Vec<Projectile> {
    let layers = ctx.count(1, 0.05, 3);
    (0..layers)
        .flat_map(|layer| {
            let speed = ctx.speed(1.0 - 0.2 * layer as f32);
            (0..8).map(move |dir| (dir as f32 * FRAC_PI_4, speed))
        })
        .map(|(angle, speed)| {
            ctx.bullet(angle, speed, MEDIUM, ctx.damage(1.0))
                .with_shape(ProjectileShape::Diamond)
        })
        .collect()
}

fn emit_homing_scatter(ctx: &PatternContext, rng: &mut impl Rng) -> Vec<Projectile> {
    let homing = ctx.count(2, 0.04, 5);
    let scatter = ctx.count(4, 0.1, 10);
    let mut out: Vec<Projectile> = spread(ctx, homing, ctx.aim(), 0.4, ctx.speed(0.7), MEDIUM, ctx.damage(1.1))
        .into_iter()
        .map(|p| p.with_tracking().with_lifetime(300))
        .collect();
    for _ in 0..scatter {
        let angle = rng.random_range(0.0..TAU);
        let speed = ctx.speed(rng.random_range(0.6..1.2));
        out.push(ctx.bullet(angle, speed, SMALL, ctx.damage(0.8)));
    }
    out
}

fn emit_rotating_rays(ctx: &PatternContext) -> Vec<Projectile> {
    let rays = ctx.count(4, 0.04, 8);
    let rotation = ctx.now as f32 * 0.03;
    (0..rays)
        .flat_map(|r| {
            let angle = rotation + TAU * r as f32 / rays as f32;
            (0..3).map(move |k| (angle, 0.7 + 0.25 * k as f32))
        })
        .map(|(angle, factor)| ctx.bullet(angle, ctx.speed(factor), SMALL, ctx.damage(0.9)))
        .collect()
}

fn emit_expanding_rings(ctx: &PatternContext) -> Vec<Projectile> {
    let n = ctx.count(10, 0.1, 16);
    let half_step = PI / n as f32;
    let mut out = ring(ctx, n, 0.0, ctx.speed(0.6), LARGE, ctx.damage(1.2));
    out.extend(ring(ctx, n, half_step, ctx.speed(1.1), MEDIUM, ctx.damage(1.0)));
    out.into_iter().map(|p| p.with_shape(ProjectileShape::Star)).collect()
}

fn emit_zigzag(ctx: &PatternContext) -> Vec<Projectile> {
    let n = ctx.count(8, 0.06, 14);
    let width = BOSS_WIDTH * 2.0;
    (0..n)
        .map(|i| {
            let x = ctx.origin.x - width / 2.0 + width * i as f32 / (n - 1) as f32;
            let from = Vec2::new(x, ctx.origin.y);
            let sway = if i % 2 == 0 { 0.35 } else { -0.35 };
            ctx.bullet_from(from, FRAC_PI_2 + sway, ctx.speed(0.8), SMALL, ctx.damage(0.9))
                .with_shape(ProjectileShape::Diamond)
        })
        .collect()
}

fn emit_chaos(ctx: &PatternContext, rng: &mut impl Rng) -> Vec<Projectile> {
    let n = (16 + 8 * ctx.intensity()).min(48);
    (0..n)
        .map(|i| {
            let angle = if i % 4 == 0 {
                ctx.aim() + rng.random_range(-0.3..0.3)
            } else {
                rng.random_range(0.0..TAU)
            };
            let speed = ctx.speed(rng.random_range(0.6..1.4));
            ctx.bullet(angle, speed, SMALL, ctx.damage(1.0))
        })
        .collect()
}

fn emit_twin_spiral(ctx: &PatternContext) -> Vec<Projectile> {
    let n = 16;
    let offset = ctx.now as f32 * 0.04;
    (0..n)
        .flat_map(|i| {
            let t = i as f32 / n as f32;
            [(offset + t * TAU, t), (-offset - t * TAU, t)]
        })
        .map(|(angle, t)| ctx.bullet(angle, ctx.speed(0.6 + 0.5 * t), SMALL, ctx.damage(0.9)))
        .collect()
}

fn emit_star_burst(ctx: &PatternContext) -> Vec<Projectile> {
    let offset = ctx.aim();
    (0..5)
        .flat_map(|point| {
            let angle = offset + TAU * point as f32 / 5.0;
            (0..5).map(move |k| (angle, 0.6 + 0.2 * k as f32))
        })
        .map(|(angle, factor)| {
            ctx.bullet(angle, ctx.speed(factor), MEDIUM, ctx.damage(1.0))
                .with_shape(ProjectileShape::Star)
        })
        .collect()
}

fn emit_pincer(ctx: &PatternContext) -> Vec<Projectile> {
    let per_side = 6;
    (0..per_side)
        .flat_map(|i| {
            let y = ctx.target.y + (i as f32 - 2.5) * 40.0;
            [(Vec2::new(0.0, y), 0.0), (Vec2::new(CANVAS_WIDTH, y), PI)]
        })
        .map(|(from, angle)| {
            ctx.bullet_from(from, angle, ctx.speed(0.9), MEDIUM, ctx.damage(1.0))
                .with_shape(ProjectileShape::Arrow)
        })
        .collect()
}

fn emit_arrow_rain(ctx: &PatternContext, rng: &mut impl Rng) -> Vec<Projectile> {
    (0..16)
        .map(|_| {
            let from = Vec2::new(rng.random_range(0.0..CANVAS_WIDTH), 0.0);
            let angle = FRAC_PI_2 + rng.random_range(-0.1..0.1);
            ctx.bullet_from(from, angle, ctx.speed(rng.random_range(0.8..1.2)), SMALL, ctx.damage(0.9))
                .with_shape(ProjectileShape::Arrow)
        })
        .collect()
}

fn emit_vortex(ctx: &PatternContext) -> Vec<Projectile> {
    let n = 12;
    (0..n)
        .map(|i| {
            let angle = TAU * i as f32 / n as f32;
            // Leave tangentially, then curve toward the player
            ctx.bullet(angle + FRAC_PI_2 * 0.5, ctx.speed(0.7), MEDIUM, ctx.damage(1.0))
                .with_tracking()
                .with_lifetime(360)
        })
        .collect()
}

fn emit_laser_grid(ctx: &PatternContext) -> Vec<Projectile> {
    let speed = ctx.speed(1.3);
    (0..4)
        .flat_map(|dir| {
            let angle = dir as f32 * FRAC_PI_2 + ctx.aim();
            (0..6).map(move |k| (angle, k))
        })
        .map(|(angle, k)| {
            // Stagger along the ray so the line reads as a beam
            let from = ctx.origin + angle_to_vec(angle) * (k as f32 * SMALL);
            ctx.bullet_from(from, angle, speed, SMALL, ctx.damage(0.7))
        })
        .collect()
}

fn emit_shotgun(ctx: &PatternContext, rng: &mut impl Rng) -> Vec<Projectile> {
    (0..12)
        .map(|_| {
            let angle = ctx.aim() + rng.random_range(-0.4..0.4);
            ctx.bullet(angle, ctx.speed(rng.random_range(0.9..1.5)), SMALL, ctx.damage(0.8))
        })
        .collect()
}

fn emit_orbit_ring(ctx: &PatternContext) -> Vec<Projectile> {
    ring(ctx, 24, ctx.now as f32 * 0.02, ctx.speed(0.5), LARGE, ctx.damage(1.1))
        .into_iter()
        .map(|p| p.with_lifetime(420))
        .collect()
}

fn emit_meteor_shower(ctx: &PatternContext, rng: &mut impl Rng) -> Vec<Projectile> {
    (0..8)
        .map(|_| {
            let from = Vec2::new(ctx.target.x + rng.random_range(-300.0..300.0), 0.0);
            let angle = angle_between(from, ctx.target) + rng.random_range(-0.15..0.15);
            ctx.bullet_from(from, angle, ctx.speed(1.4), 28.0, ctx.damage(1.5))
                .with_shape(ProjectileShape::Meteor)
        })
        .collect()
}

fn emit_apocalypse(ctx: &PatternContext, rng: &mut impl Rng) -> Vec<Projectile> {
    let intensity = ctx.intensity();
    let mut out = ring(ctx, 24, ctx.now as f32 * 0.05, ctx.speed(0.8), MEDIUM, ctx.damage(1.0));
    out.extend(spread(ctx, 5, ctx.aim(), 0.12, ctx.speed(1.3), SMALL, ctx.damage(1.2)));
    for _ in 0..(4 * intensity) {
        let angle = rng.random_range(0.0..TAU);
        out.push(ctx.bullet(angle, ctx.speed(rng.random_range(0.7..1.3)), SMALL, ctx.damage(1.0)));
    }
    out.truncate(64);
    out
}

/// Result of advancing the boss one tick
#[derive(Debug, Clone)]
pub struct BossStep {
    pub boss: Boss,
    /// Projectiles fired this tick (ids not yet assigned)
    pub spawned: Vec<Projectile>,
}

/// Move the boss and run its pattern state machine for one tick
pub fn advance_boss(
    boss: &Boss,
    target: Vec2,
    wave: u32,
    difficulty: Difficulty,
    now: u64,
    rng: &mut impl Rng,
) -> BossStep {
    let mut b = boss.clone();
    b.is_attacking = false;

    if b.is_stunned() {
        b.vel = Vec2::ZERO;
    } else {
        wander(&mut b, rng);
    }

    b.pattern_cooldown -= 1;
    let mut spawned = Vec::new();
    if b.pattern_cooldown <= 0 {
        let Some(pattern) =
            BossPattern::from_id(b.current_pattern).filter(|p| p.is_unlocked(wave, difficulty))
        else {
            // Cooldown stays expired, so pattern 0 fires on the next tick
            log::warn!(
                "Boss pattern {} unavailable at wave {}, resetting to 0",
                b.current_pattern,
                wave
            );
            b.current_pattern = BossPattern::AimedBurst.id();
            return BossStep {
                boss: b,
                spawned: Vec::new(),
            };
        };
        let ctx = PatternContext {
            origin: b.center(),
            target,
            wave,
            difficulty,
            now,
            health_fraction: if b.max_health > 0.0 { b.health / b.max_health } else { 0.0 },
        };
        spawned = pattern.emit(&ctx, rng);
        b.pattern_cooldown = pattern.cooldown();
        b.current_pattern = pattern.successor(wave, difficulty).id();
        b.is_attacking = true;
        log::debug!(
            "Boss pattern {:?} fired {} projectiles, next {}",
            pattern,
            spawned.len(),
            b.current_pattern
        );
    }

    BossStep { boss: b, spawned }
}

fn wander(b: &mut Boss, rng: &mut impl Rng) {
    if rng.random_bool(WANDER_CHANCE) {
        b.vel = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-0.6..0.6)) * WANDER_SPEED;
    }
    b.pos += b.vel * (1.0 - b.slow_amount());

    if b.pos.x < BOSS_MIN_X || b.pos.x > BOSS_MAX_X {
        b.pos.x = b.pos.x.clamp(BOSS_MIN_X, BOSS_MAX_X);
        b.vel.x = -b.vel.x;
    }
    if b.pos.y < BOSS_MIN_Y || b.pos.y > BOSS_MAX_Y {
        b.pos.y = b.pos.y.clamp(BOSS_MIN_Y, BOSS_MAX_Y);
        b.vel.y = -b.vel.y;
    }
}

/// Debuff inflicted by an elemental hit (Holy inflicts none)
pub fn elemental_debuff(element: Element, elemental_damage: f32, duration_multiplier: f32) -> Option<Debuff> {
    let kind = DebuffKind::from_element(element)?;
    let frames = |base: f32| (base * duration_multiplier).round().max(1.0) as u32;
    let debuff = match kind {
        DebuffKind::Burn => Debuff {
            kind,
            duration: frames(180.0),
            elapsed: 0,
            tick_damage: Some((elemental_damage * 0.5).max(1.0)),
            slow_amount: None,
            stunned: false,
        },
        DebuffKind::Chill => Debuff {
            kind,
            duration: frames(150.0),
            elapsed: 0,
            tick_damage: None,
            slow_amount: Some(0.4),
            stunned: false,
        },
        DebuffKind::Shock => Debuff {
            kind,
            duration: frames(120.0),
            elapsed: 0,
            tick_damage: Some((elemental_damage * 0.3).max(1.0)),
            slow_amount: Some(0.2),
            stunned: false,
        },
        DebuffKind::Poison => Debuff {
            kind,
            duration: frames(240.0),
            elapsed: 0,
            tick_damage: Some((elemental_damage * 0.4).max(1.0)),
            slow_amount: None,
            stunned: false,
        },
        DebuffKind::Curse => Debuff {
            kind,
            duration: frames(180.0),
            elapsed: 0,
            tick_damage: Some((elemental_damage * 0.25).max(1.0)),
            slow_amount: Some(0.15),
            stunned: false,
        },
        DebuffKind::Bleed | DebuffKind::Stun => return None,
    };
    Some(debuff)
}

/// Add a debuff, refreshing an existing one of the same kind
pub fn apply_debuff(boss: &Boss, debuff: Debuff) -> Boss {
    let mut b = boss.clone();
    match b.debuffs.iter_mut().find(|d| d.kind == debuff.kind) {
        Some(existing) => {
            existing.duration = existing.duration.max(debuff.duration);
            existing.tick_damage = match (existing.tick_damage, debuff.tick_damage) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
            existing.slow_amount = match (existing.slow_amount, debuff.slow_amount) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
            existing.stunned |= debuff.stunned;
        }
        None => b.debuffs.push(debuff),
    }
    b
}

/// Apply debuff tick damage and count down durations, pruning expired ones
///
/// Damage lands every `DEBUFF_TICK_INTERVAL` frames of a debuff's lifetime,
/// so refreshing its duration does not speed up the ticks.
pub fn tick_debuffs(boss: &Boss) -> (Boss, Vec<DamageText>) {
    let mut b = boss.clone();
    let mut texts = Vec::new();
    let center = b.center();
    let mut total = 0.0;
    for d in &mut b.debuffs {
        if let Some(dmg) = d.tick_damage
            && d.elapsed % DEBUFF_TICK_INTERVAL == 0
            && d.duration > 0
        {
            total += dmg;
            texts.push(DamageText::new(center, dmg, DamageTextKind::DebuffTick));
        }
        d.elapsed = d.elapsed.saturating_add(1);
        d.duration = d.duration.saturating_sub(1);
    }
    b.debuffs.retain(|d| d.duration > 0);
    b.take_damage(total);
    (b, texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(wave: u32, difficulty: Difficulty) -> PatternContext {
        PatternContext {
            origin: Vec2::new(600.0, 200.0),
            target: Vec2::new(600.0, 700.0),
            wave,
            difficulty,
            now: 0,
            health_fraction: 1.0,
        }
    }

    /// Fire patterns back to back and record the id sequence
    fn pattern_sequence(wave: u32, difficulty: Difficulty, steps: usize) -> Vec<u32> {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = Boss::new(wave, difficulty);
        let mut seq = vec![boss.current_pattern];
        for _ in 0..steps {
            boss.pattern_cooldown = 1;
            boss = advance_boss(&boss, Vec2::new(600.0, 700.0), wave, difficulty, 0, &mut rng).boss;
            seq.push(boss.current_pattern);
        }
        seq
    }

    #[test]
    fn test_sequence_early_waves() {
        assert_eq!(pattern_sequence(1, Difficulty::Normal, 4), vec![0, 1, 2, 0, 1]);
        assert_eq!(pattern_sequence(5, Difficulty::Normal, 5), vec![0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_sequence_mid_waves() {
        assert_eq!(pattern_sequence(10, Difficulty::Normal, 6), vec![0, 1, 2, 3, 4, 5, 0]);
        assert_eq!(pattern_sequence(15, Difficulty::Hard, 8), vec![0, 1, 2, 3, 4, 5, 6, 7, 0]);
    }

    #[test]
    fn test_sequence_final_wave() {
        let normal = pattern_sequence(100, Difficulty::Normal, 10);
        assert_eq!(normal, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let hard = pattern_sequence(100, Difficulty::Hard, 20);
        let expected: Vec<u32> = (0..20).chain(std::iter::once(0)).collect();
        assert_eq!(hard, expected);
    }

    #[test]
    fn test_sequence_is_deterministic() {
        assert_eq!(
            pattern_sequence(100, Difficulty::Hard, 45),
            pattern_sequence(100, Difficulty::Hard, 45)
        );
    }

    #[test]
    fn test_ring_at_wave_one_emits_eight_in_full_circle() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut boss = Boss::new(1, Difficulty::Normal);
        boss.current_pattern = 2;
        boss.pattern_cooldown = 1;
        let step = advance_boss(&boss, Vec2::new(600.0, 700.0), 1, Difficulty::Normal, 0, &mut rng);
        assert_eq!(step.boss.current_pattern, 0);
        assert_eq!(step.spawned.len(), 8);
        assert!(step.boss.is_attacking);
        assert_eq!(step.boss.pattern_cooldown, BossPattern::Ring.cooldown());

        let mut angles: Vec<f32> = step
            .spawned
            .iter()
            .map(|p| p.vel.y.atan2(p.vel.x).rem_euclid(TAU))
            .collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - TAU / 8.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_unknown_pattern_resets_to_zero() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut boss = Boss::new(1, Difficulty::Normal);
        boss.current_pattern = 77;
        boss.pattern_cooldown = 1;
        let step = advance_boss(&boss, Vec2::ZERO, 1, Difficulty::Normal, 0, &mut rng);
        assert_eq!(step.boss.current_pattern, 0);
        assert!(step.spawned.is_empty());
        assert!(!step.boss.is_attacking);

        let next = advance_boss(&step.boss, Vec2::ZERO, 1, Difficulty::Normal, 1, &mut rng);
        assert_eq!(next.spawned.len(), 3);
        assert_eq!(next.boss.current_pattern, 1);
        assert_eq!(next.boss.pattern_cooldown, BossPattern::AimedBurst.cooldown());
    }

    #[test]
    fn test_locked_pattern_resets_to_zero() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut boss = Boss::new(3, Difficulty::Normal);
        boss.current_pattern = 15;
        boss.pattern_cooldown = 1;
        let step = advance_boss(&boss, Vec2::ZERO, 3, Difficulty::Normal, 0, &mut rng);
        assert_eq!(step.boss.current_pattern, 0);
        assert!(step.spawned.is_empty());
    }

    #[test]
    fn test_cooldown_counts_down_without_firing() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut boss = Boss::new(1, Difficulty::Normal);
        boss.pattern_cooldown = 10;
        let step = advance_boss(&boss, Vec2::ZERO, 1, Difficulty::Normal, 0, &mut rng);
        assert_eq!(step.boss.pattern_cooldown, 9);
        assert!(step.spawned.is_empty());
        assert!(!step.boss.is_attacking);
    }

    #[test]
    fn test_hard_patterns_gated() {
        for pattern in BossPattern::ALL {
            let hard = pattern.is_unlocked(100, Difficulty::Hard);
            let normal = pattern.is_unlocked(100, Difficulty::Normal);
            assert!(hard);
            assert_eq!(normal, pattern.id() < 10);
            assert_eq!(pattern.is_unlocked(99, Difficulty::Hard), pattern.id() < 8);
        }
    }

    #[test]
    fn test_every_pattern_emits_bounded_volley() {
        let mut rng = Pcg32::seed_from_u64(5);
        for wave in [1, 50, 100, 10_000] {
            let c = ctx(wave, Difficulty::Hard);
            for pattern in BossPattern::ALL {
                let shots = pattern.emit(&c, &mut rng);
                assert!(!shots.is_empty(), "{pattern:?}");
                assert!(shots.len() <= 64, "{pattern:?} fired {}", shots.len());
                for p in &shots {
                    assert!(!p.from_player);
                    assert!(p.damage <= 120.0 * 1.3 * 1.5);
                    assert!(p.vel.length() <= 9.0 * 1.15 * 1.5 + 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_chaos_escalates_as_health_drops() {
        let mut rng = Pcg32::seed_from_u64(5);
        let full = ctx(100, Difficulty::Normal);
        let low = PatternContext {
            health_fraction: 0.05,
            ..full
        };
        let a = BossPattern::Chaos.emit(&full, &mut rng).len();
        let b = BossPattern::Chaos.emit(&low, &mut rng).len();
        assert!(b > a);
    }

    #[test]
    fn test_stunned_boss_does_not_move() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut boss = Boss::new(1, Difficulty::Normal);
        boss.vel = Vec2::new(2.0, 1.0);
        boss.debuffs.push(Debuff {
            kind: DebuffKind::Stun,
            duration: 30,
            elapsed: 0,
            tick_damage: None,
            slow_amount: None,
            stunned: true,
        });
        let step = advance_boss(&boss, Vec2::ZERO, 1, Difficulty::Normal, 0, &mut rng);
        assert_eq!(step.boss.vel, Vec2::ZERO);
        assert_eq!(step.boss.pos, boss.pos);
    }

    #[test]
    fn test_slow_reduces_wander_distance() {
        let mut boss = Boss::new(1, Difficulty::Normal);
        boss.pos = Vec2::new(500.0, 200.0);
        boss.vel = Vec2::new(2.0, 0.0);
        let mut slowed = boss.clone();
        slowed.debuffs.push(elemental_debuff(Element::Ice, 5.0, 1.0).unwrap());

        // Same seed so both make the same wander decision
        let a = advance_boss(&boss, Vec2::ZERO, 1, Difficulty::Normal, 0, &mut Pcg32::seed_from_u64(4));
        let b = advance_boss(&slowed, Vec2::ZERO, 1, Difficulty::Normal, 0, &mut Pcg32::seed_from_u64(4));
        let moved = (a.boss.pos - boss.pos).length();
        let moved_slow = (b.boss.pos - slowed.pos).length();
        assert!((moved_slow - moved * 0.6).abs() < 1e-3);
    }

    #[test]
    fn test_wander_stays_in_box() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut boss = Boss::new(1, Difficulty::Normal);
        for t in 0..5000 {
            boss = advance_boss(&boss, Vec2::ZERO, 1, Difficulty::Normal, t, &mut rng).boss;
            assert!(boss.pos.x >= BOSS_MIN_X && boss.pos.x <= BOSS_MAX_X);
            assert!(boss.pos.y >= BOSS_MIN_Y && boss.pos.y <= BOSS_MAX_Y);
        }
    }

    #[test]
    fn test_debuffs_tick_and_expire() {
        let boss = Boss::new(1, Difficulty::Normal);
        let burn = Debuff {
            kind: DebuffKind::Burn,
            duration: 60,
            elapsed: 0,
            tick_damage: Some(5.0),
            slow_amount: None,
            stunned: false,
        };
        let mut b = apply_debuff(&boss, burn);
        let mut ticks = 0;
        for _ in 0..60 {
            let (next, texts) = tick_debuffs(&b);
            ticks += texts.len();
            b = next;
        }
        assert!(b.debuffs.is_empty());
        assert_eq!(ticks, 2);
        assert_eq!(b.health, boss.max_health - 10.0);
    }

    #[test]
    fn test_refresh_keeps_tick_schedule() {
        let boss = Boss::new(1, Difficulty::Normal);
        let burn = elemental_debuff(Element::Fire, 10.0, 1.0).unwrap();
        let mut b = apply_debuff(&boss, burn.clone());
        let mut ticks = 0;
        for t in 0..240 {
            if t % 10 == 0 {
                b = apply_debuff(&b, burn.clone());
            }
            let (next, texts) = tick_debuffs(&b);
            ticks += texts.len();
            b = next;
        }
        assert_eq!(ticks, 8);
        assert_eq!(b.debuffs[0].elapsed, 240);
    }

    #[test]
    fn test_apply_debuff_refreshes_same_kind() {
        let boss = Boss::new(1, Difficulty::Normal);
        let weak = elemental_debuff(Element::Fire, 2.0, 1.0).unwrap();
        let strong = elemental_debuff(Element::Fire, 20.0, 0.5).unwrap();
        let b = apply_debuff(&apply_debuff(&boss, weak.clone()), strong);
        assert_eq!(b.debuffs.len(), 1);
        assert_eq!(b.debuffs[0].duration, weak.duration);
        assert_eq!(b.debuffs[0].tick_damage, Some(10.0));

        let b = apply_debuff(&b, elemental_debuff(Element::Ice, 2.0, 1.0).unwrap());
        assert_eq!(b.debuffs.len(), 2);
        assert!(elemental_debuff(Element::Holy, 2.0, 1.0).is_none());
    }
}
