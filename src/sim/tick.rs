//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. `tick`
//! never touches its input: it clones the previous state and returns the next.

use glam::Vec2;
use rand::Rng;

use super::boss::{advance_boss, apply_debuff, contact_damage, elemental_debuff, tick_debuffs};
use super::collision::overlaps;
use super::kinematics::{KeyState, advance_player};
use super::maps::{GROUND_HEIGHT, random_map};
use super::on_hit::{
    apply_knockback, armor_factor, boss_damage_multiplier, debuff_chance, debuff_duration_multiplier,
    resolve_on_hit, rolls_extra_hit,
};
use super::progression::{grant_experience, wave_exp_reward};
use super::projectile::{advance_projectiles, hits_wall, steer_tracking};
use super::rewards::{apply_reward, generate_reward_options};
use super::state::{
    ActiveEffects, Boss, DamageText, DamageTextKind, GameState, GameStatus, Player, Projectile,
    ProjectileShape,
};
use crate::catalog::{Skill, Weapon, WeaponKind};
use crate::consts::*;
use crate::{angle_between, angle_to_vec};

const CRIT_MULTIPLIER: f32 = 1.5;
const MELEE_HITBOX_TICKS: u32 = 8;
const ARROW_SPEED: f32 = 12.0;
const BOLT_SPEED: f32 = 8.0;
/// Fraction of max health restored when a new wave starts
const WAVE_START_HEAL: f32 = 0.25;
const SCORE_PER_WAVE: u64 = 100;
const DAMAGE_TEXT_DRIFT: f32 = 0.6;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement keys currently held
    pub keys: KeyState,
    pub attack: bool,
    pub dodge: bool,
    /// Equipped skill slot to trigger (0..3)
    pub skill: Option<usize>,
    /// Index into `reward_options` while choosing
    pub reward_choice: Option<usize>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game by one fixed timestep
pub fn tick(state: &GameState, input: &TickInput) -> GameState {
    let mut next = state.clone();
    step(&mut next, input);
    next
}

fn step(state: &mut GameState, input: &TickInput) {
    if input.pause {
        match state.status {
            GameStatus::Playing => {
                state.status = GameStatus::Paused;
                return;
            }
            GameStatus::Paused => state.status = GameStatus::Playing,
            _ => {}
        }
    }

    match state.status {
        GameStatus::Playing => {}
        GameStatus::Choosing => {
            choose_reward(state, input.reward_choice);
            return;
        }
        GameStatus::Menu | GameStatus::Paused | GameStatus::Victory | GameStatus::Defeat => return,
    }

    state.time_ticks += 1;
    let now = state.time_ticks;

    handle_actions(state, input, now);
    state.player = advance_player(&state.player, &input.keys, &state.platforms, &state.effects);

    let boss_step = advance_boss(
        &state.boss,
        state.player.center(),
        state.wave,
        state.difficulty,
        now,
        &mut state.rng,
    );
    state.boss = boss_step.boss;
    state.push_projectiles(boss_step.spawned);

    let (boss, texts) = tick_debuffs(&state.boss);
    state.boss = boss;
    state.damage_texts.extend(texts);

    let steered = steer_tracking(&state.projectiles, state.player.center());
    state.projectiles = advance_projectiles(&steered, state.effects.slow_field_active(), now);

    resolve_collisions(state);
    state.effects.decay();

    if state.player.health <= 0.0 {
        state.status = GameStatus::Defeat;
        log::info!("Defeated on wave {} with score {}", state.wave, state.score);
    } else if state.boss.is_defeated() {
        clear_wave(state);
    }

    age_damage_texts(&mut state.damage_texts);
    state.normalize_order();
}

fn handle_actions(state: &mut GameState, input: &TickInput, now: u64) {
    let player = &mut state.player;
    if input.dodge && player.dodge_cooldown == 0 {
        player.is_dodging = true;
        player.dodge_cooldown = DODGE_COOLDOWN;
    }

    if input.attack && state.player.attack_cooldown == 0 {
        let shots = weapon_attack(&state.player, &state.boss, &state.effects, now);
        state.player.is_attacking = true;
        state.player.attack_cooldown = state.player.attack_interval();
        state.push_projectiles(shots);
    }

    if let Some(slot) = input.skill {
        use_skill(state, slot, now);
    }
}

/// Damage after strength, bonuses and berserker
fn attack_damage(player: &Player, effects: &ActiveEffects, base: f32) -> f32 {
    let strength = 1.0 + player.stats.strength as f32 * 0.02;
    let bonus = 1.0 + player.bonuses().damage / 100.0;
    let berserk = if effects.berserker_active() { 1.5 } else { 1.0 };
    base * strength * bonus * berserk
}

/// Tag a shot with the weapon's element and on-hit identity
fn armed(mut shot: Projectile, weapon: &Weapon) -> Projectile {
    shot.element = weapon.element;
    shot.elemental_damage = weapon.elemental_damage.map(|e| e as f32);
    shot.piercing |= weapon.piercing;
    shot.weapon_id = Some(weapon.id.clone());
    shot
}

/// Melee hitbox in front of the player; passes through and hits once
fn melee_hitbox(player: &Player, reach: f32, damage: f32, lifetime: u32, now: u64) -> Projectile {
    let offset = Vec2::new(player.facing.sign() * (player.width + reach) / 2.0, 0.0);
    let mut hitbox = Projectile::player_shot(
        player.center() + offset,
        Vec2::ZERO,
        Vec2::new(reach, player.height + reach),
        damage,
        now,
    )
    .with_shape(ProjectileShape::Slash)
    .with_lifetime(lifetime);
    hitbox.piercing = true;
    hitbox
}

fn weapon_attack(player: &Player, boss: &Boss, effects: &ActiveEffects, now: u64) -> Vec<Projectile> {
    let weapon = &player.equipped_weapon;
    let damage = attack_damage(player, effects, weapon.damage as f32);
    let origin = player.center();
    let aim = angle_between(origin, boss.center());
    let volley = |speed: f32, size: Vec2, spread: f32, shape: ProjectileShape| -> Vec<Projectile> {
        let n = weapon.shots();
        let half = (n as f32 - 1.0) / 2.0;
        let lifetime = (weapon.range as f32 / speed).ceil() as u32;
        (0..n)
            .map(|i| {
                let angle = aim + (i as f32 - half) * spread;
                Projectile::player_shot(origin, angle_to_vec(angle) * speed, size, damage, now)
                    .with_shape(shape)
                    .with_lifetime(lifetime)
            })
            .collect()
    };

    let shots = match weapon.kind {
        WeaponKind::Melee => vec![melee_hitbox(player, weapon.range as f32, damage, MELEE_HITBOX_TICKS, now)],
        WeaponKind::Ranged => volley(ARROW_SPEED, Vec2::new(20.0, 8.0), 0.08, ProjectileShape::Arrow),
        WeaponKind::Magic => volley(BOLT_SPEED, Vec2::splat(18.0), 0.12, ProjectileShape::Orb),
    };
    shots.into_iter().map(|shot| armed(shot, weapon)).collect()
}

fn use_skill(state: &mut GameState, slot: usize, now: u64) {
    let Some(skill) = state.player.equipped_skills.get(slot).cloned().flatten() else {
        return;
    };
    if !skill.is_ready() {
        return;
    }

    let duration = skill.duration.unwrap_or(0);
    match skill.id.as_str() {
        "iron_skin" => state.effects.shield_ticks = duration,
        "time_slow" => state.effects.slow_field_ticks = duration,
        "berserker" => state.effects.berserker_ticks = duration,
        "second_wind" => {
            let amount = state.player.max_health * skill.heal_fraction.unwrap_or(0.0);
            let healed = state.player.heal(amount);
            state
                .damage_texts
                .push(DamageText::new(state.player.center(), healed, DamageTextKind::Heal));
        }
        _ => {
            let shots = skill_attack(&state.player, &state.boss, &state.effects, &skill, now);
            state.push_projectiles(shots);
        }
    }

    start_cooldown(&mut state.player, &skill);
    log::debug!("Skill {} used at tick {}", skill.id, now);
}

fn start_cooldown(player: &mut Player, skill: &Skill) {
    let owned = player.equipped_skills.iter_mut().flatten().chain(player.skills.iter_mut());
    for s in owned.filter(|s| s.id == skill.id) {
        s.current_cooldown = skill.cooldown;
    }
}

fn skill_attack(player: &Player, boss: &Boss, effects: &ActiveEffects, skill: &Skill, now: u64) -> Vec<Projectile> {
    let damage = attack_damage(player, effects, skill.damage.unwrap_or(0.0));
    let origin = player.center();
    let shots: Vec<Projectile> = match skill.id.as_str() {
        "fireball" => {
            let vel = angle_to_vec(angle_between(origin, boss.center())) * BOLT_SPEED;
            vec![Projectile::player_shot(origin, vel, Vec2::splat(28.0), damage, now).with_shape(ProjectileShape::Meteor)]
        }
        "arrow_rain" => (0..10)
            .map(|i| {
                let from = Vec2::new(boss.center().x + (i as f32 - 4.5) * 14.0, 0.0);
                Projectile::player_shot(from, Vec2::new(0.0, ARROW_SPEED), Vec2::new(8.0, 20.0), damage, now)
                    .with_shape(ProjectileShape::Arrow)
            })
            .collect(),
        "whirlwind" => {
            let mut spin = Projectile::player_shot(origin, Vec2::ZERO, Vec2::splat(player.height * 3.0), damage, now)
                .with_shape(ProjectileShape::Slash)
                .with_lifetime(20);
            spin.piercing = true;
            vec![spin]
        }
        _ => vec![melee_hitbox(player, 120.0, damage, MELEE_HITBOX_TICKS, now)],
    };
    shots
        .into_iter()
        .map(|mut shot| {
            shot.element = skill.element;
            shot.elemental_damage = skill.element.map(|_| (damage * 0.5).floor());
            shot
        })
        .collect()
}

fn resolve_collisions(state: &mut GameState) {
    let projectiles = std::mem::take(&mut state.projectiles);
    let mut kept = Vec::with_capacity(projectiles.len());
    for mut p in projectiles {
        // Stationary hitboxes ignore walls
        if p.vel != Vec2::ZERO && hits_wall(&p, &state.platforms) {
            continue;
        }
        if p.from_player {
            if !p.has_hit && overlaps(&p.aabb(), &state.boss.aabb()) {
                strike_boss(state, &p);
                if !p.piercing {
                    continue;
                }
                p.has_hit = true;
            }
        } else if overlaps(&p.aabb(), &state.player.aabb()) {
            hurt_player(state, p.damage);
            continue;
        }
        kept.push(p);
    }
    state.projectiles = kept;

    if overlaps(&state.player.aabb(), &state.boss.aabb()) {
        hurt_player(state, contact_damage(state.wave, state.difficulty));
    }
}

/// Damage the player unless dodging, shielded or recovering from a hit
fn hurt_player(state: &mut GameState, raw: f32) {
    if state.player.is_invulnerable() || state.effects.shield_active() {
        return;
    }
    let taken = state.player.take_damage(raw);
    state.player.invulnerable_ticks = HIT_IFRAMES;
    state
        .damage_texts
        .push(DamageText::new(state.player.center(), taken, DamageTextKind::PlayerDamage));
}

fn strike_boss(state: &mut GameState, p: &Projectile) {
    let weapon_id = p.weapon_id.as_deref().unwrap_or_default();
    let mut damage = p.damage * boss_damage_multiplier(weapon_id) * armor_factor(weapon_id);
    let crit = state.rng.random_range(0.0f32..100.0) < state.player.crit_chance();
    if crit {
        damage *= CRIT_MULTIPLIER;
    }
    damage += p.elemental_damage.unwrap_or(0.0);
    if rolls_extra_hit(weapon_id, &mut state.rng) {
        damage *= 2.0;
    }
    let damage = damage.floor().max(1.0);

    state.boss.take_damage(damage);
    state.score += damage as u64;
    let kind = if crit {
        DamageTextKind::Critical
    } else {
        DamageTextKind::BossDamage
    };
    state.damage_texts.push(DamageText::new(p.center(), damage, kind));

    if let (Some(element), Some(elemental)) = (p.element, p.elemental_damage)
        && state.rng.random_bool(debuff_chance(weapon_id))
        && let Some(debuff) = elemental_debuff(element, elemental, debuff_duration_multiplier(weapon_id))
    {
        state.boss = apply_debuff(&state.boss, debuff);
    }

    if !weapon_id.is_empty() {
        let outcome = resolve_on_hit(
            weapon_id,
            damage,
            &state.boss,
            &state.player,
            &state.damage_texts,
            &mut state.rng,
        );
        state.player = outcome.player;
        state.damage_texts = outcome.damage_texts;
        let direction = (outcome.boss.center().x - state.player.center().x).signum();
        state.boss = apply_knockback(&outcome.boss, weapon_id, direction);
    }
}

fn clear_wave(state: &mut GameState) {
    let exp = wave_exp_reward(state.wave, &state.player);
    let (player, levels) = grant_experience(&state.player, exp);
    state.player = player;
    state.pending_level_ups += levels;
    state.score += state.wave as u64 * SCORE_PER_WAVE;
    log::info!("Wave {} cleared: +{} exp, {} level(s) gained", state.wave, exp, levels);

    if state.wave >= MAX_WAVE {
        state.status = GameStatus::Victory;
        state.projectiles.clear();
        log::info!("Victory with score {}", state.score);
        return;
    }
    if state.wave % REWARD_WAVE_INTERVAL == 0 {
        state.pending_rewards += 1;
    }
    state.wave += 1;
    start_wave(state);
    open_reward_screen(state);
}

/// Set up the current wave: fresh boss, random map, player back at the spawn point
pub fn start_wave(state: &mut GameState) {
    let (map_index, platforms) = random_map(&mut state.rng);
    state.map_index = map_index;
    state.platforms = platforms;
    state.boss = Boss::new(state.wave, state.difficulty);
    state.projectiles.clear();
    state.damage_texts.clear();
    state.effects = ActiveEffects::default();

    let player = &mut state.player;
    player.pos = Vec2::new(100.0, CANVAS_HEIGHT - GROUND_HEIGHT - player.height);
    player.vel = Vec2::ZERO;
    player.is_jumping = false;
    let heal = player.max_health * WAVE_START_HEAL;
    player.heal(heal);

    log::info!(
        "Wave {} started: boss health {}, map {}",
        state.wave,
        state.boss.max_health,
        state.map_index
    );
}

/// Show a reward screen if any rewards are pending, otherwise resume play
fn open_reward_screen(state: &mut GameState) {
    if state.pending_level_ups + state.pending_rewards == 0 {
        state.reward_options.clear();
        state.status = GameStatus::Playing;
        return;
    }
    state.reward_options = generate_reward_options(&state.player, state.wave, &mut state.rng).to_vec();
    state.status = GameStatus::Choosing;
}

fn choose_reward(state: &mut GameState, choice: Option<usize>) {
    if state.reward_options.is_empty() {
        open_reward_screen(state);
        return;
    }
    let Some(option) = choice.and_then(|i| state.reward_options.get(i)).cloned() else {
        return;
    };
    state.player = apply_reward(&state.player, &option);
    if state.pending_level_ups > 0 {
        state.pending_level_ups -= 1;
    } else {
        state.pending_rewards = state.pending_rewards.saturating_sub(1);
    }
    log::debug!("Reward chosen: {option:?}");
    state.reward_options.clear();
    open_reward_screen(state);
}

fn age_damage_texts(texts: &mut Vec<DamageText>) {
    for text in texts.iter_mut() {
        text.ttl = text.ttl.saturating_sub(1);
        text.pos.y -= DAMAGE_TEXT_DRIFT;
    }
    texts.retain(|t| t.ttl > 0);
}
