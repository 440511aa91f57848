//! Player movement, gravity and platform landing

use super::collision::Aabb;
use super::state::{ActiveEffects, Facing, Platform, Player};
use crate::consts::*;
use serde::{Deserialize, Serialize};

/// Movement keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Horizontal dash multiplier during the dodge invulnerability window
const DODGE_SPEED_MULTIPLIER: f32 = 1.8;

/// Horizontal speed for this player (agility, bonuses, berserker)
pub fn move_speed(player: &Player, effects: &ActiveEffects) -> f32 {
    let agility = 1.0 + player.stats.agility as f32 * 0.02;
    let bonus = 1.0 + player.bonuses().speed / 100.0;
    let berserk = if effects.berserker_active() { 2.0 } else { 1.0 };
    MOVE_SPEED * agility * bonus * berserk
}

/// Advance the player by one tick
pub fn advance_player(
    player: &Player,
    keys: &KeyState,
    platforms: &[Platform],
    effects: &ActiveEffects,
) -> Player {
    let mut p = player.clone();

    let mut speed = move_speed(&p, effects);
    if p.is_dodging && p.dodge_cooldown > DODGE_COOLDOWN - DODGE_IFRAMES {
        speed *= DODGE_SPEED_MULTIPLIER;
    }
    p.vel.x = match (keys.left, keys.right) {
        (true, false) => {
            p.facing = Facing::Left;
            -speed
        }
        (false, true) => {
            p.facing = Facing::Right;
            speed
        }
        _ => 0.0,
    };

    if keys.jump && !p.is_jumping {
        p.vel.y = JUMP_VELOCITY;
        p.is_jumping = true;
    }

    p.vel.y = (p.vel.y + GRAVITY).min(MAX_FALL_SPEED);

    let prev_foot = p.pos.y + p.height;
    p.pos += p.vel;
    p.pos.x = p.pos.x.clamp(0.0, CANVAS_WIDTH - p.width);

    let landed_on = if p.vel.y > 0.0 {
        landing_surface(&p.aabb(), prev_foot, platforms)
    } else {
        None
    };

    match landed_on {
        Some(top) => land(&mut p, top),
        None if p.pos.y + p.height >= CANVAS_HEIGHT => land(&mut p, CANVAS_HEIGHT),
        None => p.is_jumping = true,
    }

    tick_cooldowns(&mut p);
    p
}

/// Top of the highest platform crossed from above this tick
fn landing_surface(body: &Aabb, prev_foot: f32, platforms: &[Platform]) -> Option<f32> {
    let foot = body.max().y;
    platforms
        .iter()
        .filter(|plat| prev_foot <= plat.top() && foot >= plat.top())
        .filter(|plat| body.overlaps_x(&plat.aabb()))
        .map(|plat| plat.top())
        .reduce(f32::min)
}

fn land(p: &mut Player, top: f32) {
    p.pos.y = top - p.height;
    p.vel.y = 0.0;
    p.is_jumping = false;
}

fn tick_cooldowns(p: &mut Player) {
    if p.dodge_cooldown > 0 {
        p.dodge_cooldown -= 1;
        if p.dodge_cooldown == 0 {
            p.is_dodging = false;
        }
    }
    if p.attack_cooldown > 0 {
        p.attack_cooldown -= 1;
        if p.attack_cooldown == 0 {
            p.is_attacking = false;
        }
    }
    p.invulnerable_ticks = p.invulnerable_ticks.saturating_sub(1);
    for skill in p.equipped_skills.iter_mut().flatten() {
        skill.current_cooldown = skill.current_cooldown.saturating_sub(1);
    }
    for skill in &mut p.skills {
        skill.current_cooldown = skill.current_cooldown.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlayerClass;
    use crate::sim::maps::platforms_for_map;
    use glam::Vec2;
    use proptest::prelude::*;

    fn ledge(x: f32, y: f32, w: f32) -> Platform {
        Platform {
            pos: Vec2::new(x, y),
            width: w,
            height: 16.0,
            is_wall: false,
        }
    }

    fn player_at(x: f32, y: f32) -> Player {
        let mut p = Player::new(PlayerClass::Warrior);
        p.pos = Vec2::new(x, y);
        p.vel = Vec2::ZERO;
        p
    }

    #[test]
    fn test_resting_player_stays_on_platform() {
        let plat = ledge(100.0, 500.0, 200.0);
        let mut p = player_at(150.0, 500.0 - PLAYER_HEIGHT);
        for _ in 0..10 {
            p = advance_player(&p, &KeyState::default(), &[plat], &ActiveEffects::default());
            assert_eq!(p.pos.y, 500.0 - PLAYER_HEIGHT);
            assert_eq!(p.vel.y, 0.0);
            assert!(!p.is_jumping);
        }
    }

    #[test]
    fn test_falling_player_lands_without_tunneling() {
        let plat = ledge(100.0, 500.0, 200.0);
        let mut p = player_at(150.0, 500.0 - PLAYER_HEIGHT - 5.0);
        p.vel.y = MAX_FALL_SPEED;
        p.is_jumping = true;
        let p = advance_player(&p, &KeyState::default(), &[plat], &ActiveEffects::default());
        assert_eq!(p.pos.y, 500.0 - PLAYER_HEIGHT);
        assert!(!p.is_jumping);
    }

    #[test]
    fn test_jumping_up_passes_through_platform() {
        let plat = ledge(100.0, 500.0, 200.0);
        // Head just below the ledge, moving up
        let mut p = player_at(150.0, 510.0);
        p.vel.y = JUMP_VELOCITY;
        p.is_jumping = true;
        let next = advance_player(&p, &KeyState::default(), &[plat], &ActiveEffects::default());
        assert!(next.pos.y < p.pos.y);
        assert!(next.is_jumping);
    }

    #[test]
    fn test_canvas_floor_backstop() {
        let mut p = player_at(150.0, CANVAS_HEIGHT - PLAYER_HEIGHT - 1.0);
        p.vel.y = 10.0;
        let p = advance_player(&p, &KeyState::default(), &[], &ActiveEffects::default());
        assert_eq!(p.pos.y, CANVAS_HEIGHT - PLAYER_HEIGHT);
    }

    #[test]
    fn test_horizontal_clamp() {
        let p = player_at(1.0, 100.0);
        let keys = KeyState {
            left: true,
            ..Default::default()
        };
        let p = advance_player(&p, &keys, &[], &ActiveEffects::default());
        assert_eq!(p.pos.x, 0.0);
        assert_eq!(p.facing, Facing::Left);

        let p = player_at(CANVAS_WIDTH - PLAYER_WIDTH - 1.0, 100.0);
        let keys = KeyState {
            right: true,
            ..Default::default()
        };
        let p = advance_player(&p, &keys, &[], &ActiveEffects::default());
        assert_eq!(p.pos.x, CANVAS_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_berserker_doubles_speed() {
        let p = player_at(500.0, 100.0);
        let calm = ActiveEffects::default();
        let berserk = ActiveEffects {
            berserker_ticks: 10,
            ..Default::default()
        };
        assert!((move_speed(&p, &berserk) - 2.0 * move_speed(&p, &calm)).abs() < 1e-4);
    }

    #[test]
    fn test_agility_increases_speed() {
        let mut p = player_at(500.0, 100.0);
        let base = move_speed(&p, &ActiveEffects::default());
        p.stats.agility += 10;
        assert!(move_speed(&p, &ActiveEffects::default()) > base);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let plat = ledge(100.0, 500.0, 200.0);
        let p = player_at(150.0, 500.0 - PLAYER_HEIGHT);
        let keys = KeyState {
            jump: true,
            ..Default::default()
        };
        let p = advance_player(&p, &keys, &[plat], &ActiveEffects::default());
        assert!(p.is_jumping);
        assert!(p.vel.y < 0.0);
        let vy = p.vel.y;
        let p = advance_player(&p, &keys, &[plat], &ActiveEffects::default());
        assert!((p.vel.y - (vy + GRAVITY)).abs() < 1e-5);
    }

    #[test]
    fn test_cooldowns_clear_flags() {
        let mut p = player_at(150.0, 100.0);
        p.is_attacking = true;
        p.attack_cooldown = 1;
        p.is_dodging = true;
        p.dodge_cooldown = 2;
        let p = advance_player(&p, &KeyState::default(), &[], &ActiveEffects::default());
        assert!(!p.is_attacking);
        assert!(p.is_dodging);
        let p = advance_player(&p, &KeyState::default(), &[], &ActiveEffects::default());
        assert!(!p.is_dodging);
    }

    proptest! {
        #[test]
        fn prop_resting_on_any_map_platform_is_stable(map in 0usize..6, pick in 0usize..8, frac in 0.0f32..1.0) {
            let platforms = platforms_for_map(map);
            let plat = platforms[pick % platforms.len()];
            let x = (plat.pos.x + frac * (plat.width - PLAYER_WIDTH).max(0.0)).min(CANVAS_WIDTH - PLAYER_WIDTH);
            let p = player_at(x, plat.top() - PLAYER_HEIGHT);
            let next = advance_player(&p, &KeyState::default(), &platforms, &ActiveEffects::default());
            prop_assert_eq!(next.pos.y, p.pos.y);
            prop_assert!(!next.is_jumping);
        }
    }
}
