//! Projectile movement and expiry
//!
//! Despawning is purely boundary and lifetime based; hit resolution is done
//! by the frame orchestrator.

use glam::Vec2;

use super::collision::overlaps;
use super::state::{Platform, Projectile};
use crate::consts::*;

/// Maximum turn per tick for tracking boss projectiles (radians)
const TRACKING_TURN_RATE: f32 = 0.035;

/// Whether a projectile's position is outside the canvas by more than the margin
pub fn is_offscreen(p: &Projectile) -> bool {
    p.pos.x < -OFFSCREEN_MARGIN
        || p.pos.x > CANVAS_WIDTH + OFFSCREEN_MARGIN
        || p.pos.y < -OFFSCREEN_MARGIN
        || p.pos.y > CANVAS_HEIGHT + OFFSCREEN_MARGIN
}

/// Move every projectile one tick and drop expired ones
pub fn advance_projectiles(projectiles: &[Projectile], slow_active: bool, now: u64) -> Vec<Projectile> {
    projectiles
        .iter()
        .filter(|p| !is_offscreen(p) && !p.is_expired(now))
        .map(|p| {
            let mut next = p.clone();
            let scale = if !p.from_player && slow_active {
                SLOW_FIELD_MULTIPLIER
            } else {
                1.0
            };
            next.pos += next.vel * scale;
            next
        })
        .filter(|p| !is_offscreen(p))
        .collect()
}

/// Bend tracking boss projectiles toward `target`, keeping their speed
pub fn steer_tracking(projectiles: &[Projectile], target: Vec2) -> Vec<Projectile> {
    projectiles
        .iter()
        .map(|p| {
            if !p.tracking || p.from_player {
                return p.clone();
            }
            let speed = p.vel.length();
            let to_target = target - p.center();
            if speed <= f32::EPSILON || to_target.length_squared() <= f32::EPSILON {
                return p.clone();
            }
            let current = p.vel.y.atan2(p.vel.x);
            let desired = to_target.y.atan2(to_target.x);
            let mut delta = desired - current;
            while delta > std::f32::consts::PI {
                delta -= std::f32::consts::TAU;
            }
            while delta < -std::f32::consts::PI {
                delta += std::f32::consts::TAU;
            }
            let angle = current + delta.clamp(-TRACKING_TURN_RATE, TRACKING_TURN_RATE);
            let mut next = p.clone();
            next.vel = crate::angle_to_vec(angle) * speed;
            next
        })
        .collect()
}

/// Whether a projectile overlaps any wall-flagged platform
pub fn hits_wall(p: &Projectile, platforms: &[Platform]) -> bool {
    let body = p.aabb();
    platforms
        .iter()
        .filter(|plat| plat.is_wall)
        .any(|plat| overlaps(&body, &plat.aabb()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet(x: f32, y: f32, vx: f32, from_player: bool) -> Projectile {
        let mut p = Projectile::boss_bullet(Vec2::new(x, y), Vec2::new(vx, 0.0), 10.0, 5.0, 0);
        p.from_player = from_player;
        p
    }

    #[test]
    fn test_offscreen_projectile_pruned() {
        // Spawned at x=-60, past the -50 margin
        let mut p = bullet(0.0, 100.0, 0.0, false);
        p.pos = Vec2::new(-60.0, 100.0);
        assert!(advance_projectiles(&[p], false, 1).is_empty());
    }

    #[test]
    fn test_projectile_moves() {
        let p = bullet(100.0, 100.0, 4.0, false);
        let out = advance_projectiles(&[p.clone()], false, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos.x, p.pos.x + 4.0);
    }

    #[test]
    fn test_slow_field_only_affects_boss_projectiles() {
        let boss = bullet(100.0, 100.0, 4.0, false);
        let mine = bullet(100.0, 200.0, 4.0, true);
        let out = advance_projectiles(&[boss.clone(), mine.clone()], true, 1);
        assert_eq!(out[0].pos.x, boss.pos.x + 4.0 * SLOW_FIELD_MULTIPLIER);
        assert_eq!(out[1].pos.x, mine.pos.x + 4.0);
    }

    #[test]
    fn test_lifetime_expiry() {
        let p = bullet(100.0, 100.0, 1.0, true).with_lifetime(5);
        assert_eq!(advance_projectiles(&[p.clone()], false, 4).len(), 1);
        assert!(advance_projectiles(&[p], false, 5).is_empty());
    }

    #[test]
    fn test_tracking_turns_toward_target() {
        let p = bullet(100.0, 100.0, 5.0, false).with_tracking();
        let out = steer_tracking(&[p], Vec2::new(100.0, 600.0));
        assert!(out[0].vel.y > 0.0);
        assert!((out[0].vel.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_wall_hit_ignores_floor_platforms() {
        let p = bullet(100.0, 100.0, 0.0, false);
        let floor = Platform {
            pos: Vec2::new(90.0, 90.0),
            width: 50.0,
            height: 50.0,
            is_wall: false,
        };
        assert!(!hits_wall(&p, &[floor]));
        let wall = Platform { is_wall: true, ..floor };
        assert!(hits_wall(&p, &[wall]));
    }
}
