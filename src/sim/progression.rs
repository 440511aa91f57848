//! Experience rewards, level-up arithmetic and stat allocation

use super::state::{Player, StatKind};

/// Stat points granted per level
pub const STAT_POINTS_PER_LEVEL: u32 = 3;
const THRESHOLD_GROWTH: f64 = 1.5;

/// Experience for clearing `wave`, after artifact and passive multipliers
pub fn wave_exp_reward(wave: u32, player: &Player) -> u64 {
    let w = wave as f64;
    let base = 100.0 + 50.0 * w + (w.powf(1.3) * 8.0).floor();
    let bonuses = player.bonuses();
    let total = base * bonuses.exp_multiplier as f64 * (1.0 + bonuses.passive_exp as f64 / 100.0);
    total.floor() as u64
}

pub fn can_level_up(player: &Player) -> bool {
    player.experience >= player.experience_to_next_level
}

/// Gain exactly one level, carrying overflow experience
///
/// Callers loop on `can_level_up` to resolve multi-level gains.
pub fn level_up(player: &Player) -> Player {
    let mut p = player.clone();
    p.experience -= p.experience_to_next_level.min(p.experience);
    p.level += 1;
    p.experience_to_next_level = ((p.experience_to_next_level as f64) * THRESHOLD_GROWTH).floor() as u64;
    p.stat_points += STAT_POINTS_PER_LEVEL;
    log::info!("Player reached level {}", p.level);
    p
}

/// Add experience; returns the player and how many levels are now pending
pub fn grant_experience(player: &Player, amount: u64) -> (Player, u32) {
    let mut p = player.clone();
    p.experience = p.experience.saturating_add(amount);
    let mut levels = 0;
    while can_level_up(&p) {
        p = level_up(&p);
        levels += 1;
    }
    (p, levels)
}

/// Spend one stat point; `None` when the player has none left
pub fn allocate_stat_point(player: &Player, stat: StatKind) -> Option<Player> {
    if player.stat_points == 0 {
        return None;
    }
    let mut p = player.clone();
    p.stat_points -= 1;
    p.stats = p.stats.with_added(stat, 1);
    if stat == StatKind::Vitality {
        p.recompute_max_health();
    }
    Some(p)
}
