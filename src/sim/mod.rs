//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (stored in `GameState`)
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod boss;
pub mod collision;
pub mod kinematics;
pub mod maps;
pub mod on_hit;
pub mod progression;
pub mod projectile;
pub mod rewards;
pub mod state;
pub mod tick;
pub mod weapon_progression;

pub use boss::{BossPattern, BossStep, PatternContext, advance_boss, tick_debuffs};
pub use collision::{Aabb, overlaps};
pub use kinematics::{KeyState, advance_player};
pub use maps::{MAP_COUNT, platforms_for_map, random_map};
pub use on_hit::{OnHitOutcome, resolve_on_hit};
pub use progression::{allocate_stat_point, can_level_up, level_up, wave_exp_reward};
pub use projectile::advance_projectiles;
pub use rewards::{RewardOption, apply_reward, generate_reward_options};
pub use state::{
    ActiveEffects, Boss, DamageText, DamageTextKind, Debuff, DebuffKind, Facing, GameState,
    GameStatus, Platform, Player, Projectile, ProjectileShape, StatKind, Stats,
};
pub use tick::{TickInput, start_wave, tick};
pub use weapon_progression::{can_evolve, can_fuse, evolve, fuse, upgrade};
