//! Save/load boundary
//!
//! A session snapshot keeps the progression a player would expect to get
//! back. Transient combat state (projectiles, boss, cooldowns, damage
//! numbers) is never saved and is rebuilt from the saved wave.

pub mod snapshot;

pub use snapshot::{SNAPSHOT_VERSION, SavedWeapon, SessionSnapshot};
