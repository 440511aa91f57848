//! Static platform layouts
//!
//! One of six layouts is picked uniformly at random per wave. Every layout has
//! the full-width ground; wall-flagged platforms also block projectiles.

use glam::Vec2;
use rand::Rng;

use super::state::Platform;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

pub const MAP_COUNT: usize = 6;
pub const GROUND_HEIGHT: f32 = 40.0;

const LEDGE_HEIGHT: f32 = 16.0;

fn ledge(x: f32, y: f32, width: f32) -> Platform {
    Platform {
        pos: Vec2::new(x, y),
        width,
        height: LEDGE_HEIGHT,
        is_wall: false,
    }
}

fn wall(x: f32, y: f32, width: f32, height: f32) -> Platform {
    Platform {
        pos: Vec2::new(x, y),
        width,
        height,
        is_wall: true,
    }
}

fn ground() -> Platform {
    Platform {
        pos: Vec2::new(0.0, CANVAS_HEIGHT - GROUND_HEIGHT),
        width: CANVAS_WIDTH,
        height: GROUND_HEIGHT,
        is_wall: false,
    }
}

/// Platforms for a layout index (out-of-range indices wrap)
pub fn platforms_for_map(index: usize) -> Vec<Platform> {
    let mut platforms = vec![ground()];
    match index % MAP_COUNT {
        // Open arena
        0 => {
            platforms.push(ledge(200.0, 600.0, 200.0));
            platforms.push(ledge(800.0, 600.0, 200.0));
        }
        // Staircase
        1 => {
            platforms.push(ledge(100.0, 650.0, 160.0));
            platforms.push(ledge(320.0, 560.0, 160.0));
            platforms.push(ledge(540.0, 470.0, 160.0));
            platforms.push(ledge(760.0, 560.0, 160.0));
            platforms.push(ledge(980.0, 650.0, 160.0));
        }
        // Twin towers: cover pillars that soak bullets
        2 => {
            platforms.push(wall(300.0, 560.0, 40.0, 200.0));
            platforms.push(wall(860.0, 560.0, 40.0, 200.0));
            platforms.push(ledge(250.0, 540.0, 140.0));
            platforms.push(ledge(810.0, 540.0, 140.0));
        }
        // Floating islands
        3 => {
            platforms.push(ledge(80.0, 620.0, 120.0));
            platforms.push(ledge(320.0, 520.0, 120.0));
            platforms.push(ledge(540.0, 610.0, 120.0));
            platforms.push(ledge(760.0, 520.0, 120.0));
            platforms.push(ledge(1000.0, 620.0, 120.0));
        }
        // Bunker: low wall in the middle
        4 => {
            platforms.push(wall(560.0, 680.0, 80.0, 80.0));
            platforms.push(ledge(150.0, 580.0, 220.0));
            platforms.push(ledge(830.0, 580.0, 220.0));
        }
        // Fortress: two shields and a high bridge
        _ => {
            platforms.push(wall(180.0, 640.0, 30.0, 120.0));
            platforms.push(wall(990.0, 640.0, 30.0, 120.0));
            platforms.push(ledge(400.0, 520.0, 400.0));
        }
    }
    platforms
}

/// Pick a layout uniformly at random
pub fn random_map(rng: &mut impl Rng) -> (usize, Vec<Platform>) {
    let index = rng.random_range(0..MAP_COUNT);
    (index, platforms_for_map(index))
}
