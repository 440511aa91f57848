//! Boss Rush headless runner
//!
//! Drives the simulation with a simple autopilot for soak testing and
//! prints a JSON summary of the run.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use boss_rush::catalog::PlayerClass;
use boss_rush::persistence::SessionSnapshot;
use boss_rush::sim::{GameState, GameStatus, KeyState, TickInput, tick};
use boss_rush::{Difficulty, Settings};

#[derive(Parser, Debug)]
#[command(name = "boss-rush")]
#[command(about = "Headless autopilot runner for the Boss Rush combat core")]
struct Cli {
    /// Run seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum frames to simulate
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,
    #[arg(long, value_enum)]
    difficulty: Option<CliDifficulty>,
    #[arg(long, value_enum)]
    class: Option<CliClass>,
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Resume from a session snapshot
    #[arg(long)]
    load: Option<PathBuf>,
    /// Write a session snapshot when the run ends
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliDifficulty {
    Normal,
    Hard,
}

impl From<CliDifficulty> for Difficulty {
    fn from(value: CliDifficulty) -> Self {
        match value {
            CliDifficulty::Normal => Difficulty::Normal,
            CliDifficulty::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliClass {
    Warrior,
    Archer,
    Mage,
}

impl From<CliClass> for PlayerClass {
    fn from(value: CliClass) -> Self {
        match value {
            CliClass::Warrior => PlayerClass::Warrior,
            CliClass::Archer => PlayerClass::Archer,
            CliClass::Mage => PlayerClass::Mage,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    status: GameStatus,
    class: PlayerClass,
    difficulty: Difficulty,
    wave: u32,
    score: u64,
    level: u32,
    health: f32,
    max_health: f32,
    weapon: String,
    weapon_level: u32,
    skills: Vec<String>,
    artifacts: Vec<String>,
}

impl RunSummary {
    fn from_state(state: &GameState) -> Self {
        let p = &state.player;
        Self {
            seed: state.seed,
            ticks: state.time_ticks,
            status: state.status,
            class: p.class,
            difficulty: state.difficulty,
            wave: state.wave,
            score: state.score,
            level: p.level,
            health: p.health,
            max_health: p.max_health,
            weapon: p.equipped_weapon.id.clone(),
            weapon_level: p.equipped_weapon.upgrade_level,
            skills: p.skills.iter().map(|s| s.id.clone()).collect(),
            artifacts: p.artifacts.iter().map(|a| a.id.clone()).collect(),
        }
    }
}

/// Preferred horizontal distance from the boss per weapon style
fn preferred_distance(state: &GameState) -> f32 {
    (state.player.equipped_weapon.range as f32).clamp(60.0, 400.0) * 0.6
}

/// Chase the boss horizontally, attack constantly, dodge incoming bullets
fn autopilot(state: &GameState) -> TickInput {
    if state.status == GameStatus::Choosing {
        return TickInput {
            reward_choice: Some(0),
            ..Default::default()
        };
    }

    let player = state.player.center();
    let boss = state.boss.center();
    let dx = boss.x - player.x;
    let keep = preferred_distance(state);
    let keys = KeyState {
        left: dx < -keep,
        right: dx > keep,
        jump: !state.player.is_jumping && boss.y < player.y - 200.0 && state.time_ticks % 40 == 0,
    };

    let threatened = state.projectiles.iter().any(|p| {
        !p.from_player && p.vel.y > 0.0 && p.center().distance(player) < 90.0
    });

    let skill = state
        .player
        .equipped_skills
        .iter()
        .position(|s| s.as_ref().is_some_and(|s| !s.is_passive && s.is_ready()));

    TickInput {
        keys,
        attack: true,
        dodge: threatened && state.player.dodge_cooldown == 0,
        skill,
        reward_choice: None,
        pause: false,
    }
}

fn load_state(cli: &Cli) -> Result<GameState> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        settings.difficulty = difficulty.into();
    }
    if let Some(class) = cli.class {
        settings.player_class = class.into();
    }
    let seed = cli.seed.or(settings.seed).unwrap_or_else(rand::random);

    match &cli.load {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read snapshot {}", path.display()))?;
            let snapshot = SessionSnapshot::from_json(&json)
                .map_err(|e| anyhow!("invalid snapshot {}: {e}", path.display()))?;
            Ok(snapshot.restore(seed))
        }
        None => Ok(GameState::new(seed, &settings)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut state = load_state(&cli)?;
    log::info!(
        "Starting run: seed {}, {} {}, wave {}",
        state.seed,
        state.player.class.as_str(),
        state.difficulty.as_str(),
        state.wave
    );

    for _ in 0..cli.ticks {
        if matches!(state.status, GameStatus::Victory | GameStatus::Defeat) {
            break;
        }
        let input = autopilot(&state);
        state = tick(&state, &input);
    }

    log::info!("Run ended: {:?} at wave {}, score {}", state.status, state.wave, state.score);

    if let Some(path) = &cli.save {
        let json = SessionSnapshot::capture(&state)
            .to_json()
            .context("failed to serialize snapshot")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Saved snapshot to {}", path.display());
    }

    let summary = serde_json::to_string_pretty(&RunSummary::from_state(&state))?;
    println!("{summary}");
    Ok(())
}
