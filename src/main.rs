//! Scrollshot headless runner
//!
//! Drives the simulation with a simple autopilot at a fixed frame rate and
//! prints a JSON summary of the run.
//!
//! Usage: `scrollshot [seed] [frames] [tuning.json]`

use serde::Serialize;

use scrollshot::Tuning;
use scrollshot::consts::FRAME_MS;
use scrollshot::sim::{Clock, Controls, GameEvent, GamePhase, GameState, TickInput, tick};

/// Frames between autopilot shots
const FIRE_INTERVAL: u64 = 20;
/// Frames spent holding each strafe direction
const STRAFE_FRAMES: u64 = 90;

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    wave: u32,
    multiplier: u32,
    enemies_alive: usize,
    enemies_killed: u32,
    bullets_fired: u32,
    player_health: f32,
    game_over: bool,
}

/// Runner holding the simulation and its clock
struct Runner {
    state: GameState,
    clock: Clock,
    now_ms: f64,
    summary: RunSummary,
}

impl Runner {
    fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            clock: Clock::new(),
            now_ms: 0.0,
            summary: RunSummary {
                seed,
                ..Default::default()
            },
        }
    }

    /// Autopilot: strafe in a slow square and shoot at the nearest enemy
    fn autopilot(&self) -> TickInput {
        let frame = self.state.time_ticks;
        let mut controls = Controls::default();
        match (frame / STRAFE_FRAMES) % 4 {
            0 => controls.left = true,
            1 => controls.up = true,
            2 => controls.right = true,
            _ => controls.down = true,
        }

        let player = self.state.player_position();
        let nearest = self
            .state
            .enemies
            .iter()
            .filter_map(|e| self.state.scene.global_position(e.id))
            .min_by(|a, b| {
                a.distance_squared(player)
                    .partial_cmp(&b.distance_squared(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        TickInput {
            controls,
            fire: nearest.is_some() && frame % FIRE_INTERVAL == 0,
            pointer: nearest,
            pause: false,
        }
    }

    fn step(&mut self) {
        self.now_ms += FRAME_MS as f64;
        let dt = self.clock.advance(self.now_ms);
        let input = self.autopilot();
        tick(&mut self.state, &input, dt);

        for event in &self.state.events {
            match event {
                GameEvent::BulletFired { .. } => self.summary.bullets_fired += 1,
                GameEvent::EnemyKilled { .. } => self.summary.enemies_killed += 1,
                GameEvent::WaveStarted(w) => {
                    log::info!("Reached wave {} (multiplier {})", w.wave, w.multiplier)
                }
                _ => {}
            }
        }
        self.summary.frames += 1;
    }

    fn finish(mut self) -> RunSummary {
        self.summary.wave = self.state.difficulty.wave;
        self.summary.multiplier = self.state.difficulty.multiplier;
        self.summary.enemies_alive = self.state.enemies.len();
        self.summary.player_health = self.state.player.health;
        self.summary.game_over = self.state.phase == GamePhase::GameOver;
        self.summary
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(2024);
    let frames: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60 * 60);
    let tuning = match args.get(3) {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };

    log::info!("Scrollshot (headless) starting: seed={}, frames={}", seed, frames);

    let mut runner = Runner::new(seed, tuning);
    for _ in 0..frames {
        runner.step();
        if runner.state.phase == GamePhase::GameOver {
            break;
        }
    }

    match serde_json::to_string_pretty(&runner.finish()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize run summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; hosts drive `sim::tick` directly
}
