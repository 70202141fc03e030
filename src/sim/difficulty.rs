//! Wave and difficulty progression
//!
//! Each wave spawns up to `max_enemy` enemies at a cadence that speeds up with
//! the multiplier. Once that many have been killed, the wave escalates: both
//! `max_enemy` and `multiplier` grow by the current multiplier (so the
//! multiplier doubles) and the per-wave counters reset.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyStats;
use crate::Tuning;

/// Outcome of a wave escalation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    /// Index of the wave that just started
    pub wave: u32,
    pub multiplier: u32,
    pub max_enemy: u32,
    /// Added to the player's speed
    pub player_speed_bonus: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    pub multiplier: u32,
    /// Enemies to spawn (and kill) this wave
    pub max_enemy: u32,
    pub spawned_this_wave: u32,
    pub killed_this_wave: u32,
    /// Frames since the last spawn
    pub frames_since_spawn: u32,
    /// Current wave index (0-based)
    pub wave: u32,
}

impl DifficultyState {
    pub fn new(multiplier: u32, max_enemy: u32) -> Self {
        Self {
            multiplier: multiplier.max(1),
            max_enemy,
            spawned_this_wave: 0,
            killed_this_wave: 0,
            frames_since_spawn: 0,
            wave: 0,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.start_multiplier, tuning.start_max_enemy)
    }

    /// Frames that must pass between spawns at the current multiplier
    pub fn spawn_interval(&self, cadence_frames: f32) -> f32 {
        cadence_frames / self.multiplier as f32
    }

    /// Count one frame toward the next spawn
    pub fn advance_frame(&mut self) {
        self.frames_since_spawn = self.frames_since_spawn.saturating_add(1);
    }

    /// Whether the wave still has enemies to send and the cadence has elapsed
    pub fn should_spawn(&self, cadence_frames: f32) -> bool {
        self.spawned_this_wave < self.max_enemy
            && self.frames_since_spawn as f32 > self.spawn_interval(cadence_frames)
    }

    /// Roll stats for a new enemy at the current multiplier
    pub fn roll_stats(&self, rng: &mut impl Rng, tuning: &Tuning) -> EnemyStats {
        let m = self.multiplier as f32;
        EnemyStats {
            health: (tuning.enemy_base_health * rng.random_range(0.0..m)).max(1.0),
            speed: tuning.enemy_base_speed + rng.random_range(0.0..m / 10.0),
            stop_range: tuning.enemy_stop_range,
        }
    }

    pub fn record_spawn(&mut self) {
        self.spawned_this_wave += 1;
        self.frames_since_spawn = 0;
    }

    pub fn record_kill(&mut self) {
        self.killed_this_wave += 1;
    }

    pub fn wave_cleared(&self) -> bool {
        self.killed_this_wave >= self.max_enemy
    }

    /// Start the next wave if this one is cleared
    pub fn escalate(&mut self) -> Option<Escalation> {
        if !self.wave_cleared() {
            return None;
        }

        self.max_enemy += self.multiplier;
        self.multiplier += self.multiplier;
        self.spawned_this_wave = 0;
        self.killed_this_wave = 0;
        self.wave += 1;

        Some(Escalation {
            wave: self.wave,
            multiplier: self.multiplier,
            max_enemy: self.max_enemy,
            player_speed_bonus: self.multiplier as f32 / 10.0,
        })
    }

    /// Bullet damage scales with the multiplier
    pub fn bullet_damage(&self, base_damage: f32) -> f32 {
        base_damage * self.multiplier as f32
    }
}
