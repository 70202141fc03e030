//! Data-driven game balance
//!
//! Defaults come from [`crate::consts`]; a JSON file may override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance values read by the simulation at world creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Viewport size; the scrollable environment is twice this
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Player ===
    pub player_speed: f32,
    pub player_health: f32,
    pub contact_damage: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_life_ms: f32,
    /// Scaled by the current difficulty multiplier on hit
    pub base_damage: f32,

    // === Enemies ===
    pub enemy_base_speed: f32,
    pub enemy_base_health: f32,
    pub enemy_stop_range: f32,

    // === Difficulty ===
    pub start_multiplier: u32,
    pub start_max_enemy: u32,
    pub spawn_cadence_frames: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            player_speed: PLAYER_SPEED,
            player_health: PLAYER_HEALTH,
            contact_damage: CONTACT_DAMAGE,

            bullet_speed: BULLET_SPEED,
            bullet_life_ms: BULLET_LIFE_MS,
            base_damage: BASE_DAMAGE,

            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_base_health: ENEMY_BASE_HEALTH,
            enemy_stop_range: ENEMY_STOP_RANGE,

            start_multiplier: START_MULTIPLIER,
            start_max_enemy: START_MAX_ENEMY,
            spawn_cadence_frames: SPAWN_CADENCE_FRAMES,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Self = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning file {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Environment extent (2x viewport)
    pub fn environment_size(&self) -> (f32, f32) {
        (self.viewport_width * 2.0, self.viewport_height * 2.0)
    }

    /// Keep values the director divides by or samples ranges from usable
    fn sanitize(&mut self) {
        if self.start_multiplier == 0 {
            log::warn!("start_multiplier must be >= 1, using 1");
            self.start_multiplier = 1;
        }
        if self.start_max_enemy == 0 {
            log::warn!("start_max_enemy must be >= 1, using 1");
            self.start_max_enemy = 1;
        }
    }
}
