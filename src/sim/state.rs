//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::RemovalCause;
use super::difficulty::{DifficultyState, Escalation};
use super::enemy::{Enemy, EnemyStats};
use super::player::Player;
use super::scene::{EntityId, Scene};
use super::spawn_field::NoiseField;
use crate::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player health ran out
    GameOver,
}

/// Something that happened during a tick, for renderers and audio to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired { id: EntityId },
    BulletRemoved { id: EntityId, cause: RemovalCause },
    EnemySpawned { id: EntityId, pos: Vec2 },
    EnemyHit { id: EntityId, damage: f32 },
    EnemyKilled { id: EntityId },
    PlayerDamaged { amount: f32, health: f32 },
    WaveStarted(Escalation),
    GameOver,
}

/// The scrollable world. Its scene node's position is the camera offset;
/// enemies are its children. Bullets live in a separate root-level layer.
#[derive(Debug, Clone, Copy)]
pub struct Environment {
    pub id: EntityId,
    /// Root-level layer holding bullets
    pub projectiles: EntityId,
    pub width: f32,
    pub height: f32,
}

impl Environment {
    pub fn spawn(scene: &mut Scene, width: f32, height: f32) -> Self {
        let id = scene.spawn(None, Vec2::ZERO, 0.0);
        let projectiles = scene.spawn(None, Vec2::ZERO, 0.0);
        Self {
            id,
            projectiles,
            width,
            height,
        }
    }

    /// Current camera scroll
    pub fn camera_offset(&self, scene: &Scene) -> Vec2 {
        scene.position(self.id).unwrap_or(Vec2::ZERO)
    }

    /// Viewport center in screen space, where the player starts
    pub fn viewport_center(&self) -> Vec2 {
        Vec2::new(self.width / 4.0, self.height / 4.0)
    }
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub scene: Scene,
    pub environment: Environment,
    pub player: Player,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
    /// Generated once per session; survives world resets
    pub spawn_field: NoiseField,
    pub difficulty: DifficultyState,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (width, height) = tuning.environment_size();
        let spawn_field = NoiseField::generate(rng.random(), width, height);

        let mut scene = Scene::new();
        let environment = Environment::spawn(&mut scene, width, height);
        let player = Player::spawn(&mut scene, environment.viewport_center(), &tuning);

        let mut state = Self {
            seed,
            difficulty: DifficultyState::from_tuning(&tuning),
            tuning,
            rng,
            scene,
            environment,
            player,
            enemies: Vec::new(),
            spawn_field,
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.spawn_initial_enemy();
        state
    }

    /// Tear down the player, enemies, bullets and environment and rebuild
    /// them. The spawn field is kept; difficulty starts over.
    pub fn reset_world(&mut self) {
        self.player.gun.clear(&mut self.scene);
        self.scene.despawn(self.player.id);
        for enemy in self.enemies.drain(..) {
            self.scene.despawn(enemy.id);
        }
        self.scene.despawn(self.environment.projectiles);
        self.scene.despawn(self.environment.id);

        let (width, height) = self.tuning.environment_size();
        self.environment = Environment::spawn(&mut self.scene, width, height);
        let center = self.environment.viewport_center();
        self.player = Player::spawn(&mut self.scene, center, &self.tuning);
        self.difficulty = DifficultyState::from_tuning(&self.tuning);
        self.phase = GamePhase::Playing;
        self.events.clear();

        self.spawn_initial_enemy();
        log::info!("World reset (seed {})", self.seed);
    }

    /// Place an enemy at an environment-local position
    pub fn spawn_enemy_at(&mut self, local: Vec2, stats: EnemyStats) -> EntityId {
        let id = self.scene.spawn(Some(self.environment.id), local, 0.0);
        self.enemies.push(Enemy::new(id, stats));
        self.events.push(GameEvent::EnemySpawned { id, pos: local });
        log::debug!(
            "Enemy {} spawned at ({:.0}, {:.0}) hp={:.0}",
            id,
            local.x,
            local.y,
            stats.health
        );
        id
    }

    /// Spawn an enemy for the current wave on a positive spawn-field cell
    pub fn spawn_enemy(&mut self) -> EntityId {
        let pos = self.spawn_field.pick_spawn_point(&mut self.rng);
        let stats = self.difficulty.roll_stats(&mut self.rng, &self.tuning);
        let id = self.spawn_enemy_at(pos, stats);
        self.difficulty.record_spawn();
        id
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Spawn field value under a world-space point, following the camera
    pub fn spawn_value_at(&self, global: Vec2) -> f32 {
        let local = self
            .scene
            .to_local(self.environment.id, global)
            .unwrap_or(global);
        self.spawn_field.value_at(local)
    }

    /// Player position in world (screen) space
    pub fn player_position(&self) -> Vec2 {
        self.scene.global_position(self.player.id).unwrap_or(Vec2::ZERO)
    }

    /// The world starts with one base-stat enemy at the environment origin;
    /// it counts toward the first wave
    fn spawn_initial_enemy(&mut self) {
        let stats = EnemyStats {
            speed: self.tuning.enemy_base_speed,
            health: self.tuning.enemy_base_health,
            stop_range: self.tuning.enemy_stop_range,
        };
        self.spawn_enemy_at(Vec2::ZERO, stats);
        self.difficulty.record_spawn();
    }
}
