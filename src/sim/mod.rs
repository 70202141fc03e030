//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (entities kept in spawn order, scene sorted by id)
//! - Countdowns advanced inside the tick, no host timers
//! - No rendering or platform dependencies

pub mod bullet;
pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod enemy;
pub mod gun;
pub mod player;
pub mod scene;
pub mod spawn_field;
pub mod state;
pub mod tick;

pub use bullet::{Bullet, RemovalCause};
pub use clock::{Clock, Countdown, FrameDelta};
pub use collision::{Aabb, Hitbox, is_colliding};
pub use difficulty::{DifficultyState, Escalation};
pub use enemy::{Enemy, EnemyStats};
pub use gun::Gun;
pub use player::{Controls, Player};
pub use scene::{EntityId, Scene};
pub use spawn_field::{NoiseCell, NoiseField, Perlin};
pub use state::{Environment, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
