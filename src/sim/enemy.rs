//! Pursuing enemies
//!
//! Enemies live inside the environment, so their global position scrolls with
//! the camera. Each tick they turn toward the target and close in until they
//! are within `stop_range`, then hold position while still tracking it.

use glam::Vec2;

use super::clock::{Countdown, FrameDelta};
use super::collision::Hitbox;
use super::scene::{EntityId, Scene};
use crate::consts::{ENEMY_HEIGHT, ENEMY_WIDTH, FLASH_MS};
use crate::{angle_towards, heading};

/// Stats rolled by the difficulty director at spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub health: f32,
    /// Distance at which pursuit halts
    pub stop_range: f32,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub speed: f32,
    pub health: f32,
    pub stop_range: f32,
    pub hitbox: Hitbox,
    /// Hit flash; rendered at half opacity while running
    pub flash: Countdown,
}

impl Enemy {
    pub fn new(id: EntityId, stats: EnemyStats) -> Self {
        Self {
            id,
            speed: stats.speed,
            health: stats.health,
            stop_range: stats.stop_range,
            hitbox: Hitbox::new(id, ENEMY_WIDTH, ENEMY_HEIGHT),
            flash: Countdown::default(),
        }
    }

    /// Health has run out; the tick sweeps it on the next frame
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.flash.is_running()
    }

    /// Opacity the renderer should draw this enemy at
    pub fn alpha(&self) -> f32 {
        if self.is_flashing() { 0.5 } else { 1.0 }
    }

    /// Rotate to face a world-space point
    pub fn look_at(&self, scene: &mut Scene, target: Vec2) {
        if let Some(pos) = scene.global_position(self.id) {
            scene.set_rotation(self.id, angle_towards(pos, target));
        }
    }

    /// Step forward along the current rotation
    pub fn move_to_point(&self, scene: &mut Scene, dt: FrameDelta) {
        let Some(rotation) = scene.rotation(self.id) else {
            return;
        };
        let change = heading(rotation).normalize_or_zero() * self.speed;
        scene.translate(self.id, change * dt.scale);
    }

    /// Distance from this enemy's global position to a world-space point
    pub fn distance_to(&self, scene: &Scene, target: Vec2) -> Option<f32> {
        scene.global_position(self.id).map(|pos| pos.distance(target))
    }

    /// Track and pursue `target`, holding position once within `stop_range`
    pub fn on_tick(&mut self, scene: &mut Scene, target: Vec2, dt: FrameDelta) {
        self.flash.advance(dt);

        if !scene.contains(self.id) {
            return;
        }

        self.look_at(scene, target);

        match self.distance_to(scene, target) {
            Some(d) if d > self.stop_range => self.move_to_point(scene, dt),
            _ => {}
        }
    }

    /// Subtract health and start the hit flash. Health may go negative.
    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
        self.flash.restart(FLASH_MS);
    }
}
