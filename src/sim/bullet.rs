//! Projectiles
//!
//! A bullet travels in a straight line along the rotation it was fired with
//! and counts its remaining life down inside the tick. Every removal path
//! (expiry, leaving the environment, hitting an enemy) only marks the bullet;
//! the owning [`Gun`](super::gun::Gun) sweeps marked bullets once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::{Countdown, FrameDelta};
use super::collision::Hitbox;
use super::scene::{EntityId, Scene};
use crate::consts::{BULLET_BOUNDS_MARGIN, BULLET_SIZE};
use crate::heading;

/// Why a bullet left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Life countdown reached zero
    Expired,
    /// Left the environment bounds
    OutOfBounds,
    /// Struck an enemy
    Hit,
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: EntityId,
    /// Direction of travel, fixed at spawn
    pub rotation: f32,
    pub speed: f32,
    life: Countdown,
    pub hitbox: Hitbox,
    removal: Option<RemovalCause>,
}

impl Bullet {
    pub fn new(id: EntityId, rotation: f32, speed: f32, life_ms: f32) -> Self {
        Self {
            id,
            rotation,
            speed,
            life: Countdown::new(life_ms),
            hitbox: Hitbox::new(id, BULLET_SIZE, BULLET_SIZE),
            removal: None,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.removal.is_none()
    }

    /// Milliseconds until expiry
    pub fn remaining_life(&self) -> f32 {
        self.life.remaining_ms()
    }

    /// Cause recorded by the first removal, if any
    pub fn removal(&self) -> Option<RemovalCause> {
        self.removal
    }

    /// Mark the bullet for removal. Only the first call takes effect;
    /// returns whether this call changed anything.
    pub fn expire(&mut self, cause: RemovalCause) -> bool {
        if self.removal.is_some() {
            return false;
        }
        self.removal = Some(cause);
        true
    }

    /// Advance along the travel direction and count down life
    pub fn on_tick(&mut self, scene: &mut Scene, dt: FrameDelta) {
        if !self.is_alive() {
            return;
        }

        let change = heading(self.rotation).normalize_or_zero() * self.speed;
        scene.translate(self.id, change * dt.scale);

        if self.life.advance(dt) {
            self.expire(RemovalCause::Expired);
        }
    }

    /// True once the bullet's global position is outside the environment
    /// (with a small inset on the near edges). A bullet whose node is gone
    /// counts as out of bounds.
    pub fn is_out_of_bounds(&self, scene: &Scene, bounds: Vec2) -> bool {
        let Some(pos) = scene.global_position(self.id) else {
            return true;
        };
        pos.x <= BULLET_BOUNDS_MARGIN
            || pos.x >= bounds.x
            || pos.y <= BULLET_BOUNDS_MARGIN
            || pos.y >= bounds.y
    }
}
