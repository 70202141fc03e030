//! Player controller
//!
//! The player sits in viewport space while the environment scrolls beneath
//! it. Near the middle of the environment, movement input scrolls the camera;
//! once the camera offset reaches a quarter of the environment extent on a
//! side, input moves the player sprite instead, until the sprite reaches the
//! viewport edge. Movement input is inverted (holding "left" produces a
//! positive x change) because it describes how the world moves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::{Countdown, FrameDelta};
use super::collision::Hitbox;
use super::gun::Gun;
use super::scene::{EntityId, Scene};
use super::state::Environment;
use crate::Tuning;
use crate::consts::{FLASH_MS, GUN_OFFSET, PLAYER_HEIGHT, PLAYER_INVULNERABLE_MS, PLAYER_WIDTH};

/// Moving the player sprite runs opposite to the world-scroll change
const AXIS_FLIP: f32 = -1.0;

/// Held movement controls, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

impl Controls {
    /// World-scroll change for these controls: normalized so diagonals are
    /// not faster, then scaled by `speed`
    pub fn change(&self, speed: f32) -> Vec2 {
        let mut change = Vec2::ZERO;
        if self.up {
            change.y += 1.0;
        }
        if self.left {
            change.x += 1.0;
        }
        if self.down {
            change.y -= 1.0;
        }
        if self.right {
            change.x -= 1.0;
        }
        change.normalize_or_zero() * speed
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Scene node at the root, positioned in viewport space
    pub id: EntityId,
    pub speed: f32,
    pub health: f32,
    pub hitbox: Hitbox,
    pub gun: Gun,
    pub controls: Controls,
    /// Half the sprite size; keeps the sprite inside the viewport
    pub half_extents: Vec2,
    flash: Countdown,
    invulnerable: Countdown,
}

impl Player {
    /// Create the player node (and its gun) at a viewport position
    pub fn spawn(scene: &mut Scene, position: Vec2, tuning: &Tuning) -> Self {
        let id = scene.spawn(None, position, 0.0);
        let gun_id = scene.spawn(Some(id), Vec2::ZERO, 0.0);

        Self {
            id,
            speed: tuning.player_speed,
            health: tuning.player_health,
            hitbox: Hitbox::new(id, PLAYER_WIDTH, PLAYER_HEIGHT),
            gun: Gun::new(gun_id, GUN_OFFSET, tuning.bullet_speed, tuning.bullet_life_ms),
            controls: Controls::default(),
            half_extents: Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0),
            flash: Countdown::default(),
            invulnerable: Countdown::default(),
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable.is_running()
    }

    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.flash.is_running()
    }

    pub fn alpha(&self) -> f32 {
        if self.is_flashing() { 0.5 } else { 1.0 }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply damage unless invulnerable. Returns whether damage landed.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health -= amount;
        self.flash.restart(FLASH_MS);
        self.invulnerable.restart(PLAYER_INVULNERABLE_MS);
        true
    }

    /// Fire from the player's global position into the projectile layer
    pub fn fire(&mut self, scene: &mut Scene, layer: EntityId) -> Option<EntityId> {
        let origin = scene.global_position(self.id)?;
        self.gun.spawn_bullet(scene, layer, origin)
    }

    /// Re-aim the gun at a pointer position
    pub fn aim_at(&self, scene: &mut Scene, pointer: Vec2) {
        self.gun.aim_at(scene, pointer);
    }

    /// Advance timers, apply held movement, and advance bullets
    pub fn on_tick(&mut self, scene: &mut Scene, env: &Environment, dt: FrameDelta) {
        self.flash.advance(dt);
        self.invulnerable.advance(dt);

        self.apply_movement(scene, env, dt.scale);

        let bounds = Vec2::new(env.width, env.height);
        self.gun.tick_bullets(scene, bounds, dt);
    }

    /// Boundary-relative movement for one frame
    pub fn apply_movement(&self, scene: &mut Scene, env: &Environment, delta: f32) {
        let change = self.controls.change(self.speed);
        let Some(cam) = scene.position(env.id) else {
            return;
        };

        let within_left = cam.x - env.width / 4.0 < 0.0;
        let within_right = cam.x + env.width / 4.0 > 0.0;
        let within_up = cam.y - env.height / 4.0 < 0.0;
        let within_down = cam.y + env.height / 4.0 > 0.0;

        if !within_left {
            self.bound_move_left(scene, env, change, delta);
        } else if !within_right {
            self.bound_move_right(scene, env, change, delta);
        } else {
            scene.translate(env.id, Vec2::new(change.x * delta, 0.0));
        }

        if !within_up {
            self.bound_move_up(scene, env, change, delta);
        } else if !within_down {
            self.bound_move_down(scene, env, change, delta);
        } else {
            scene.translate(env.id, Vec2::new(0.0, change.y * delta));
        }
    }

    // Near a boundary the axis is flipped so the player moves instead of the world

    fn bound_move_left(&self, scene: &mut Scene, env: &Environment, change: Vec2, delta: f32) {
        let x = self.local_position(scene).x;
        // At the viewport's left edge
        if change.x > 0.0 && x - self.half_extents.x <= 0.0 {
            return;
        }
        // Moving left, or heading back toward center from the left half
        if change.x > 0.0 || (change.x < 0.0 && x <= env.width / 4.0) {
            scene.translate(self.id, Vec2::new(change.x * AXIS_FLIP * delta, 0.0));
        } else {
            scene.translate(env.id, Vec2::new(change.x * delta, 0.0));
        }
    }

    fn bound_move_right(&self, scene: &mut Scene, env: &Environment, change: Vec2, delta: f32) {
        let x = self.local_position(scene).x;
        if change.x < 0.0 && x + self.half_extents.x >= env.width / 2.0 {
            return;
        }
        if change.x < 0.0 || (change.x > 0.0 && x > env.width / 4.0) {
            scene.translate(self.id, Vec2::new(change.x * AXIS_FLIP * delta, 0.0));
        } else {
            scene.translate(env.id, Vec2::new(change.x * delta, 0.0));
        }
    }

    fn bound_move_up(&self, scene: &mut Scene, env: &Environment, change: Vec2, delta: f32) {
        let y = self.local_position(scene).y;
        if change.y > 0.0 && y - self.half_extents.y <= 0.0 {
            return;
        }
        if change.y > 0.0 || (change.y < 0.0 && y < env.height / 4.0) {
            scene.translate(self.id, Vec2::new(0.0, change.y * AXIS_FLIP * delta));
        } else {
            scene.translate(env.id, Vec2::new(0.0, change.y * delta));
        }
    }

    fn bound_move_down(&self, scene: &mut Scene, env: &Environment, change: Vec2, delta: f32) {
        let y = self.local_position(scene).y;
        if change.y < 0.0 && y + self.half_extents.y >= env.height / 2.0 {
            return;
        }
        if change.y < 0.0 || (change.y > 0.0 && y > env.height / 4.0) {
            scene.translate(self.id, Vec2::new(0.0, change.y * AXIS_FLIP * delta));
        } else {
            scene.translate(env.id, Vec2::new(0.0, change.y * delta));
        }
    }

    fn local_position(&self, scene: &Scene) -> Vec2 {
        scene.position(self.id).unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 1600.0;
    const H: f32 = 1200.0;

    fn setup() -> (Scene, Environment, Player) {
        let mut scene = Scene::new();
        let env = Environment::spawn(&mut scene, W, H);
        let tuning = Tuning {
            player_speed: 5.0,
            ..Tuning::default()
        };
        // Viewport center
        let player = Player::spawn(&mut scene, Vec2::new(W / 4.0, H / 4.0), &tuning);
        (scene, env, player)
    }

    #[test]
    fn test_controls_are_normalized() {
        let axial = Controls {
            left: true,
            ..Default::default()
        }
        .change(5.0);
        let diagonal = Controls {
            left: true,
            up: true,
            ..Default::default()
        }
        .change(5.0);

        assert_eq!(axial, Vec2::new(5.0, 0.0));
        assert!((diagonal.length() - 5.0).abs() < 1e-5);
        assert_eq!(Controls::default().change(5.0), Vec2::ZERO);
    }

    #[test]
    fn test_opposing_controls_cancel() {
        let change = Controls {
            left: true,
            right: true,
            up: true,
            down: true,
        }
        .change(5.0);
        assert_eq!(change, Vec2::ZERO);
    }

    #[test]
    fn test_scroll_then_move_then_stop_at_edge() {
        let (mut scene, env, mut player) = setup();
        player.controls.left = true;
        let start = scene.position(player.id).unwrap();

        // Camera scrolls until its offset reaches W/4 (400 / 5 = 80 frames)
        for _ in 0..80 {
            player.apply_movement(&mut scene, &env, 1.0);
        }
        assert_eq!(scene.position(env.id).unwrap().x, W / 4.0);
        assert_eq!(scene.position(player.id).unwrap(), start);

        // Now the sprite moves left instead
        player.apply_movement(&mut scene, &env, 1.0);
        assert_eq!(scene.position(env.id).unwrap().x, W / 4.0);
        assert_eq!(scene.position(player.id).unwrap().x, start.x - 5.0);

        // Walk to the viewport edge: (400 - 25) / 5 = 75 frames in total
        for _ in 0..74 {
            player.apply_movement(&mut scene, &env, 1.0);
        }
        let at_edge = scene.position(player.id).unwrap();
        assert_eq!(at_edge.x, player.half_extents.x);

        // Further input does nothing
        for _ in 0..10 {
            player.apply_movement(&mut scene, &env, 1.0);
        }
        assert_eq!(scene.position(player.id).unwrap(), at_edge);
        assert_eq!(scene.position(env.id).unwrap().x, W / 4.0);
    }

    #[test]
    fn test_returning_moves_sprite_back_to_center_then_scrolls() {
        let (mut scene, env, mut player) = setup();
        player.controls.left = true;
        for _ in 0..90 {
            player.apply_movement(&mut scene, &env, 1.0);
        }
        // 80 frames scrolled, 10 moved the sprite
        assert_eq!(scene.position(player.id).unwrap().x, W / 4.0 - 50.0);

        player.controls = Controls {
            right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            player.apply_movement(&mut scene, &env, 1.0);
        }
        // Sprite back at center; camera untouched
        assert_eq!(scene.position(player.id).unwrap().x, W / 4.0);
        assert_eq!(scene.position(env.id).unwrap().x, W / 4.0);

        // The center check is inclusive, so the sprite takes one more step
        player.apply_movement(&mut scene, &env, 1.0);
        assert_eq!(scene.position(player.id).unwrap().x, W / 4.0 + 5.0);
        assert_eq!(scene.position(env.id).unwrap().x, W / 4.0);

        // Past center, the camera scrolls back and the sprite holds
        for _ in 0..2 {
            player.apply_movement(&mut scene, &env, 1.0);
        }
        assert_eq!(scene.position(player.id).unwrap().x, W / 4.0 + 5.0);
        assert_eq!(scene.position(env.id).unwrap().x, W / 4.0 - 10.0);
    }

    #[test]
    fn test_right_and_vertical_bounds() {
        let (mut scene, env, mut player) = setup();
        player.controls = Controls {
            right: true,
            down: true,
            ..Default::default()
        };
        for _ in 0..5_000 {
            player.apply_movement(&mut scene, &env, 1.0);
        }

        let pos = scene.position(player.id).unwrap();
        let cam = scene.position(env.id).unwrap();
        // Sprite pinned against the bottom-right viewport edge
        assert!(pos.x + player.half_extents.x >= W / 2.0);
        assert!(pos.x + player.half_extents.x < W / 2.0 + player.speed);
        assert!(pos.y + player.half_extents.y >= H / 2.0);
        assert!(pos.y + player.half_extents.y < H / 2.0 + player.speed);
        // Camera stopped just past the bound
        assert!(cam.x <= -W / 4.0 && cam.x > -W / 4.0 - player.speed);
        assert!(cam.y <= -H / 4.0 && cam.y > -H / 4.0 - player.speed);
    }

    #[test]
    fn test_invulnerability_window() {
        let (mut scene, env, mut player) = setup();
        assert!(player.take_damage(10.0));
        assert_eq!(player.health, 90.0);
        assert!(player.is_invulnerable());
        assert_eq!(player.alpha(), 0.5);

        // Ignored while invulnerable
        assert!(!player.take_damage(10.0));
        assert_eq!(player.health, 90.0);

        player.on_tick(&mut scene, &env, FrameDelta::from_ms(150.0));
        assert!(!player.is_flashing());
        assert!(player.is_invulnerable());

        player.on_tick(&mut scene, &env, FrameDelta::from_ms(850.0));
        assert!(!player.is_invulnerable());
        assert!(player.take_damage(10.0));
        assert_eq!(player.health, 80.0);
    }

    #[test]
    fn test_fire_spawns_bullet_from_player() {
        let (mut scene, env, mut player) = setup();
        let pos = scene.global_position(player.id).unwrap();
        player.aim_at(&mut scene, pos + Vec2::new(0.0, -300.0));

        let id = player.fire(&mut scene, env.projectiles).unwrap();
        let bullet_pos = scene.global_position(id).unwrap();
        assert!((bullet_pos.x - pos.x).abs() < 1e-3);
        assert!((bullet_pos.y - (pos.y - GUN_OFFSET)).abs() < 1e-3);
        assert_eq!(player.gun.bullets.len(), 1);
    }

    #[test]
    fn test_invulnerability_ends_after_sixty_nominal_frames() {
        let (mut scene, env, mut player) = setup();
        assert!(player.take_damage(10.0));

        for _ in 0..59 {
            player.on_tick(&mut scene, &env, FrameDelta::NOMINAL);
        }
        assert!(player.is_invulnerable());
        player.on_tick(&mut scene, &env, FrameDelta::NOMINAL);
        assert!(!player.is_invulnerable());
    }
}
