//! The player's gun: aim tracking, bullet spawning, and the live bullet list

use glam::Vec2;

use super::bullet::{Bullet, RemovalCause};
use super::clock::FrameDelta;
use super::scene::{EntityId, Scene};
use crate::{angle_towards, heading};

#[derive(Debug, Clone)]
pub struct Gun {
    /// Scene node (child of the player); its rotation is the aim angle
    pub id: EntityId,
    /// Muzzle distance from the firing origin along the aim
    pub offset: f32,
    pub bullet_speed: f32,
    pub bullet_life_ms: f32,
    /// Live bullets in spawn order (front = oldest)
    pub bullets: Vec<Bullet>,
}

impl Gun {
    pub fn new(id: EntityId, offset: f32, bullet_speed: f32, bullet_life_ms: f32) -> Self {
        Self {
            id,
            offset,
            bullet_speed,
            bullet_life_ms,
            bullets: Vec::new(),
        }
    }

    /// Current aim angle (radians)
    pub fn rotation(&self, scene: &Scene) -> f32 {
        scene.global_rotation(self.id).unwrap_or(0.0)
    }

    /// Point the gun at a world-space pointer position
    pub fn aim_at(&self, scene: &mut Scene, pointer: Vec2) {
        let Some(origin) = scene.global_position(self.id) else {
            return;
        };
        let parent_rotation = scene
            .parent(self.id)
            .and_then(|p| scene.global_rotation(p))
            .unwrap_or(0.0);
        scene.set_rotation(self.id, angle_towards(origin, pointer) - parent_rotation);
    }

    /// Spawn a bullet at the muzzle (`origin` pushed out by `offset` along the
    /// aim) into `layer`. Returns `None` if the gun has been destroyed.
    pub fn spawn_bullet(
        &mut self,
        scene: &mut Scene,
        layer: EntityId,
        origin: Vec2,
    ) -> Option<EntityId> {
        if !scene.contains(self.id) {
            return None;
        }

        let rotation = self.rotation(scene);
        let muzzle = origin + heading(rotation) * self.offset;
        let local = scene.to_local(layer, muzzle).unwrap_or(muzzle);
        let id = scene.spawn(Some(layer), local, rotation);

        self.bullets
            .push(Bullet::new(id, rotation, self.bullet_speed, self.bullet_life_ms));
        Some(id)
    }

    /// Cull bullets outside `bounds`, then advance the rest
    pub fn tick_bullets(&mut self, scene: &mut Scene, bounds: Vec2, dt: FrameDelta) {
        for bullet in self.bullets.iter_mut().filter(|b| b.is_alive()) {
            if bullet.is_out_of_bounds(scene, bounds) {
                bullet.expire(RemovalCause::OutOfBounds);
                continue;
            }
            bullet.on_tick(scene, dt);
        }
    }

    /// Remove every marked bullet from the list and the scene.
    /// Each bullet is reported exactly once.
    pub fn sweep(&mut self, scene: &mut Scene) -> Vec<(EntityId, RemovalCause)> {
        let mut removed = Vec::new();
        self.bullets.retain(|b| match b.removal() {
            Some(cause) => {
                scene.despawn(b.id);
                removed.push((b.id, cause));
                false
            }
            None => true,
        });
        removed
    }

    /// Despawn every bullet (world reset)
    pub fn clear(&mut self, scene: &mut Scene) {
        for bullet in self.bullets.drain(..) {
            scene.despawn(bullet.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BULLET_LIFE_MS, COUNTDOWN_EPSILON_MS};
    use proptest::prelude::*;
    use std::f32::consts::PI;

    fn setup() -> (Scene, EntityId, Gun) {
        let mut scene = Scene::new();
        let layer = scene.spawn(None, Vec2::ZERO, 0.0);
        let player = scene.spawn(None, Vec2::new(10_000.0, 10_000.0), 0.0);
        let gun_id = scene.spawn(Some(player), Vec2::ZERO, 0.0);
        (scene, layer, Gun::new(gun_id, 100.0, 10.0, 5000.0))
    }

    #[test]
    fn test_aim_tracks_pointer() {
        let (mut scene, _, gun) = setup();
        gun.aim_at(&mut scene, Vec2::new(10_000.0, 10_500.0));
        assert!((gun.rotation(&scene) - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_bullet_spawns_at_muzzle() {
        let (mut scene, layer, mut gun) = setup();
        gun.aim_at(&mut scene, Vec2::new(0.0, 10_000.0)); // aim left
        let origin = scene.global_position(gun.id).unwrap();
        let id = gun.spawn_bullet(&mut scene, layer, origin).unwrap();

        let pos = scene.global_position(id).unwrap();
        assert!((pos.x - 9_900.0).abs() < 1e-2);
        assert!((pos.y - 10_000.0).abs() < 1e-2);
        assert!((gun.bullets[0].rotation.abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn test_bullets_keep_spawn_order() {
        let (mut scene, layer, mut gun) = setup();
        let origin = Vec2::new(10_000.0, 10_000.0);
        let first = gun.spawn_bullet(&mut scene, layer, origin).unwrap();
        let second = gun.spawn_bullet(&mut scene, layer, origin).unwrap();
        assert_eq!(gun.bullets[0].id, first);
        assert_eq!(gun.bullets[1].id, second);
    }

    #[test]
    fn test_destroyed_gun_does_not_fire() {
        let (mut scene, layer, mut gun) = setup();
        scene.despawn(gun.id);
        assert!(gun.spawn_bullet(&mut scene, layer, Vec2::ZERO).is_none());
        assert!(gun.bullets.is_empty());
    }

    #[test]
    fn test_out_of_bounds_bullet_swept_once() {
        let (mut scene, layer, mut gun) = setup();
        let id = gun.spawn_bullet(&mut scene, layer, Vec2::new(5.0, 5.0)).unwrap();
        // Bounds smaller than the bullet's position
        gun.tick_bullets(&mut scene, Vec2::new(50.0, 50.0), FrameDelta::NOMINAL);

        let removed = gun.sweep(&mut scene);
        assert_eq!(removed, vec![(id, RemovalCause::OutOfBounds)]);
        assert!(!scene.contains(id));
        assert!(gun.sweep(&mut scene).is_empty());
    }

    #[test]
    fn test_hit_and_expiry_same_frame_removes_once() {
        let (mut scene, layer, mut gun) = setup();
        gun.bullet_life_ms = 10.0;
        let id = gun
            .spawn_bullet(&mut scene, layer, Vec2::new(10_000.0, 10_000.0))
            .unwrap();

        // Expires during this tick...
        let bounds = Vec2::new(20_000.0, 20_000.0);
        gun.tick_bullets(&mut scene, bounds, FrameDelta::from_ms(20.0));
        // ...and is also struck before the sweep
        gun.bullets[0].expire(RemovalCause::Hit);

        let removed = gun.sweep(&mut scene);
        assert_eq!(removed, vec![(id, RemovalCause::Expired)]);
        assert!(gun.bullets.is_empty());
    }

    proptest! {
        #[test]
        fn life_runs_out_after_exact_elapsed_time(
            dt in prop_oneof![
                Just(FrameDelta::NOMINAL),
                (1u32..=50).prop_map(|ms| FrameDelta::from_ms(ms as f32)),
                (0.25f32..6.0).prop_map(FrameDelta::from_scale),
            ]
        ) {
            let (mut scene, layer, mut gun) = setup();
            let id = gun
                .spawn_bullet(&mut scene, layer, Vec2::new(10_000.0, 10_000.0))
                .unwrap();
            let bounds = Vec2::new(20_000.0, 20_000.0);
            let life = BULLET_LIFE_MS as f64;

            let mut elapsed = 0.0f64;
            let mut removals = 0;
            let mut removed_after = None;
            let mut last_life = gun.bullets[0].remaining_life();

            while removals == 0 && elapsed < life + 10.0 * dt.ms as f64 {
                let before = elapsed;
                elapsed += dt.ms as f64;
                gun.tick_bullets(&mut scene, bounds, dt);
                if let Some(b) = gun.bullets.first() {
                    prop_assert!(b.remaining_life() < last_life);
                    last_life = b.remaining_life();
                }
                for (removed_id, cause) in gun.sweep(&mut scene) {
                    prop_assert_eq!(removed_id, id);
                    prop_assert_eq!(cause, RemovalCause::Expired);
                    removals += 1;
                    removed_after = Some((before, elapsed));
                }
            }

            prop_assert_eq!(removals, 1);
            prop_assert!(gun.bullets.is_empty());
            // Removed on the first tick whose elapsed time reaches the life
            let (before, after) = removed_after.unwrap();
            prop_assert!(after + COUNTDOWN_EPSILON_MS >= life);
            prop_assert!(before + COUNTDOWN_EPSILON_MS < life);
        }
    }

    #[test]
    fn test_nominal_frames_expire_on_tick_300() {
        let (mut scene, layer, mut gun) = setup();
        let id = gun
            .spawn_bullet(&mut scene, layer, Vec2::new(10_000.0, 10_000.0))
            .unwrap();
        let bounds = Vec2::new(20_000.0, 20_000.0);

        for _ in 0..299 {
            gun.tick_bullets(&mut scene, bounds, FrameDelta::NOMINAL);
            assert!(gun.sweep(&mut scene).is_empty());
        }
        gun.tick_bullets(&mut scene, bounds, FrameDelta::NOMINAL);
        assert_eq!(gun.sweep(&mut scene), vec![(id, RemovalCause::Expired)]);
    }
}
