//! Hitbox collision detection
//!
//! Hitboxes are axis-aligned rectangles anchored (top-left) at their owner's
//! global position. Tests run a cheap distance cull before the exact overlap
//! check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::scene::{EntityId, Scene};
use crate::consts::BROAD_PHASE_FACTOR;

/// Rectangle tied to a scene entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Entity whose global position anchors the box
    pub owner: EntityId,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(owner: EntityId, width: f32, height: f32) -> Self {
        Self {
            owner,
            width,
            height,
        }
    }

    /// Resolve to a world-space rectangle, or `None` if the owner is gone
    pub fn resolve(&self, scene: &Scene) -> Option<Aabb> {
        scene.global_position(self.owner).map(|min| Aabb {
            min,
            size: Vec2::new(self.width, self.height),
        })
    }
}

/// World-space axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    /// Strict overlap: boxes sharing only an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.min.x + other.size.x
            && self.min.x + self.size.x > other.min.x
            && self.min.y < other.min.y + other.size.y
            && self.min.y + self.size.y > other.min.y
    }
}

/// Check whether two hitboxes overlap.
///
/// The broad phase rejects pairs whose anchors are at least
/// `b.width * 1.5` apart. Only `b`'s width is used, so the test is not
/// symmetric: a wide `a` against a narrow `b` can be culled even when the
/// rectangles overlap. Callers pass the larger box as `b` where it matters.
pub fn is_colliding(scene: &Scene, a: &Hitbox, b: &Hitbox) -> bool {
    let (Some(a_box), Some(b_box)) = (a.resolve(scene), b.resolve(scene)) else {
        return false;
    };

    if a_box.min.distance(b_box.min) >= b.width * BROAD_PHASE_FACTOR {
        return false;
    }

    a_box.overlaps(&b_box)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scene_with(a: Vec2, b: Vec2) -> (Scene, EntityId, EntityId) {
        let mut scene = Scene::new();
        let ea = scene.spawn(None, a, 0.0);
        let eb = scene.spawn(None, b, 0.0);
        (scene, ea, eb)
    }

    #[test]
    fn test_overlapping_boxes_collide() {
        let (scene, ea, eb) = scene_with(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let a = Hitbox::new(ea, 20.0, 20.0);
        let b = Hitbox::new(eb, 20.0, 20.0);
        assert!(is_colliding(&scene, &a, &b));
    }

    #[test]
    fn test_edge_touch_does_not_collide() {
        let (scene, ea, eb) = scene_with(Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0));
        let a = Hitbox::new(ea, 20.0, 20.0);
        let b = Hitbox::new(eb, 20.0, 20.0);
        assert!(!is_colliding(&scene, &a, &b));
    }

    #[test]
    fn test_destroyed_owner_never_collides() {
        let (mut scene, ea, eb) = scene_with(Vec2::ZERO, Vec2::ZERO);
        let a = Hitbox::new(ea, 20.0, 20.0);
        let b = Hitbox::new(eb, 20.0, 20.0);
        assert!(is_colliding(&scene, &a, &b));

        scene.despawn(ea);
        assert!(!is_colliding(&scene, &a, &b));
        assert!(!is_colliding(&scene, &b, &a));
    }

    #[test]
    fn test_broad_phase_is_asymmetric() {
        // A wide box at the origin and a narrow box 40 units right of it:
        // the rectangles overlap, but the cull radius depends on `b`.
        let (scene, wide_id, narrow_id) = scene_with(Vec2::ZERO, Vec2::new(40.0, 0.0));
        let wide = Hitbox::new(wide_id, 100.0, 50.0);
        let narrow = Hitbox::new(narrow_id, 20.0, 20.0);

        // narrow as b: radius 30 < distance 40 -> culled
        assert!(!is_colliding(&scene, &wide, &narrow));
        // wide as b: radius 150 > distance 40 -> overlap test runs
        assert!(is_colliding(&scene, &narrow, &wide));
    }

    #[test]
    fn test_global_position_anchors_box() {
        let mut scene = Scene::new();
        let env = scene.spawn(None, Vec2::new(500.0, 0.0), 0.0);
        let enemy = scene.spawn(Some(env), Vec2::ZERO, 0.0);
        let bullet = scene.spawn(None, Vec2::new(510.0, 10.0), 0.0);

        let enemy_box = Hitbox::new(enemy, 100.0, 50.0);
        let bullet_box = Hitbox::new(bullet, 20.0, 20.0);
        assert!(is_colliding(&scene, &bullet_box, &enemy_box));

        // Scroll the environment away; the enemy follows, the bullet does not
        scene.translate(env, Vec2::new(-300.0, 0.0));
        assert!(!is_colliding(&scene, &bullet_box, &enemy_box));
    }

    proptest! {
        #[test]
        fn positive_overlap_collides(
            s in 5.0f32..100.0,
            fx in 0.0f32..0.95,
            fy in 0.0f32..0.95,
        ) {
            // b is offset by a fraction of the side length, so the squares always share area
            let (scene, ea, eb) = scene_with(Vec2::ZERO, Vec2::new(s * fx, s * fy));
            let a = Hitbox::new(ea, s, s);
            let b = Hitbox::new(eb, s, s);
            prop_assert!(is_colliding(&scene, &a, &b));
        }

        #[test]
        fn edge_contact_never_collides(w in 1.0f32..100.0, h in 1.0f32..100.0, dy in -0.9f32..0.9) {
            let (scene, ea, eb) = scene_with(Vec2::ZERO, Vec2::new(w, dy * h));
            let a = Hitbox::new(ea, w, h);
            let b = Hitbox::new(eb, w, h);
            prop_assert!(!is_colliding(&scene, &a, &b));
        }
    }
}
