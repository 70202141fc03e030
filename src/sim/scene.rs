//! Entity table and transform hierarchy
//!
//! Every positioned entity (environment, player, gun, enemies, bullets) owns a
//! node here keyed by a stable [`EntityId`]. Nodes store only their local
//! transform and parent link; global transforms are composed on demand by
//! walking the parent chain, so nothing is cached on live object references.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::rotate;

/// Stable handle into the scene table
pub type EntityId = u32;

#[derive(Debug, Clone)]
struct Node {
    parent: Option<EntityId>,
    position: Vec2,
    rotation: f32,
}

/// Transform hierarchy (sorted by id for deterministic iteration)
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: BTreeMap<EntityId, Node>,
    next_id: EntityId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Add a node under `parent` (or at the root) and return its id.
    /// A parent that is not in the scene attaches the node to the root.
    pub fn spawn(&mut self, parent: Option<EntityId>, position: Vec2, rotation: f32) -> EntityId {
        let parent = match parent {
            Some(p) if !self.nodes.contains_key(&p) => {
                log::warn!("Spawn under missing parent {}, attaching to root", p);
                None
            }
            other => other,
        };

        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                parent,
                position,
                rotation,
            },
        );
        id
    }

    /// Remove a node and all of its descendants.
    /// Returns false if the node was already gone.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }

        let mut orphans = vec![id];
        while let Some(parent) = orphans.pop() {
            let children: Vec<EntityId> = self
                .nodes
                .iter()
                .filter(|(_, n)| n.parent == Some(parent))
                .map(|(&child, _)| child)
                .collect();
            for child in children {
                self.nodes.remove(&child);
                orphans.push(child);
            }
        }
        true
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Local position relative to the parent
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.nodes.get(&id).map(|n| n.position)
    }

    pub fn set_position(&mut self, id: EntityId, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
        }
    }

    /// Offset the local position
    pub fn translate(&mut self, id: EntityId, delta: Vec2) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position += delta;
        }
    }

    /// Local rotation relative to the parent (radians)
    pub fn rotation(&self, id: EntityId) -> Option<f32> {
        self.nodes.get(&id).map(|n| n.rotation)
    }

    pub fn set_rotation(&mut self, id: EntityId, rotation: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.rotation = rotation;
        }
    }

    /// World-space position, composed along the parent chain
    pub fn global_position(&self, id: EntityId) -> Option<Vec2> {
        let node = self.nodes.get(&id)?;
        let mut pos = node.position;
        let mut cursor = node.parent;
        while let Some(parent_id) = cursor {
            let parent = self.nodes.get(&parent_id)?;
            pos = parent.position + rotate(pos, parent.rotation);
            cursor = parent.parent;
        }
        Some(pos)
    }

    /// World-space rotation, summed along the parent chain
    pub fn global_rotation(&self, id: EntityId) -> Option<f32> {
        let node = self.nodes.get(&id)?;
        let mut rotation = node.rotation;
        let mut cursor = node.parent;
        while let Some(parent_id) = cursor {
            let parent = self.nodes.get(&parent_id)?;
            rotation += parent.rotation;
            cursor = parent.parent;
        }
        Some(rotation)
    }

    /// Convert a world-space point into the local space of `id`
    pub fn to_local(&self, id: EntityId, global: Vec2) -> Option<Vec2> {
        let origin = self.global_position(id)?;
        let rotation = self.global_rotation(id)?;
        Some(rotate(global - origin, -rotation))
    }
}
