//! # Transform — Spatial State and World-Matrix Propagation
//!
//! A [`Transform`] is a hierarchy node's spatial payload: local position,
//! scale, pivot and orientation, plus two cached matrices (local and world)
//! that [`TransformSystem`] recomputes from the roots down once per tick. The
//! matrices are query caches, not authoritative state — mutate the local
//! fields and let the next tick recompose.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::hierarchy::{self, Node};
use super::world::World;

/// Local spatial state for an entity in a transform hierarchy.
///
/// `pivot` is the relative center of orientation and scaling. The composed
/// local matrix is
/// `T(position + pivot) * R(orientation) * S(scale) * T(-pivot / scale)`.
///
/// A zero component in `scale` divides by zero in the pivot term; keeping
/// scale components nonzero is the caller's responsibility, matching the
/// source design. The matrices are not serialized — they are derived state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
    pub pivot: Vec3,
    pub orientation: Quat,
    #[serde(skip)]
    local: Mat4,
    #[serde(skip)]
    world: Mat4,
}

impl Transform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, y, z))
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// The cached local matrix, as of the last composition.
    pub fn local_transform(&self) -> Mat4 {
        self.local
    }

    /// The cached world matrix, as of the last composition.
    pub fn world_transform(&self) -> Mat4 {
        self.world
    }

    /// World-space position of this node's local origin.
    pub fn world_point(&self) -> Vec3 {
        self.world.transform_point3(Vec3::ZERO)
    }

    /// Recompute the local matrix from the authoritative fields.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position + self.pivot)
            * Mat4::from_quat(self.orientation)
            * Mat4::from_scale(self.scale)
            * Mat4::from_translation(-self.pivot / self.scale)
    }

    /// Refresh both caches against the given parent world matrix.
    pub fn compose_transform(&mut self, parent_world: Mat4) {
        self.local = self.local_matrix();
        self.world = parent_world * self.local;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            pivot: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            local: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
        }
    }
}

/// Recomputes every reachable [`Transform`]'s world matrix from the roots
/// down, once per tick.
///
/// Because the walk is strictly pre-order, a node's world matrix is always
/// composed after its parent's within the same pass; no other ordering
/// guarantee is needed. Cost is linear in the number of nodes reachable from
/// roots. Stateless — a fresh [`TransformSystem`] behaves identically.
#[derive(Debug, Default)]
pub struct TransformSystem;

impl TransformSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&mut self, world: &mut World, _dt: f32) {
        // Entity iteration order is arbitrary, so roots are found by looking
        // at each transform's hierarchy link rather than by visit order.
        for entity in world.entities_with::<Transform>() {
            if !hierarchy::is_root(world, entity) {
                continue;
            }
            if let Some(transform) = world.get_mut::<Transform>(entity) {
                transform.compose_transform(Mat4::IDENTITY);
            }
            propagate_subtree(world, entity);
        }
    }
}

impl super::system::System for TransformSystem {
    fn run(&mut self, world: &mut World) {
        let dt = world.resource::<crate::time::Time>().delta_secs();
        self.update(world, dt);
    }
}

/// Pre-order walk of `root`'s subtree, composing each child against its
/// parent's freshly computed world matrix.
///
/// An explicit stack instead of recursion: the visit mutates transforms, so
/// it cannot run under the shared borrow [`hierarchy::descend`] hands out.
/// Children are pushed in reverse so siblings pop in attach order.
fn propagate_subtree(world: &mut World, root: Entity) {
    let root_world = match world.get::<Transform>(root) {
        Some(t) => t.world_transform(),
        None => return,
    };

    let mut stack: Vec<(Entity, Mat4)> = Vec::new();
    push_children(world, root, root_world, &mut stack);

    while let Some((entity, parent_world)) = stack.pop() {
        // A child without a Transform ends composition for its branch but is
        // still skipped safely.
        let Some(transform) = world.get_mut::<Transform>(entity) else {
            continue;
        };
        transform.compose_transform(parent_world);
        let entity_world = transform.world_transform();
        push_children(world, entity, entity_world, &mut stack);
    }
}

fn push_children(
    world: &World,
    parent: Entity,
    parent_world: Mat4,
    stack: &mut Vec<(Entity, Mat4)>,
) {
    if let Some(node) = world.get::<Node>(parent) {
        for &child in node.children().iter().rev() {
            if world.is_alive(child) {
                stack.push((child, parent_world));
            }
        }
    }
}
