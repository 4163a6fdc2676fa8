//! # World — The Central Container
//!
//! The [`World`] owns all entities, their components, and a bag of singleton
//! resources. It is the single shared mutable resource of a tick: systems take
//! `&mut World`, run to completion, and hand it back.
//!
//! ## Layout
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │ World                                             │
//! │                                                   │
//! │  EntityAllocator: slot + generation lifecycle     │
//! │                                                   │
//! │  columns: HashMap<TypeId, Box<dyn AnyColumn>>     │
//! │    one sparse column per component type           │
//! │    column = map of entity index → component       │
//! │                                                   │
//! │  resources: HashMap<TypeId, Box<dyn Any>>         │
//! │    singletons not tied to an entity (e.g. Time)   │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Absence is not an error
//!
//! Every accessor that takes an [`Entity`] tolerates a stale handle:
//! [`get`](World::get) returns `None`, [`insert`](World::insert) becomes a
//! logged no-op, [`despawn`](World::despawn) returns `false`. Callers treat
//! absence as "skip this entity", which is what the per-tick systems in this
//! crate do.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::component::{AnyColumn, Column};
use super::entity::{Entity, EntityAllocator};

/// The central container for entities, components, and resources.
pub struct World {
    allocator: EntityAllocator,
    /// One column per component type, keyed by `TypeId`.
    columns: HashMap<TypeId, Box<dyn AnyColumn>>,
    /// Global resources (singletons), keyed by `TypeId`.
    resources: HashMap<TypeId, Box<dyn Any>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            columns: HashMap::new(),
            resources: HashMap::new(),
        }
    }

    // ── Spawn / Despawn ──────────────────────────────────────────────

    /// Spawn an entity with no components.
    pub fn spawn_empty(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Spawn an entity with a bundle of components (a tuple).
    ///
    /// # Example
    ///
    /// ```ignore
    /// let e = world.spawn((Transform::default(), VerletBody::new(Vec3::ZERO)));
    /// ```
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Entity {
        let entity = self.allocator.allocate();
        bundle.store_into(self, entity);
        entity
    }

    /// Spawn an entity with a single component — no tuple wrapping needed.
    pub fn spawn_one<T: 'static + Send + Sync>(&mut self, component: T) -> Entity {
        self.spawn((component,))
    }

    /// Despawn an entity, dropping all of its components and freeing its slot
    /// for reuse.
    ///
    /// This does **not** follow hierarchy links; use
    /// [`hierarchy::destroy`](super::hierarchy::destroy) to take a subtree
    /// down with its root. Returns `false` if the handle was already stale.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.allocator.deallocate(entity) {
            return false;
        }
        for column in self.columns.values_mut() {
            column.remove_index(entity.index);
        }
        true
    }

    /// Check whether an entity handle is still valid.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Number of currently alive entities.
    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    // ── Per-Entity Component Access ──────────────────────────────────

    /// Add a component to an entity, replacing any existing component of the
    /// same type.
    ///
    /// Returns `false` (and logs) if the entity is dead — a stale handle is a
    /// skippable condition here, not a fatal one.
    pub fn insert<T: 'static + Send + Sync>(&mut self, entity: Entity, component: T) -> bool {
        if !self.allocator.is_alive(entity) {
            log::warn!(
                "insert of `{}` on dead entity {entity:?} ignored",
                std::any::type_name::<T>()
            );
            return false;
        }
        self.column_mut_or_insert::<T>()
            .map
            .insert(entity.index, component);
        true
    }

    /// Shared reference to a component. `None` if the entity is dead or the
    /// component is missing.
    pub fn get<T: 'static + Send + Sync>(&self, entity: Entity) -> Option<&T> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.column::<T>()?.map.get(&entity.index)
    }

    /// Mutable reference to a component. `None` if the entity is dead or the
    /// component is missing.
    pub fn get_mut<T: 'static + Send + Sync>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.column_mut::<T>()?.map.get_mut(&entity.index)
    }

    /// Remove a component from an entity, returning it. `None` if absent.
    pub fn remove<T: 'static + Send + Sync>(&mut self, entity: Entity) -> Option<T> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.column_mut::<T>()?.map.remove(&entity.index)
    }

    /// Check whether an entity has a component of type `T`.
    pub fn has<T: 'static + Send + Sync>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    // ── Iteration ────────────────────────────────────────────────────

    /// Collect all entities holding a component of type `T`.
    ///
    /// Order is unspecified; every system in this crate tolerates arbitrary
    /// order. Collecting up front also means the caller may freely spawn and
    /// despawn while walking the result, at the cost of re-checking liveness.
    pub fn entities_with<T: 'static + Send + Sync>(&self) -> Vec<Entity> {
        match self.column::<T>() {
            Some(col) => col
                .map
                .keys()
                .map(|&index| self.allocator.handle_for(index))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Visit every `(Entity, &T)` pair, in unspecified order.
    pub fn for_each<T: 'static + Send + Sync>(&self, mut f: impl FnMut(Entity, &T)) {
        if let Some(col) = self.column::<T>() {
            for (&index, component) in &col.map {
                f(self.allocator.handle_for(index), component);
            }
        }
    }

    /// Visit every `(Entity, &mut T)` pair, in unspecified order.
    ///
    /// The world is exclusively borrowed for the duration, so the visitor
    /// cannot spawn, despawn, or touch other components — collect first (see
    /// [`entities_with`](World::entities_with)) when you need that.
    pub fn for_each_mut<T: 'static + Send + Sync>(&mut self, mut f: impl FnMut(Entity, &mut T)) {
        let allocator = &self.allocator;
        if let Some(col) = self
            .columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<Column<T>>())
        {
            for (&index, component) in col.map.iter_mut() {
                f(allocator.handle_for(index), component);
            }
        }
    }

    // ── Resources ────────────────────────────────────────────────────

    /// Insert a resource (singleton value), replacing any existing resource
    /// of the same type.
    pub fn insert_resource<T: 'static>(&mut self, value: T) {
        self.resources.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Shared reference to a resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource<T: 'static>(&self) -> &T {
        self.get_resource().unwrap_or_else(|| {
            panic!(
                "Resource `{}` not found. Did you forget to insert it?",
                std::any::type_name::<T>()
            )
        })
    }

    /// Mutable reference to a resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource_mut<T: 'static>(&mut self) -> &mut T {
        self.get_resource_mut().unwrap_or_else(|| {
            panic!(
                "Resource `{}` not found. Did you forget to insert it?",
                std::any::type_name::<T>()
            )
        })
    }

    /// Try to get a resource. `None` if not present.
    pub fn get_resource<T: 'static>(&self) -> Option<&T> {
        self.resources
            .get(&TypeId::of::<T>())
            .and_then(|r| r.downcast_ref::<T>())
    }

    /// Try to get a resource mutably. `None` if not present.
    pub fn get_resource_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.resources
            .get_mut(&TypeId::of::<T>())
            .and_then(|r| r.downcast_mut::<T>())
    }

    // ── Column plumbing ──────────────────────────────────────────────

    fn column<T: 'static + Send + Sync>(&self) -> Option<&Column<T>> {
        self.columns
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<Column<T>>())
    }

    fn column_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut Column<T>> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<Column<T>>())
    }

    fn column_mut_or_insert<T: 'static + Send + Sync>(&mut self) -> &mut Column<T> {
        self.columns
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Column::<T>::new()))
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .expect("column type mismatch")
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ── Spawn bundles ────────────────────────────────────────────────────────

/// A set of components that can be spawned onto one entity.
///
/// Implemented for tuples of up to 8 components, each `'static + Send + Sync`.
pub trait Bundle {
    fn store_into(self, world: &mut World, entity: Entity);
}

macro_rules! impl_bundle {
    ($($T:ident),+) => {
        impl<$($T: 'static + Send + Sync),+> Bundle for ($($T,)+) {
            #[allow(non_snake_case)]
            fn store_into(self, world: &mut World, entity: Entity) {
                let ($($T,)+) = self;
                $(world.insert(entity, $T);)+
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);
