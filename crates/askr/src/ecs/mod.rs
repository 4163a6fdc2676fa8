//! # A Small Sparse-Map ECS
//!
//! The entity store underneath the scene graph and the physics systems. The
//! design is deliberately simple: generational entity handles, one type-erased
//! column per component type, closure-based iteration.
//!
//! Components here are plain data. Relationships between entities (the scene
//! graph) are expressed through the [`hierarchy`] module's [`Node`] component
//! and validated entity handles, never through owning pointers — every
//! dereference of a stored [`Entity`] checks liveness first.
//!
//! ## Module Overview
//!
//! - [`entity`] — Generational entity IDs
//! - [`component`] — Type-erased sparse component columns
//! - [`world`] — Central container (entities + components + resources)
//! - [`system`] — System trait and schedule runner
//! - [`hierarchy`] — Parent/child trees: attach, detach, traversal, cascade
//!   destroy
//! - [`transform`] — Spatial state per node and world-matrix propagation

pub(crate) mod component;
pub mod entity;
pub mod hierarchy;
pub mod system;
pub mod transform;
pub mod world;

pub use entity::Entity;
pub use hierarchy::Node;
pub use system::{Schedule, System};
pub use transform::{Transform, TransformSystem};
pub use world::{Bundle, World};
