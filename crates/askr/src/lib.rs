//! # Askr — Scene Graphs and Verlet Physics on a Minimal ECS
//!
//! A small entity/component runtime for interactive prototypes, built around
//! two reusable subsystems:
//!
//! - A **hierarchical scene graph**: entities linked into parent/child trees
//!   ([`ecs::hierarchy`]), with per-tick top-down world-transform composition
//!   ([`ecs::transform`]).
//! - A **time-corrected Verlet integrator** with an iterative distance-
//!   constraint solver ([`physics`]).
//!
//! Everything else — rendering, windowing, input — is the application's
//! problem. Askr gives you a [`World`](ecs::World), a handful of components,
//! and systems you tick once per frame.
//!
//! Start with `use askr::prelude::*`.

pub mod ecs;
pub mod expires;
pub mod math;
pub mod physics;
pub mod prelude;
pub mod time;
