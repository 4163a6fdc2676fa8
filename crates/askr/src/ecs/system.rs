//! # System — Functions That Operate on the World
//!
//! A system is anything that takes `&mut World` and does something with it.
//! Systems run single-threaded, in the order they were added; a tick runs
//! every system to completion. No parameter injection, no dependency graphs.
//!
//! The stateful systems in this crate ([`TransformSystem`],
//! [`VerletPhysicsSystem`]) expose an inherent `update(&mut self, world, dt)`
//! entry point and implement [`System`] on top of it by reading `dt` from the
//! [`Time`](crate::time::Time) resource. The two may run in either order —
//! they share no mutable state with each other.
//!
//! [`TransformSystem`]: super::transform::TransformSystem
//! [`VerletPhysicsSystem`]: crate::physics::VerletPhysicsSystem

use super::world::World;

/// A system that can be executed on a [`World`].
///
/// Any `FnMut(&mut World)` implements this, so closures and function pointers
/// work directly.
pub trait System {
    fn run(&mut self, world: &mut World);
}

impl<F: FnMut(&mut World)> System for F {
    fn run(&mut self, world: &mut World) {
        (self)(world);
    }
}

/// An ordered list of systems, run once per tick by the application loop.
pub struct Schedule {
    systems: Vec<Box<dyn System>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Run all systems in order.
    pub fn run(&mut self, world: &mut World) {
        for system in &mut self.systems {
            system.run(world);
        }
    }

    /// Number of systems in this schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}
