//! # Verlet Physics — Point Masses and Distance Constraints
//!
//! Position-based dynamics in the style of Jakobsen: a [`VerletBody`] stores
//! where it is and where it was, velocity is implicit in the difference, and
//! forces are accumulated accelerations that reset every tick.
//!
//! [`VerletPhysicsSystem::update`] runs two phases per tick:
//!
//! 1. **Integration** — time-corrected Verlet. The previous displacement is
//!    rescaled by `dt / previous_dt` so the integrator stays stable when the
//!    tick rate wobbles.
//! 2. **Constraint relaxation** — stale [`DistanceConstraint`]s (a referenced
//!    body no longer resolves) are pruned, then the survivors get a fixed
//!    number of Gauss-Seidel passes. One pass solves an isolated constraint
//!    exactly; networks sharing bodies converge over iterations and ticks
//!    rather than in a single solve.
//!
//! No collision detection, no broad-phase, no mass — bodies are unit point
//! masses and constraints are the only interaction.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ecs::{Entity, World};

/// Reference tick rate baked into the [`nudge`](VerletBody::nudge) force
/// convention.
pub const REFERENCE_TICK_RATE: f32 = 60.0;

/// Gauss-Seidel passes over the constraint set per tick.
const RELAXATION_ITERATIONS: usize = 2;

/// A point mass for Verlet simulation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VerletBody {
    pub position: Vec3,
    pub previous_position: Vec3,
    /// Accumulated this tick, consumed and zeroed by integration, so any
    /// number of systems can simply add forces each frame.
    pub acceleration: Vec3,
    /// Viscous drag in `[0, 1)`; the fraction of velocity lost per tick.
    pub drag: f32,
}

impl VerletBody {
    /// A body at rest at `position`, with the default drag of 0.1.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            previous_position: position,
            acceleration: Vec3::ZERO,
            drag: 0.1,
        }
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Instantaneous velocity, assuming a fixed timestep.
    pub fn velocity(&self) -> Vec3 {
        self.position - self.previous_position
    }

    /// Accumulate a force so the body would move by `amount` over one second
    /// in the absence of drag.
    ///
    /// The conversion assumes a 60-ticks-per-second reference rate (the
    /// integrator multiplies by `dt²`), so at other tick rates the effective
    /// magnitude drifts from the caller's intent. Kept as the source design's
    /// convention rather than generalized.
    pub fn nudge(&mut self, amount: Vec3) {
        self.acceleration += amount * REFERENCE_TICK_RATE;
    }

    /// Teleport the body, cancelling its implicit velocity.
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
        self.previous_position = position;
    }
}

/// Holds two bodies at a fixed separation, enforced by relaxation.
///
/// Lives as a component (commonly on its own entity); references are
/// validated entity handles, and a constraint whose body has died is pruned
/// by the next [`VerletPhysicsSystem::update`] — silently dropped, never an
/// error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistanceConstraint {
    pub a: Entity,
    pub b: Entity,
    /// Target separation, fixed at creation. Non-negative.
    pub distance: f32,
}

impl DistanceConstraint {
    pub fn new(a: Entity, b: Entity, distance: f32) -> Self {
        debug_assert!(distance >= 0.0);
        Self { a, b, distance }
    }

    /// A constraint whose rest distance is the bodies' current separation.
    /// `None` if either entity lacks a live [`VerletBody`].
    pub fn between(world: &World, a: Entity, b: Entity) -> Option<Self> {
        let pa = world.get::<VerletBody>(a)?.position;
        let pb = world.get::<VerletBody>(b)?.position;
        Some(Self::new(a, b, pa.distance(pb)))
    }
}

/// Performs time-corrected Verlet integration and constraint relaxation.
///
/// The only persistent state is `previous_dt`, seeded with the reference
/// timestep so the first tick never divides by zero.
pub struct VerletPhysicsSystem {
    previous_dt: f32,
}

impl VerletPhysicsSystem {
    pub fn new() -> Self {
        Self {
            previous_dt: 1.0 / REFERENCE_TICK_RATE,
        }
    }

    pub fn update(&mut self, world: &mut World, dt: f32) {
        self.integrate(world, dt);
        relax_constraints(world);
    }

    fn integrate(&mut self, world: &mut World, dt: f32) {
        let previous_dt = self.previous_dt;
        world.for_each_mut::<VerletBody>(|_, body| {
            let current = body.position;
            let mut velocity =
                (body.position - body.previous_position) * (dt / previous_dt)
                    + body.acceleration * (dt * dt);
            velocity *= 1.0 - body.drag;
            body.position += velocity;
            body.previous_position = current;
            body.acceleration = Vec3::ZERO;
        });
        self.previous_dt = dt;
    }
}

impl Default for VerletPhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::ecs::System for VerletPhysicsSystem {
    fn run(&mut self, world: &mut World) {
        let dt = world.resource::<crate::time::Time>().delta_secs();
        self.update(world, dt);
    }
}

/// Prune stale constraints, then run the relaxation sweeps.
fn relax_constraints(world: &mut World) {
    let mut live: Vec<DistanceConstraint> = Vec::new();
    for entity in world.entities_with::<DistanceConstraint>() {
        let Some(&constraint) = world.get::<DistanceConstraint>(entity) else {
            continue;
        };
        if world.has::<VerletBody>(constraint.a) && world.has::<VerletBody>(constraint.b) {
            live.push(constraint);
        } else {
            log::debug!("pruning stale constraint on {entity:?}");
            world.remove::<DistanceConstraint>(entity);
        }
    }

    for _ in 0..RELAXATION_ITERATIONS {
        for constraint in &live {
            relax_one(world, constraint);
        }
    }
}

/// Move both bodies symmetrically toward the rest separation.
fn relax_one(world: &mut World, constraint: &DistanceConstraint) {
    // Bodies were live when `live` was collected and relaxation never
    // despawns, but the lookups still tolerate absence.
    let (Some(a), Some(b)) = (
        world.get::<VerletBody>(constraint.a),
        world.get::<VerletBody>(constraint.b),
    ) else {
        return;
    };
    let (pa, pb) = (a.position, b.position);

    let center = (pa + pb) / 2.0;
    let mut delta = pa - pb;
    let mut length = delta.length();
    if length <= f32::EPSILON {
        // Coincident bodies give no direction to push along; pick one
        // arbitrarily rather than divide by zero.
        delta = Vec3::X;
        length = 1.0;
    }
    delta *= constraint.distance / (2.0 * length);

    if let Some(a) = world.get_mut::<VerletBody>(constraint.a) {
        a.position = center + delta;
    }
    if let Some(b) = world.get_mut::<VerletBody>(constraint.b) {
        b.position = center - delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn body_positions(world: &World, a: Entity, b: Entity) -> (Vec3, Vec3) {
        (
            world.get::<VerletBody>(a).unwrap().position,
            world.get::<VerletBody>(b).unwrap().position,
        )
    }

    #[test]
    fn acceleration_integrates_and_resets() {
        // At rest, acceleration (60,0,0), drag 0, dt = previous_dt = 1/60:
        // one step moves the body by dt on x and clears the acceleration.
        let mut world = World::new();
        let mut body = VerletBody::new(Vec3::ZERO).with_drag(0.0);
        body.acceleration = Vec3::new(60.0, 0.0, 0.0);
        let e = world.spawn_one(body);

        VerletPhysicsSystem::new().update(&mut world, DT);

        let body = world.get::<VerletBody>(e).unwrap();
        assert!((body.position.x - DT).abs() < 1e-7, "{}", body.position.x);
        assert_eq!(body.position.y, 0.0);
        assert_eq!(body.acceleration, Vec3::ZERO);
        assert_eq!(body.previous_position, Vec3::ZERO);
    }

    #[test]
    fn velocity_carries_across_ticks() {
        let mut world = World::new();
        let mut body = VerletBody::new(Vec3::ZERO).with_drag(0.0);
        body.acceleration = Vec3::new(60.0, 0.0, 0.0);
        let e = world.spawn_one(body);

        let mut system = VerletPhysicsSystem::new();
        system.update(&mut world, DT);
        let after_one = world.get::<VerletBody>(e).unwrap().position.x;
        system.update(&mut world, DT);
        let after_two = world.get::<VerletBody>(e).unwrap().position.x;

        // No new force, no drag: same displacement again.
        assert!((after_two - 2.0 * after_one).abs() < 1e-6);
    }

    #[test]
    fn time_correction_rescales_previous_displacement() {
        let mut world = World::new();
        // Moving 1 unit per 1/60s tick.
        let e = world.spawn_one(VerletBody {
            position: Vec3::ZERO,
            previous_position: Vec3::new(-1.0, 0.0, 0.0),
            acceleration: Vec3::ZERO,
            drag: 0.0,
        });

        let mut system = VerletPhysicsSystem::new();
        // A tick twice as long should move the body twice as far.
        system.update(&mut world, 2.0 * DT);

        let body = world.get::<VerletBody>(e).unwrap();
        assert!((body.position.x - 2.0).abs() < 1e-6, "{}", body.position.x);
    }

    #[test]
    fn drag_bleeds_velocity() {
        let mut world = World::new();
        let e = world.spawn_one(VerletBody {
            position: Vec3::ZERO,
            previous_position: Vec3::new(-1.0, 0.0, 0.0),
            acceleration: Vec3::ZERO,
            drag: 0.5,
        });

        VerletPhysicsSystem::new().update(&mut world, DT);
        assert!((world.get::<VerletBody>(e).unwrap().position.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn nudge_is_displacement_per_second_at_reference_rate() {
        let mut world = World::new();
        let e = world.spawn_one(VerletBody::new(Vec3::ZERO).with_drag(0.0));

        world
            .get_mut::<VerletBody>(e)
            .unwrap()
            .nudge(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(
            world.get::<VerletBody>(e).unwrap().acceleration,
            Vec3::new(60.0, 0.0, 0.0)
        );
    }

    #[test]
    fn place_cancels_velocity() {
        let mut world = World::new();
        let e = world.spawn_one(VerletBody {
            position: Vec3::ZERO,
            previous_position: Vec3::new(-5.0, 0.0, 0.0),
            acceleration: Vec3::ZERO,
            drag: 0.0,
        });

        let target = Vec3::new(9.0, 9.0, 9.0);
        world.get_mut::<VerletBody>(e).unwrap().place(target);
        let body = world.get::<VerletBody>(e).unwrap();
        assert_eq!(body.position, target);
        assert_eq!(body.velocity(), Vec3::ZERO);

        // And it stays put.
        VerletPhysicsSystem::new().update(&mut world, DT);
        assert_eq!(world.get::<VerletBody>(e).unwrap().position, target);
    }

    #[test]
    fn constraint_pulls_bodies_to_rest_distance() {
        // Separation 20, rest distance 10: the distance approaches 10
        // monotonically over repeated ticks with no external forces.
        let mut world = World::new();
        let a = world.spawn_one(VerletBody::new(Vec3::ZERO));
        let b = world.spawn_one(VerletBody::new(Vec3::new(20.0, 0.0, 0.0)));
        world.spawn_one(DistanceConstraint::new(a, b, 10.0));

        let mut system = VerletPhysicsSystem::new();
        let mut previous = 20.0f32;
        for _ in 0..60 {
            system.update(&mut world, DT);
            let (pa, pb) = body_positions(&world, a, b);
            let distance = pa.distance(pb);
            assert!(distance <= previous + 1e-4, "{distance} > {previous}");
            previous = distance;
        }
        assert!((previous - 10.0).abs() < 1e-3, "ended at {previous}");
    }

    #[test]
    fn default_rest_distance_is_current_separation() {
        let mut world = World::new();
        let a = world.spawn_one(VerletBody::new(Vec3::ZERO));
        let b = world.spawn_one(VerletBody::new(Vec3::new(0.0, 7.0, 0.0)));

        let constraint = DistanceConstraint::between(&world, a, b).unwrap();
        assert!((constraint.distance - 7.0).abs() < 1e-6);

        let no_body = world.spawn_empty();
        assert!(DistanceConstraint::between(&world, a, no_body).is_none());
    }

    #[test]
    fn coincident_bodies_are_pushed_apart_without_nan() {
        let mut world = World::new();
        let a = world.spawn_one(VerletBody::new(Vec3::ZERO).with_drag(0.0));
        let b = world.spawn_one(VerletBody::new(Vec3::ZERO).with_drag(0.0));
        world.spawn_one(DistanceConstraint::new(a, b, 10.0));

        VerletPhysicsSystem::new().update(&mut world, DT);

        let (pa, pb) = body_positions(&world, a, b);
        assert!(pa.is_finite() && pb.is_finite());
        assert!((pa.distance(pb) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn stale_constraints_are_pruned_not_solved() {
        let mut world = World::new();
        let a = world.spawn_one(VerletBody::new(Vec3::ZERO));
        let b = world.spawn_one(VerletBody::new(Vec3::new(20.0, 0.0, 0.0)));
        let holder = world.spawn_one(DistanceConstraint::new(a, b, 10.0));

        world.despawn(b);
        VerletPhysicsSystem::new().update(&mut world, DT);

        // The record is gone and the surviving body was left alone.
        assert!(!world.has::<DistanceConstraint>(holder));
        assert_eq!(world.get::<VerletBody>(a).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn shared_body_network_converges_over_ticks() {
        // a - b - c chain, both links rest at 5; single-tick relaxation is
        // approximate, repeated ticks settle it.
        let mut world = World::new();
        let a = world.spawn_one(VerletBody::new(Vec3::ZERO));
        let b = world.spawn_one(VerletBody::new(Vec3::new(12.0, 0.0, 0.0)));
        let c = world.spawn_one(VerletBody::new(Vec3::new(24.0, 0.0, 0.0)));
        world.spawn_one(DistanceConstraint::new(a, b, 5.0));
        world.spawn_one(DistanceConstraint::new(b, c, 5.0));

        let mut system = VerletPhysicsSystem::new();
        for _ in 0..240 {
            system.update(&mut world, DT);
        }

        let ab = world.get::<VerletBody>(a).unwrap().position.distance(
            world.get::<VerletBody>(b).unwrap().position,
        );
        let bc = world.get::<VerletBody>(b).unwrap().position.distance(
            world.get::<VerletBody>(c).unwrap().position,
        );
        assert!((ab - 5.0).abs() < 1e-2, "ab = {ab}");
        assert!((bc - 5.0).abs() < 1e-2, "bc = {bc}");
    }
}
