//! A hanging chain of Verlet bodies under gravity, headless.
//!
//! The top body is pinned with `place`, every segment is a distance
//! constraint, and a steady downward `nudge` stands in for gravity. Watch the
//! chain stretch taut and settle.
//!
//! Run with: `RUST_LOG=info cargo run -p askr --example springs`

use askr::prelude::*;

const LINKS: usize = 8;
const SPACING: f32 = 2.0;
const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

fn main() {
    env_logger::init();

    let mut world = World::new();

    let mut bodies = Vec::with_capacity(LINKS);
    for i in 0..LINKS {
        let position = Vec3::new(i as f32 * SPACING, 0.0, 0.0);
        bodies.push(world.spawn_one(VerletBody::new(position)));
    }
    for pair in bodies.windows(2) {
        let constraint = DistanceConstraint::between(&world, pair[0], pair[1]).unwrap();
        world.spawn_one(constraint);
    }

    let anchor = bodies[0];
    let anchor_position = Vec3::ZERO;

    let mut physics = VerletPhysicsSystem::new();
    let dt = 1.0 / 60.0;

    for tick in 0..600u32 {
        // Gravity on everything, then re-pin the anchor.
        for &body in &bodies {
            if let Some(b) = world.get_mut::<VerletBody>(body) {
                b.nudge(GRAVITY * dt);
            }
        }
        physics.update(&mut world, dt);
        if let Some(b) = world.get_mut::<VerletBody>(anchor) {
            b.place(anchor_position);
        }

        if tick % 60 == 0 {
            let tip = world.get::<VerletBody>(*bodies.last().unwrap()).unwrap();
            log::info!(
                "t={:>4.1}s tip=({:6.2}, {:6.2})",
                tick as f32 * dt,
                tip.position.x,
                tip.position.y
            );
        }
    }
}
