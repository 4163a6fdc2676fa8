//! Hierarchical orbits — a sun, planets, and moons, headless.
//!
//! Demonstrates parent/child attachment and per-tick world-transform
//! propagation: each body only spins its *local* orientation, and the
//! hierarchy composes everything else. Positions are logged once a second.
//!
//! Run with: `RUST_LOG=info cargo run -p askr --example orbits`

use askr::prelude::*;

/// Radians per second of local spin.
struct Spin(f32);

fn spawn_orbiter(world: &mut World, parent: Entity, radius: f32, speed: f32) -> Entity {
    // A pivot entity spins at the parent's center; the body rides at the
    // end of the arm.
    let arm = world.spawn((Transform::default(), Spin(speed)));
    let body = world.spawn_one(Transform::from_xyz(radius, 0.0, 0.0));
    attach(world, parent, arm);
    attach(world, arm, body);
    body
}

fn spin_system(world: &mut World) {
    let dt = world.resource::<Time>().delta_secs();
    let mut spins = Vec::new();
    world.for_each::<Spin>(|e, s| spins.push((e, s.0)));
    for (e, speed) in spins {
        if let Some(t) = world.get_mut::<Transform>(e) {
            t.orientation *= Quat::from_rotation_z(speed * dt);
        }
    }
}

fn main() {
    env_logger::init();

    let mut world = World::new();
    world.insert_resource(Time::new());

    let sun = world.spawn_one(Transform::default());
    let planet = spawn_orbiter(&mut world, sun, 10.0, 1.0);
    let moon = spawn_orbiter(&mut world, planet, 2.0, 4.0);

    let mut schedule = Schedule::new();
    schedule.add_system(spin_system);
    schedule.add_system(TransformSystem::new());

    let dt = 1.0 / 60.0;
    for tick in 0..600u32 {
        world.resource_mut::<Time>().advance(dt);
        schedule.run(&mut world);

        if tick % 60 == 0 {
            let p = world.get::<Transform>(planet).unwrap().world_point();
            let m = world.get::<Transform>(moon).unwrap().world_point();
            log::info!(
                "t={:>4.1}s planet=({:6.2}, {:6.2}) moon=({:6.2}, {:6.2})",
                world.resource::<Time>().elapsed_secs(),
                p.x,
                p.y,
                m.x,
                m.y
            );
        }
    }
}
