//! Entity lifetimes.
//!
//! An [`Expires`] component counts down each tick; when it runs out, the
//! entity is destroyed through the hierarchy (taking any attached subtree
//! with it). An optional *last wish* callback runs just before destruction —
//! handy for spawning a burst of particles or detaching something that should
//! outlive its parent.

use crate::ecs::{Entity, World, hierarchy};

/// Lifetime countdown in seconds.
pub struct Expires {
    pub time: f32,
    last_wish: Option<Box<dyn FnOnce(&mut World, Entity) + Send + Sync>>,
}

impl Expires {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            last_wish: None,
        }
    }

    /// Run `wish` right before the entity is destroyed.
    pub fn with_last_wish(
        mut self,
        wish: impl FnOnce(&mut World, Entity) + Send + Sync + 'static,
    ) -> Self {
        self.last_wish = Some(Box::new(wish));
        self
    }
}

impl Default for Expires {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Ticks every [`Expires`] component down and reaps the ones that ran out.
#[derive(Debug, Default)]
pub struct ExpiresSystem;

impl ExpiresSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&mut self, world: &mut World, dt: f32) {
        // Decrement in place, destroy afterwards: destruction mid-iteration
        // would invalidate the traversal.
        let mut expired = Vec::new();
        world.for_each_mut::<Expires>(|entity, expires| {
            expires.time -= dt;
            if expires.time < 0.0 {
                expired.push(entity);
            }
        });

        for entity in expired {
            let wish = world.remove::<Expires>(entity).and_then(|e| e.last_wish);
            if let Some(wish) = wish {
                wish(world, entity);
            }
            hierarchy::destroy(world, entity);
        }
    }
}

impl crate::ecs::System for ExpiresSystem {
    fn run(&mut self, world: &mut World) {
        let dt = world.resource::<crate::time::Time>().delta_secs();
        self.update(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_its_time() {
        let mut world = World::new();
        let e = world.spawn_one(Expires::new(0.25));

        let mut system = ExpiresSystem::new();
        for _ in 0..15 {
            system.update(&mut world, 0.1);
        }
        assert!(!world.is_alive(e));
    }

    #[test]
    fn survives_until_then() {
        let mut world = World::new();
        let e = world.spawn_one(Expires::new(1.0));

        ExpiresSystem::new().update(&mut world, 0.5);
        assert!(world.is_alive(e));
    }

    #[test]
    fn last_wish_runs_before_destruction() {
        struct WishRan(bool);

        let mut world = World::new();
        world.insert_resource(WishRan(false));
        world.spawn_one(Expires::new(0.0).with_last_wish(|world, entity| {
            assert!(world.is_alive(entity), "wish sees a live entity");
            world.resource_mut::<WishRan>().0 = true;
        }));

        ExpiresSystem::new().update(&mut world, 0.1);
        assert!(world.resource::<WishRan>().0);
    }

    #[test]
    fn expiry_cascades_through_hierarchy() {
        let mut world = World::new();
        let root = world.spawn_one(Expires::new(0.0));
        let child = world.spawn_empty();
        hierarchy::attach(&mut world, root, child);

        ExpiresSystem::new().update(&mut world, 0.1);
        assert!(!world.is_alive(root));
        assert!(!world.is_alive(child));
    }
}
