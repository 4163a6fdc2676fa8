//! # Entity — Generational Handles
//!
//! An [`Entity`] is an opaque handle into the [`World`](super::world::World):
//! a slot index paired with a **generation** counter. When a slot is recycled
//! after a despawn, its generation is bumped, so any handle still holding the
//! old generation fails liveness checks instead of silently pointing at a new
//! entity.
//!
//! This is what makes stored cross-entity references (a node's parent, a
//! constraint's bodies) safe: they are validated lookups, not owning pointers.
//! A stale handle yields "absent", never a wrong answer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lightweight handle to an entity in the [`World`](super::world::World).
///
/// Only valid for the `World` that created it, and only while its generation
/// matches. All `World` accessors treat a stale handle as absent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Entity {
    /// The raw slot index. Diagnostics only.
    pub fn index(self) -> u32 {
        self.index
    }

    /// The generation counter. Diagnostics only.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Allocates entity slots and recycles them through a free list.
///
/// Despawning bumps the slot's generation and pushes the index onto the free
/// list; spawning pops from the free list before growing.
pub(crate) struct EntityAllocator {
    /// Generation per slot ever allocated, indexed by `Entity::index`.
    generations: Vec<u32>,
    /// Slots available for reuse.
    free_list: Vec<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub fn allocate(&mut self) -> Entity {
        if let Some(index) = self.free_list.pop() {
            // Generation was bumped on deallocate, so recycled handles are fresh.
            Entity {
                index,
                generation: self.generations[index as usize],
            }
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity {
                index,
                generation: 0,
            }
        }
    }

    /// Returns `false` if the handle was already stale (double free).
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        let idx = entity.index as usize;
        if idx < self.generations.len() && self.generations[idx] == entity.generation {
            self.generations[idx] += 1;
            self.free_list.push(entity.index);
            true
        } else {
            false
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.index as usize;
        idx < self.generations.len() && self.generations[idx] == entity.generation
    }

    pub fn alive_count(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }

    /// Rebuild the handle for a slot known to be alive. Used when iterating
    /// component columns, which are keyed by index only.
    pub fn handle_for(&self, index: u32) -> Entity {
        Entity {
            index,
            generation: self.generations[index as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_sequential() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        let e1 = alloc.allocate();
        assert_eq!(e0.index, 0);
        assert_eq!(e1.index, 1);
        assert_eq!(e0.generation, 0);
        assert_eq!(e1.generation, 0);
    }

    #[test]
    fn recycle_bumps_generation() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert!(alloc.deallocate(e0));
        let reused = alloc.allocate();
        assert_eq!(reused.index, 0);
        assert_eq!(reused.generation, 1);
    }

    #[test]
    fn stale_handle_detected() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert!(alloc.is_alive(e0));
        alloc.deallocate(e0);
        assert!(!alloc.is_alive(e0));

        // A recycled slot does not revive the old handle.
        let _ = alloc.allocate();
        assert!(!alloc.is_alive(e0));
    }

    #[test]
    fn double_free_returns_false() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert!(alloc.deallocate(e0));
        assert!(!alloc.deallocate(e0));
    }

    #[test]
    fn alive_count() {
        let mut alloc = EntityAllocator::new();
        assert_eq!(alloc.alive_count(), 0);
        let e0 = alloc.allocate();
        let _e1 = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);
        alloc.deallocate(e0);
        assert_eq!(alloc.alive_count(), 1);
    }
}
