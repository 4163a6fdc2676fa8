//! # Component — Type-Erased Sparse Columns
//!
//! One [`Column<T>`] per component type, mapping entity index → component
//! value. The [`World`](super::world::World) owns the columns behind a
//! `HashMap<TypeId, Box<dyn AnyColumn>>` and downcasts on access.
//!
//! Sparse maps instead of packed archetype tables: attaching and detaching
//! components (hierarchy nodes are created lazily, constraints come and go) is
//! the common structural operation here, and per-type iteration stays a plain
//! map walk. Cache locality is not the bottleneck for scene-graph sized data.
//!
//! Iteration order over a column is unspecified; systems must tolerate any
//! order, and the ones in this crate do.

use std::any::Any;
use std::collections::HashMap;

/// Object-safe view of a column, enough for the world to clean up after a
/// despawned entity without knowing the component type.
pub(crate) trait AnyColumn {
    fn remove_index(&mut self, index: u32);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse storage for a single component type.
pub(crate) struct Column<T: 'static + Send + Sync> {
    pub map: HashMap<u32, T>,
}

impl<T: 'static + Send + Sync> Column<T> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<T: 'static + Send + Sync> AnyColumn for Column<T> {
    fn remove_index(&mut self, index: u32) {
        self.map.remove(&index);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
