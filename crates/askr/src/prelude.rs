//! One-stop import for applications: `use askr::prelude::*;`

pub use crate::ecs::hierarchy::{
    self, Node, ascend, ascend_until, attach, descend, descend_until, destroy, detach,
};
pub use crate::ecs::{Entity, Schedule, System, Transform, TransformSystem, World};
pub use crate::expires::{Expires, ExpiresSystem};
pub use crate::math::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use crate::physics::{DistanceConstraint, VerletBody, VerletPhysicsSystem};
pub use crate::time::Time;
