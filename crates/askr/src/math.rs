//! Math re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. Positions and pivots are [`Vec3`], orientations are
//! [`Quat`], composed transforms are [`Mat4`].

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
