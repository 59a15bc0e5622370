//! avatarkit Core - Core types shared by the avatarkit crates
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Transform decomposition for skeleton bones
//! - The mesh bone record produced by asset loaders

pub mod types;

pub use glam::{Mat4, Quat, Vec3};
pub use types::{MeshBone, Transform};
