//! avatarkit Rig - Humanoid skeleton descriptions
//!
//! Converts the bind poses of a skinned avatar mesh into parent-relative bone
//! poses, pairs the bones with humanoid roles from a bone table, and builds the
//! standard and on-heels variants used for retargeted animation.

mod bone_table;
mod config;
mod error;
mod skeleton;

pub use bone_table::{BoneRecord, BoneRoleTable};
pub use config::RigConfig;
pub use error::RigError;
pub use skeleton::{
    build_human_description, build_skeleton, AvatarRig, HeelAdjustment, HumanBone, HumanDescription,
    SkeletonBone,
};
