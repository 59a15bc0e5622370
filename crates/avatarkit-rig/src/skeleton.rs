use std::collections::{HashMap, HashSet};

use avatarkit_core::{MeshBone, Quat, Transform, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bone_table::BoneRoleTable;
use crate::config::RigConfig;
use crate::error::RigError;

/// Pose of a bone relative to its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonBone {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl SkeletonBone {
    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

/// Assignment of a mesh bone to a humanoid role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanBone {
    pub bone_name: String,
    pub human_name: String,
    pub use_default_limits: bool,
}

/// Everything a humanoid retargeting system needs to build an avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanDescription {
    pub human: Vec<HumanBone>,
    pub skeleton: Vec<SkeletonBone>,
    pub arm_stretch: f32,
    pub leg_stretch: f32,
    pub upper_arm_twist: f32,
    pub lower_arm_twist: f32,
    pub upper_leg_twist: f32,
    pub lower_leg_twist: f32,
    pub feet_spacing: f32,
}

impl HumanDescription {
    pub fn bone(&self, name: &str) -> Option<&SkeletonBone> {
        self.skeleton.iter().find(|b| b.name == name)
    }
}

/// Fixed ankle and foot rotations used when the avatar wears heeled shoes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeelAdjustment {
    pub ankle: Quat,
    pub foot: Quat,
}

impl HeelAdjustment {
    /// Ankles pitch by `degrees` about X, feet by the opposite angle.
    pub fn from_angle(degrees: f32) -> Self {
        Self {
            ankle: Transform::euler_degrees(degrees, 0.0, 0.0),
            foot: Transform::euler_degrees(-degrees, 0.0, 0.0),
        }
    }

    /// Replacement rotation for the bone, if it is one of the adjusted bones.
    pub fn rotation_for(&self, bone_name: &str) -> Option<Quat> {
        match bone_name {
            "L_Ankle" | "R_Ankle" => Some(self.ankle),
            "L_Foot" | "R_Foot" => Some(self.foot),
            _ => None,
        }
    }
}

impl Default for HeelAdjustment {
    fn default() -> Self {
        Self::from_angle(20.0)
    }
}

/// Compute parent-relative poses for every bone, in input order.
///
/// A bone whose parent is absent from the list, or is the bone itself, is a root
/// and keeps the inverse of its bind pose.
pub fn build_skeleton(bones: &[MeshBone], heels: Option<&HeelAdjustment>) -> Vec<SkeletonBone> {
    let index: HashMap<&str, usize> = bones
        .iter()
        .enumerate()
        .map(|(i, b)| (b.name.as_str(), i))
        .collect();

    bones
        .iter()
        .map(|bone| {
            let mut local = bone.bind_pose.inverse();
            let parent = bone
                .parent
                .as_deref()
                .filter(|p| *p != bone.name)
                .and_then(|p| index.get(p));
            if let Some(&parent) = parent {
                local = bones[parent].bind_pose * local;
            }

            let mut transform = Transform::from_matrix(local);
            if let Some(rotation) = heels.and_then(|h| h.rotation_for(&bone.name)) {
                transform.rotation = rotation;
            }

            SkeletonBone {
                name: bone.name.clone(),
                position: transform.position,
                rotation: transform.rotation,
                scale: transform.scale,
            }
        })
        .collect()
}

/// Build a humanoid description for the mesh bones.
///
/// Every mesh bone must have a role in `table`; otherwise the mapping is
/// incomplete and the error lists all bones without one.
pub fn build_human_description(
    bones: &[MeshBone],
    table: &BoneRoleTable,
    config: &RigConfig,
    on_heels: bool,
) -> Result<HumanDescription, RigError> {
    let unmapped: Vec<String> = bones
        .iter()
        .filter(|b| table.role_for(&b.name).is_none())
        .map(|b| b.name.clone())
        .collect();
    if !unmapped.is_empty() {
        return Err(RigError::IncompleteMapping { unmapped });
    }

    let mesh_bones: HashSet<&str> = bones.iter().map(|b| b.name.as_str()).collect();
    let mut human = Vec::with_capacity(table.len());
    for record in table.records() {
        if mesh_bones.contains(record.bone_name.as_str()) {
            human.push(HumanBone {
                bone_name: record.bone_name.clone(),
                human_name: record.human_name.clone(),
                use_default_limits: true,
            });
        } else {
            warn!(
                "Bone '{}' ({}) is not present in the mesh, skipping",
                record.bone_name, record.human_name
            );
        }
    }

    let heels = on_heels.then(|| HeelAdjustment::from_angle(config.heel_angle));
    let skeleton = build_skeleton(bones, heels.as_ref());
    debug!(
        "Built human description: {} bones, {} roles, on_heels={}",
        skeleton.len(),
        human.len(),
        on_heels
    );

    Ok(HumanDescription {
        human,
        skeleton,
        arm_stretch: config.arm_stretch,
        leg_stretch: config.leg_stretch,
        upper_arm_twist: config.upper_arm_twist,
        lower_arm_twist: config.lower_arm_twist,
        upper_leg_twist: config.upper_leg_twist,
        lower_leg_twist: config.lower_leg_twist,
        feet_spacing: config.feet_spacing,
    })
}

/// Standard and on-heels descriptions of one avatar, built together.
#[derive(Debug, Clone)]
pub struct AvatarRig {
    pub standard: HumanDescription,
    pub on_heels: HumanDescription,
    outfits_with_heels: Vec<String>,
}

impl AvatarRig {
    pub fn build(bones: &[MeshBone], table: &BoneRoleTable, config: &RigConfig) -> Result<Self, RigError> {
        Ok(Self {
            standard: build_human_description(bones, table, config, false)?,
            on_heels: build_human_description(bones, table, config, true)?,
            outfits_with_heels: config.outfits_with_heels.clone(),
        })
    }

    /// Description to animate with while `outfit` is worn.
    pub fn description_for_outfit(&self, outfit: Option<&str>) -> &HumanDescription {
        match outfit {
            Some(name) if self.outfits_with_heels.iter().any(|o| o == name) => &self.on_heels,
            _ => &self.standard,
        }
    }
}
