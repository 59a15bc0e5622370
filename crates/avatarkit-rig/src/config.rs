use serde::{Deserialize, Serialize};

/// Muscle settings and heel handling for humanoid descriptions.
/// Maps to the `[rig]` table of the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub arm_stretch: f32,
    pub leg_stretch: f32,
    pub upper_arm_twist: f32,
    pub lower_arm_twist: f32,
    pub upper_leg_twist: f32,
    pub lower_leg_twist: f32,
    pub feet_spacing: f32,
    /// Ankle pitch in degrees for the on-heels variant; feet get the negation.
    pub heel_angle: f32,
    /// Outfits whose shoes need the on-heels skeleton.
    pub outfits_with_heels: Vec<String>,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            arm_stretch: 0.05,
            leg_stretch: 0.05,
            upper_arm_twist: 0.5,
            lower_arm_twist: 0.5,
            upper_leg_twist: 0.5,
            lower_leg_twist: 0.5,
            feet_spacing: 0.0,
            heel_angle: 20.0,
            outfits_with_heels: ["outfit_0", "outfit_2", "outfit_0_lowpoly", "outfit_2_lowpoly"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl RigConfig {
    pub fn outfit_has_heels(&self, outfit_name: &str) -> bool {
        self.outfits_with_heels.iter().any(|o| o == outfit_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_heel_outfits() {
        let config = RigConfig::default();
        assert!(config.outfit_has_heels("outfit_2_lowpoly"));
        assert!(!config.outfit_has_heels("outfit_1"));
        assert_eq!(config.heel_angle, 20.0);
    }
}
