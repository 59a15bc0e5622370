use crate::pipeline::{MaterialTemplate, PipelineTraits, ShaderKind};

const STRAND_HAIRCUTS: &[&str] = &[
    "wavy_bob",
    "very_long",
    "shoulder_length",
    "short_parted",
    "short_curls",
    "roman",
    "rasta",
    "mid_length_straight2",
    "mid_length_ruffled",
    "corkscrew_curls",
    "bob_parted",
];

const SOLID_HAIRCUTS: &[&str] = &[
    "short_slick",
    "mid_length_wispy",
    "long_crimped",
    "balding",
    "short_disheveled",
    "ponytail_with_bangs",
    "mid_length_straight",
    "long_wavy",
    "long_disheveled",
    "short_simple",
    "generated",
];

/// Shading style for a haircut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HairShader {
    /// Alpha-blended strand cards.
    Strands,
    /// Solid mesh drawn in the transparent queue.
    Solid,
    /// The pipeline's haircut template material.
    Standard,
}

impl HairShader {
    pub fn for_haircut(name: &str) -> Self {
        if STRAND_HAIRCUTS.contains(&name) {
            Self::Strands
        } else if SOLID_HAIRCUTS.contains(&name) {
            Self::Solid
        } else {
            Self::Standard
        }
    }

    pub fn shader_kind(self) -> Option<ShaderKind> {
        match self {
            Self::Strands => Some(ShaderKind::HairStrandsLit),
            Self::Solid => Some(ShaderKind::HairSolidLit),
            Self::Standard => None,
        }
    }

    /// Name of the resource backing this style: the dedicated shader, or the
    /// haircut template material for [`HairShader::Standard`].
    pub fn resource_name(self, traits: &PipelineTraits) -> &str {
        match self.shader_kind() {
            Some(kind) => traits.shader_name(kind),
            None => traits.material_name(MaterialTemplate::Haircut),
        }
    }
}
