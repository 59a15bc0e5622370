use serde::{Deserialize, Serialize};

/// Render pipeline the materials are prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderPipeline {
    #[default]
    Default,
    Urp,
    Lwrp,
    Hdrp,
}

impl RenderPipeline {
    /// Pick the pipeline from the type name of the active render pipeline asset.
    /// No asset means the built-in pipeline.
    pub fn detect(asset_type_name: Option<&str>) -> Self {
        match asset_type_name {
            Some(name) if name.contains("HDRenderPipelineAsset") => Self::Hdrp,
            Some(name) if name.contains("LightweightRenderPipelineAsset") => Self::Lwrp,
            Some(name) if name.contains("UniversalRenderPipelineAsset") => Self::Urp,
            _ => Self::Default,
        }
    }

    fn is_universal(self) -> bool {
        matches!(self, Self::Urp | Self::Lwrp)
    }
}

/// Template materials shipped with the avatar resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialTemplate {
    Body,
    BodyPbr,
    Outfit,
    Haircut,
}

impl MaterialTemplate {
    pub const ALL: [MaterialTemplate; 4] = [Self::Body, Self::BodyPbr, Self::Outfit, Self::Haircut];

    fn stem(self) -> &'static str {
        match self {
            Self::Body => "avatar_sdk_template_body_material",
            Self::BodyPbr => "avatar_sdk_template_body_pbr_material",
            Self::Outfit => "avatar_sdk_template_outfit_material",
            Self::Haircut => "avatar_sdk_template_haircut_material",
        }
    }
}

/// Dedicated hair shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    HairStrandsLit,
    HairSolidLit,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 2] = [Self::HairStrandsLit, Self::HairSolidLit];
}

/// Resource names that depend on the render pipeline. Computed once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct PipelineTraits {
    pipeline: RenderPipeline,
    material_names: [String; 4],
    shader_names: [String; 2],
}

impl PipelineTraits {
    pub fn new(pipeline: RenderPipeline) -> Self {
        let (directory, material_suffix, shader_suffix) = if pipeline.is_universal() {
            ("urp/", "_urp", "URP")
        } else {
            ("", "", "")
        };
        let separator = if pipeline.is_universal() { "/" } else { "" };

        let material_names = MaterialTemplate::ALL
            .map(|t| format!("fullbody_materials/{}{}{}", directory, t.stem(), material_suffix));
        let shader_names = ShaderKind::ALL.map(|k| {
            let stem = match k {
                ShaderKind::HairStrandsLit => "HaircutStrandsLit",
                ShaderKind::HairSolidLit => "HaircutSolidLit",
            };
            format!("Avatar SDK/{}{}{}{}Shader", shader_suffix, separator, stem, shader_suffix)
        });

        Self {
            pipeline,
            material_names,
            shader_names,
        }
    }

    pub fn material_name(&self, template: MaterialTemplate) -> &str {
        let i = match template {
            MaterialTemplate::Body => 0,
            MaterialTemplate::BodyPbr => 1,
            MaterialTemplate::Outfit => 2,
            MaterialTemplate::Haircut => 3,
        };
        &self.material_names[i]
    }

    pub fn shader_name(&self, kind: ShaderKind) -> &str {
        match kind {
            ShaderKind::HairStrandsLit => &self.shader_names[0],
            ShaderKind::HairSolidLit => &self.shader_names[1],
        }
    }

    /// Slot the main color texture is bound to.
    pub fn main_texture_slot(&self) -> &'static str {
        match self.pipeline {
            RenderPipeline::Urp => "_BaseMap",
            _ => "_MainTex",
        }
    }

    /// Shader the pipeline's template materials are authored with.
    pub fn default_shader(&self) -> &'static str {
        match self.pipeline {
            RenderPipeline::Default => "Standard",
            RenderPipeline::Urp | RenderPipeline::Lwrp => "Universal Render Pipeline/Lit",
            RenderPipeline::Hdrp => "HDRP/Lit",
        }
    }
}

impl Default for PipelineTraits {
    fn default() -> Self {
        Self::new(RenderPipeline::Default)
    }
}
