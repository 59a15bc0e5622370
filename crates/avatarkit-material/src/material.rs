use std::collections::BTreeMap;
use std::sync::Arc;

use avatarkit_assets::TextureAsset;

use crate::resources::TemplateDef;

pub const METALLIC_GLOSS_MAP: &str = "_MetallicGlossMap";
pub const BUMP_MAP: &str = "_BumpMap";
pub const EMISSION_MAP: &str = "_EmissionMap";
/// Slot used by the dedicated hair shaders regardless of pipeline.
pub const HAIR_MAIN_TEX: &str = "_MainTex";

/// Render queue for alpha-blended geometry.
pub const RENDER_QUEUE_TRANSPARENT: i32 = 3000;

/// A material instance ready to hand to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub shader: String,
    pub render_queue: Option<i32>,
    textures: BTreeMap<String, Arc<TextureAsset>>,
}

impl Material {
    /// Instantiate a template material.
    pub fn from_template(name: impl Into<String>, template: &TemplateDef) -> Self {
        Self {
            name: name.into(),
            shader: template.shader.clone(),
            render_queue: template.render_queue,
            textures: BTreeMap::new(),
        }
    }

    /// A bare material on the given shader.
    pub fn with_shader(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            render_queue: None,
            textures: BTreeMap::new(),
        }
    }

    pub fn set_texture(&mut self, slot: &str, texture: impl Into<Arc<TextureAsset>>) {
        self.textures.insert(slot.to_string(), texture.into());
    }

    pub fn texture(&self, slot: &str) -> Option<&Arc<TextureAsset>> {
        self.textures.get(slot)
    }

    /// Bound slots in name order.
    pub fn textures(&self) -> impl Iterator<Item = (&str, &Arc<TextureAsset>)> {
        self.textures.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
