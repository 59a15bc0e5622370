use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::MaterialError;
use crate::pipeline::{MaterialTemplate, PipelineTraits, ShaderKind};

/// A template material: the shader to instantiate and its render queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDef {
    pub shader: String,
    #[serde(default)]
    pub render_queue: Option<i32>,
}

/// Looks up template materials and shaders by name.
///
/// Implementations are read-only after construction and shared between
/// concurrent material builds.
pub trait ResourceResolver: Send + Sync {
    fn material_template(&self, name: &str) -> Option<TemplateDef>;

    fn has_shader(&self, name: &str) -> bool;
}

/// Named templates and shaders available to the compositor.
///
/// Loaded from a TOML file:
///
/// ```toml
/// shaders = ["Avatar SDK/HaircutSolidLitShader"]
///
/// [templates."fullbody_materials/avatar_sdk_template_body_material"]
/// shader = "Standard"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCatalog {
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateDef>,
    #[serde(default)]
    pub shaders: BTreeSet<String>,
}

impl ResourceCatalog {
    /// Every template and hair shader the pipeline names, on the pipeline's default shader.
    pub fn builtin(traits: &PipelineTraits) -> Self {
        let templates = MaterialTemplate::ALL
            .iter()
            .map(|&t| {
                (
                    traits.material_name(t).to_string(),
                    TemplateDef {
                        shader: traits.default_shader().to_string(),
                        render_queue: None,
                    },
                )
            })
            .collect();
        let shaders = ShaderKind::ALL
            .iter()
            .map(|&k| traits.shader_name(k).to_string())
            .collect();
        Self { templates, shaders }
    }

    pub fn load(path: &Path) -> Result<Self, MaterialError> {
        if !path.exists() {
            return Err(MaterialError::MissingResource(path.display().to_string()));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| MaterialError::InvalidCatalog(path.to_path_buf(), e.to_string()))?;
        let catalog: Self = toml::from_str(&content)
            .map_err(|e| MaterialError::InvalidCatalog(path.to_path_buf(), e.to_string()))?;
        info!(
            "Loaded resource catalog {:?}: {} templates, {} shaders",
            path,
            catalog.templates.len(),
            catalog.shaders.len()
        );
        Ok(catalog)
    }
}

impl ResourceResolver for ResourceCatalog {
    fn material_template(&self, name: &str) -> Option<TemplateDef> {
        self.templates.get(name).cloned()
    }

    fn has_shader(&self, name: &str) -> bool {
        self.shaders.contains(name)
    }
}
