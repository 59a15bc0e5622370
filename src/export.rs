//! Writes composed materials and skeleton descriptions to disk
//!
//! Each texture slot becomes `<prefix><slot>.png` (slot names start with an
//! underscore, so `haircut` + `_MainTex`); the material itself is described by
//! `<prefix>_material.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use avatarkit_assets::TextureKind;
use avatarkit_material::{ComposedMaterial, MaterialWarning};
use avatarkit_rig::HumanDescription;
use serde::Serialize;
use tracing::info;

/// JSON manifest of an exported material
#[derive(Debug, Serialize)]
pub struct MaterialManifest {
    pub name: String,
    pub shader: String,
    pub render_queue: Option<i32>,
    pub textures: Vec<TextureEntry>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TextureEntry {
    pub slot: String,
    pub file: String,
    pub width: u32,
    pub height: u32,
    pub normal_map: bool,
}

/// Export every texture of the material plus its manifest into `dir`.
pub fn export_material(composed: &ComposedMaterial, dir: &Path, prefix: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let material = &composed.material;
    let mut textures = Vec::new();
    for (slot, texture) in material.textures() {
        let file = format!("{}{}.png", prefix, slot);
        texture
            .save(&dir.join(&file))
            .with_context(|| format!("Failed to export {} texture", slot))?;
        textures.push(TextureEntry {
            slot: slot.to_string(),
            file,
            width: texture.width,
            height: texture.height,
            normal_map: texture.kind == TextureKind::NormalMap,
        });
    }

    let manifest = MaterialManifest {
        name: material.name.clone(),
        shader: material.shader.clone(),
        render_queue: material.render_queue,
        textures,
        warnings: composed.warnings.iter().map(describe_warning).collect(),
    };
    let path = dir.join(format!("{}_material.json", prefix));
    fs::write(&path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Exported material '{}' to {:?}", material.name, path);
    Ok(path)
}

/// Human-readable form of a skipped step.
pub fn describe_warning(warning: &MaterialWarning) -> String {
    match warning {
        MaterialWarning::InputAbsent(channel) => format!("{} not provided", channel),
        MaterialWarning::LoadFailed { channel, reason } => format!("{} failed to load: {}", channel, reason),
        MaterialWarning::DimensionMismatch {
            channel,
            expected,
            found,
        } => format!(
            "{} is {}x{}, expected {}x{}",
            channel, found.0, found.1, expected.0, expected.1
        ),
        MaterialWarning::ShaderFallback { shader } => {
            format!("{} unavailable, used standard haircut material", shader)
        }
    }
}

/// Write a skeleton description as pretty JSON, or print it when `out` is `None`.
pub fn export_description(description: &HumanDescription, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(description)?;
    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote skeleton description to {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
