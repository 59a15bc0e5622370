//! Tool settings with persistence
//!
//! Settings are read from `--config <file>` or `~/.config/avatarkit/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use avatarkit_material::RenderPipeline;
use avatarkit_rig::RigConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All tool settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    pub paths: PathSettings,
    pub rendering: RenderingSettings,
    pub rig: RigConfig,
}

impl AvatarSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("avatarkit"))
    }

    /// Get the default settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from `path`, or the default location, falling back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let Some(p) = Self::settings_path() else {
                    warn!("Could not determine config directory");
                    return Self::default();
                };
                p
            }
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Where inputs live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Root of generated avatars, outfits, and haircuts
    pub storage_root: PathBuf,
    /// Bone name to humanoid role table
    pub bone_table: PathBuf,
    /// Template/shader catalog; the built-in catalog is used when unset
    pub resources: Option<PathBuf>,
}

impl Default for PathSettings {
    fn default() -> Self {
        let data = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("avatarkit");
        Self {
            bone_table: data.join("human_bones.txt"),
            storage_root: data.join("avatars"),
            resources: None,
        }
    }
}

/// Render pipeline the materials target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingSettings {
    pub pipeline: RenderPipeline,
}
