use std::path::{Path, PathBuf};

use tracing::info;

/// Files produced for a generated full-body avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarFileKind {
    Texture,
    MetallnessMap,
    RoughnessMap,
    NormalMap,
    Mesh,
}

/// Files shipped with each outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutfitFileKind {
    Texture,
    MetallnessMap,
    RoughnessMap,
    NormalMap,
    BodyVisibilityMask,
}

/// Files shipped with each haircut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaircutFileKind {
    Texture,
}

/// Resolves where avatar, outfit, and haircut files live on disk.
///
/// Layout:
/// - `<base>/<avatar_code>/{texture,metallness,roughness,normal_map}.png`, `model.glb`
/// - `<outfit_dir>/<name>/<name>[_metallness|_roughness|_normal_map|_body_visibility_mask].png`
/// - `<haircut_dir>/<name>/<name>.png`
///
/// Outfit and haircut directories are resolved against the base path when relative.
#[derive(Debug, Clone)]
pub struct AvatarStorage {
    base_path: PathBuf,
}

impl AvatarStorage {
    /// Create a new AvatarStorage rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("AvatarStorage created with base path: {}", base_path.display());
        Self { base_path }
    }

    /// Resolve a relative path against the base path.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Directory holding everything generated for one avatar.
    pub fn avatar_dir(&self, avatar_code: &str) -> PathBuf {
        self.base_path.join(avatar_code)
    }

    pub fn avatar_file(&self, avatar_code: &str, kind: AvatarFileKind) -> PathBuf {
        let file = match kind {
            AvatarFileKind::Texture => "texture.png",
            AvatarFileKind::MetallnessMap => "metallness.png",
            AvatarFileKind::RoughnessMap => "roughness.png",
            AvatarFileKind::NormalMap => "normal_map.png",
            AvatarFileKind::Mesh => "model.glb",
        };
        self.avatar_dir(avatar_code).join(file)
    }

    pub fn outfit_file(&self, outfit_dir: &Path, outfit_name: &str, kind: OutfitFileKind) -> PathBuf {
        let suffix = match kind {
            OutfitFileKind::Texture => "",
            OutfitFileKind::MetallnessMap => "_metallness",
            OutfitFileKind::RoughnessMap => "_roughness",
            OutfitFileKind::NormalMap => "_normal_map",
            OutfitFileKind::BodyVisibilityMask => "_body_visibility_mask",
        };
        self.resolve(outfit_dir)
            .join(outfit_name)
            .join(format!("{}{}.png", outfit_name, suffix))
    }

    pub fn haircut_file(&self, haircut_dir: &Path, haircut_name: &str, kind: HaircutFileKind) -> PathBuf {
        match kind {
            HaircutFileKind::Texture => self
                .resolve(haircut_dir)
                .join(haircut_name)
                .join(format!("{}.png", haircut_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_files_live_in_avatar_dir() {
        let storage = AvatarStorage::new("/data/avatars");
        assert_eq!(
            storage.avatar_file("abc", AvatarFileKind::RoughnessMap),
            PathBuf::from("/data/avatars/abc/roughness.png")
        );
        assert_eq!(
            storage.avatar_file("abc", AvatarFileKind::Mesh),
            PathBuf::from("/data/avatars/abc/model.glb")
        );
    }

    #[test]
    fn outfit_relative_dir_resolves_against_base() {
        let storage = AvatarStorage::new("/data/avatars");
        assert_eq!(
            storage.outfit_file(Path::new("outfits"), "outfit_0", OutfitFileKind::BodyVisibilityMask),
            PathBuf::from("/data/avatars/outfits/outfit_0/outfit_0_body_visibility_mask.png")
        );
    }

    #[test]
    fn outfit_absolute_dir_is_kept() {
        let storage = AvatarStorage::new("/data/avatars");
        assert_eq!(
            storage.outfit_file(Path::new("/shared/outfits"), "outfit_2", OutfitFileKind::Texture),
            PathBuf::from("/shared/outfits/outfit_2/outfit_2.png")
        );
    }

    #[test]
    fn haircut_texture_path() {
        let storage = AvatarStorage::new("/data/avatars");
        assert_eq!(
            storage.haircut_file(Path::new("haircuts"), "balding", HaircutFileKind::Texture),
            PathBuf::from("/data/avatars/haircuts/balding/balding.png")
        );
    }
}
