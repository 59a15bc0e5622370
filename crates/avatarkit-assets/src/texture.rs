use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AssetError;

/// How a consuming shader should interpret the texture's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureKind {
    #[default]
    Color,
    NormalMap,
}

/// A loaded texture asset with raw RGBA8 pixel data, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub kind: TextureKind,
}

impl TextureAsset {
    /// A texture of the given size with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
            kind: TextureKind::Color,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// RGBA value at (x, y). Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Write the texture to disk; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<(), AssetError> {
        image::save_buffer(
            path,
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| AssetError::ImageSaveFailed(path.to_path_buf(), e.to_string()))
    }
}

/// Load an image file and return it as an RGBA8 TextureAsset.
pub fn load_texture(path: &Path) -> Result<TextureAsset, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }

    let img = image::open(path)
        .map_err(|e| AssetError::ImageLoadFailed(path.to_path_buf(), e.to_string()))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("Loaded texture '{}' ({}x{})", path.display(), width, height);

    Ok(TextureAsset {
        width,
        height,
        data: rgba.into_raw(),
        kind: TextureKind::Color,
    })
}

/// Decode a texture on the blocking pool so the caller's task stays responsive.
pub async fn load_texture_async(path: impl Into<PathBuf>) -> Result<TextureAsset, AssetError> {
    let path = path.into();
    let task_path = path.clone();
    tokio::task::spawn_blocking(move || load_texture(&task_path))
        .await
        .map_err(|e| AssetError::TaskFailed(path, e.to_string()))?
}

/// Like [`load_texture_async`], but tags the result as a normal map.
pub async fn load_normal_map_async(path: impl Into<PathBuf>) -> Result<TextureAsset, AssetError> {
    let mut texture = load_texture_async(path).await?;
    texture.kind = TextureKind::NormalMap;
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("avatarkit-texture-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn filled_texture_has_uniform_pixels() {
        let tex = TextureAsset::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(tex.data.len(), 24);
        assert_eq!(tex.pixel(2, 1), [1, 2, 3, 4]);
        assert_eq!(tex.pixel_count(), 6);
    }

    #[test]
    fn missing_texture_is_not_found() {
        let result = load_texture(Path::new("/nonexistent/texture.png"));
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn saved_texture_loads_back() {
        let dir = temp_dir("save");
        let path = dir.join("checker.png");
        let mut tex = TextureAsset::filled(2, 2, [0, 0, 0, 255]);
        tex.set_pixel(1, 1, [255, 128, 0, 10]);
        tex.save(&path).unwrap();

        let loaded = load_texture(&path).unwrap();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.pixel(1, 1), [255, 128, 0, 10]);
        assert_eq!(loaded.kind, TextureKind::Color);
    }

    #[tokio::test]
    async fn normal_map_is_tagged() {
        let dir = temp_dir("normal");
        let path = dir.join("normal.png");
        TextureAsset::filled(1, 1, [128, 128, 255, 255]).save(&path).unwrap();

        let tex = load_normal_map_async(&path).await.unwrap();
        assert_eq!(tex.kind, TextureKind::NormalMap);
    }

    #[tokio::test]
    async fn async_load_reports_missing_file() {
        let result = load_texture_async("/nonexistent/async.png").await;
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }
}
