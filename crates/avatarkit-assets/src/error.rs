use std::path::PathBuf;

/// Errors that can occur during asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to load glTF file '{0}': {1}")]
    GltfLoadFailed(PathBuf, String),

    #[error("glTF file '{0}' contains no skin")]
    NoSkin(PathBuf),

    #[error("failed to load image '{0}': {1}")]
    ImageLoadFailed(PathBuf, String),

    #[error("failed to save image '{0}': {1}")]
    ImageSaveFailed(PathBuf, String),

    #[error("background load of '{0}' did not complete: {1}")]
    TaskFailed(PathBuf, String),
}
