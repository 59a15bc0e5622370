use std::path::PathBuf;

use avatarkit_assets::AssetError;

/// Errors that abort a material build.
#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    #[error("resource not found: {0}")]
    MissingResource(String),

    #[error("invalid resource catalog '{0}': {1}")]
    InvalidCatalog(PathBuf, String),

    #[error("texture '{0}' is unavailable: {1}")]
    TextureUnavailable(PathBuf, #[source] AssetError),

    #[error("texture size mismatch: expected {}x{}, found {}x{}", expected.0, expected.1, found.0, found.1)]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
}
