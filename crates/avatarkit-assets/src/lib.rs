//! avatarkit Assets - Asset loading for generated avatars
//!
//! Provides texture decoding (blocking and async), glTF skin extraction,
//! and the on-disk layout of avatar, outfit, and haircut files.

mod error;
mod gltf_loader;
mod storage;
mod texture;

pub use error::AssetError;
pub use gltf_loader::{load_skin, SkinContents};
pub use storage::{AvatarFileKind, AvatarStorage, HaircutFileKind, OutfitFileKind};
pub use texture::{load_normal_map_async, load_texture, load_texture_async, TextureAsset, TextureKind};
