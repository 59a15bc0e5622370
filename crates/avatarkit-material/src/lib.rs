//! avatarkit Material - Material composition for avatars
//!
//! Loads body, outfit, and haircut textures asynchronously, packs PBR channels,
//! cuts outfit coverage out of the body texture, and binds everything to the
//! template materials and shaders of the active render pipeline.

mod compositor;
mod error;
mod hair;
mod material;
mod packing;
mod pipeline;
mod resources;

pub use compositor::{
    ComposedMaterial, MaterialCompositor, MaterialRequest, MaterialWarning, TextureChannel,
};
pub use error::MaterialError;
pub use hair::HairShader;
pub use material::{
    Material, BUMP_MAP, EMISSION_MAP, HAIR_MAIN_TEX, METALLIC_GLOSS_MAP, RENDER_QUEUE_TRANSPARENT,
};
pub use packing::{apply_visibility_mask, pack_roughness_into_metallic};
pub use pipeline::{MaterialTemplate, PipelineTraits, RenderPipeline, ShaderKind};
pub use resources::{ResourceCatalog, ResourceResolver, TemplateDef};
