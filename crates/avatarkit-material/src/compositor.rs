use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use avatarkit_assets::{
    load_normal_map_async, load_texture_async, AvatarFileKind, AvatarStorage, HaircutFileKind,
    OutfitFileKind, TextureAsset,
};
use tracing::{debug, error, info, warn};

use crate::error::MaterialError;
use crate::hair::HairShader;
use crate::material::{
    Material, BUMP_MAP, EMISSION_MAP, HAIR_MAIN_TEX, METALLIC_GLOSS_MAP, RENDER_QUEUE_TRANSPARENT,
};
use crate::packing::{apply_visibility_mask, pack_roughness_into_metallic};
use crate::pipeline::{MaterialTemplate, PipelineTraits};
use crate::resources::ResourceResolver;

/// Texture inputs of a material build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureChannel {
    BaseColor,
    Normal,
    Metallic,
    Roughness,
    VisibilityMask,
}

impl fmt::Display for TextureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BaseColor => "base color",
            Self::Normal => "normal map",
            Self::Metallic => "metallic map",
            Self::Roughness => "roughness map",
            Self::VisibilityMask => "visibility mask",
        };
        f.write_str(name)
    }
}

/// A step that was skipped without failing the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialWarning {
    /// No path was given, or the file does not exist.
    InputAbsent(TextureChannel),
    LoadFailed {
        channel: TextureChannel,
        reason: String,
    },
    DimensionMismatch {
        channel: TextureChannel,
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// The dedicated shader is unavailable; the standard template was used instead.
    ShaderFallback { shader: String },
}

/// Texture paths and template for one material build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRequest {
    pub template: MaterialTemplate,
    pub base_color: PathBuf,
    pub normal: Option<PathBuf>,
    pub metallic: Option<PathBuf>,
    pub roughness: Option<PathBuf>,
    pub visibility_mask: Option<PathBuf>,
}

impl MaterialRequest {
    pub fn new(template: MaterialTemplate, base_color: impl Into<PathBuf>) -> Self {
        Self {
            template,
            base_color: base_color.into(),
            normal: None,
            metallic: None,
            roughness: None,
            visibility_mask: None,
        }
    }

    pub fn with_normal(mut self, path: impl Into<PathBuf>) -> Self {
        self.normal = Some(path.into());
        self
    }

    pub fn with_metallic(mut self, path: impl Into<PathBuf>) -> Self {
        self.metallic = Some(path.into());
        self
    }

    pub fn with_roughness(mut self, path: impl Into<PathBuf>) -> Self {
        self.roughness = Some(path.into());
        self
    }

    pub fn with_visibility_mask(mut self, path: impl Into<PathBuf>) -> Self {
        self.visibility_mask = Some(path.into());
        self
    }
}

/// A finished material and the steps that were skipped while building it.
#[derive(Debug, Clone)]
pub struct ComposedMaterial {
    pub material: Material,
    pub warnings: Vec<MaterialWarning>,
}

impl ComposedMaterial {
    fn warn(&mut self, warning: MaterialWarning) {
        warn!("{}: {:?}", self.material.name, warning);
        self.warnings.push(warning);
    }
}

/// Builds avatar materials from texture files.
///
/// Cheap to clone; clones share the read-only name tables and resolver, so
/// independent requests can run concurrently.
#[derive(Clone)]
pub struct MaterialCompositor {
    traits: Arc<PipelineTraits>,
    resources: Arc<dyn ResourceResolver>,
}

impl MaterialCompositor {
    pub fn new(traits: PipelineTraits, resources: Arc<dyn ResourceResolver>) -> Self {
        Self {
            traits: Arc::new(traits),
            resources,
        }
    }

    fn instantiate(&self, template: MaterialTemplate) -> Result<Material, MaterialError> {
        let name = self.traits.material_name(template);
        match self.resources.material_template(name) {
            Some(def) => Ok(Material::from_template(name, &def)),
            None => {
                error!("Template material '{}' isn't found", name);
                Err(MaterialError::MissingResource(name.to_string()))
            }
        }
    }

    /// Build a material from the request's template and textures.
    ///
    /// Only a missing template fails the build; every texture problem is
    /// reported as a warning and the dependent step is skipped.
    pub async fn compose(&self, request: MaterialRequest) -> Result<ComposedMaterial, MaterialError> {
        let material = self.instantiate(request.template)?;
        let mut composed = ComposedMaterial {
            material,
            warnings: Vec::new(),
        };
        let main_slot = self.traits.main_texture_slot();

        let base = match load_texture_async(&request.base_color).await {
            Ok(texture) => Some(texture),
            Err(e) => {
                composed.warn(MaterialWarning::LoadFailed {
                    channel: TextureChannel::BaseColor,
                    reason: e.to_string(),
                });
                None
            }
        };

        let metallic = load_optional(&mut composed, TextureChannel::Metallic, request.metallic.as_deref()).await;
        let roughness =
            load_optional(&mut composed, TextureChannel::Roughness, request.roughness.as_deref()).await;
        if let (Some(mut metallic), Some(roughness)) = (metallic, roughness) {
            match pack_roughness_into_metallic(&mut metallic, &roughness) {
                Ok(()) => composed.material.set_texture(METALLIC_GLOSS_MAP, metallic),
                Err(MaterialError::DimensionMismatch { expected, found }) => {
                    composed.warn(MaterialWarning::DimensionMismatch {
                        channel: TextureChannel::Roughness,
                        expected,
                        found,
                    })
                }
                Err(e) => return Err(e),
            }
        }

        match request.normal.as_deref() {
            Some(path) => match load_normal_map_async(path).await {
                Ok(normal) => composed.material.set_texture(BUMP_MAP, normal),
                Err(e) => composed.warn(MaterialWarning::LoadFailed {
                    channel: TextureChannel::Normal,
                    reason: e.to_string(),
                }),
            },
            None => composed.warn(MaterialWarning::InputAbsent(TextureChannel::Normal)),
        }

        // The mask only exists for bodies worn under an outfit, so no warning when absent.
        let mut base = base;
        if let Some(mask_path) = request.visibility_mask.as_deref() {
            if let Some(mask) =
                load_optional(&mut composed, TextureChannel::VisibilityMask, Some(mask_path)).await
            {
                match base.as_ref().map(|body| apply_visibility_mask(body, &mask)) {
                    Some(Ok(cut)) => base = Some(cut),
                    Some(Err(MaterialError::DimensionMismatch { expected, found })) => {
                        composed.warn(MaterialWarning::DimensionMismatch {
                            channel: TextureChannel::VisibilityMask,
                            expected,
                            found,
                        })
                    }
                    Some(Err(e)) => return Err(e),
                    None => debug!("No base color to apply the visibility mask to"),
                }
            }
        }

        if let Some(base) = base {
            composed.material.set_texture(main_slot, base);
        }

        info!(
            "Composed material '{}' with {} textures ({} warnings)",
            composed.material.name,
            composed.material.texture_count(),
            composed.warnings.len()
        );
        Ok(composed)
    }

    /// Body material for a generated avatar, with PBR maps when requested.
    pub async fn prepare_body_material(
        &self,
        storage: &AvatarStorage,
        avatar_code: &str,
        with_pbr: bool,
    ) -> Result<ComposedMaterial, MaterialError> {
        let template = if with_pbr {
            MaterialTemplate::BodyPbr
        } else {
            MaterialTemplate::Body
        };
        let mut request = MaterialRequest::new(template, storage.avatar_file(avatar_code, AvatarFileKind::Texture));
        if with_pbr {
            request.metallic = Some(storage.avatar_file(avatar_code, AvatarFileKind::MetallnessMap));
            request.roughness = Some(storage.avatar_file(avatar_code, AvatarFileKind::RoughnessMap));
            request.normal = Some(storage.avatar_file(avatar_code, AvatarFileKind::NormalMap));
        }
        self.compose(existing_inputs(request)).await
    }

    /// Outfit material, with PBR maps when requested.
    pub async fn prepare_outfit_material(
        &self,
        storage: &AvatarStorage,
        outfit_dir: &Path,
        outfit_name: &str,
        with_pbr: bool,
    ) -> Result<ComposedMaterial, MaterialError> {
        let file = |kind| storage.outfit_file(outfit_dir, outfit_name, kind);
        let mut request = MaterialRequest::new(MaterialTemplate::Outfit, file(OutfitFileKind::Texture));
        if with_pbr {
            request.metallic = Some(file(OutfitFileKind::MetallnessMap));
            request.roughness = Some(file(OutfitFileKind::RoughnessMap));
            request.normal = Some(file(OutfitFileKind::NormalMap));
        }
        self.compose(existing_inputs(request)).await
    }

    /// Body texture with the parts covered by the outfit made transparent.
    ///
    /// Returns `None` when the outfit ships no visibility mask or it cannot be read.
    pub async fn prepare_transparent_body_texture(
        &self,
        storage: &AvatarStorage,
        opaque_body: &TextureAsset,
        outfit_dir: &Path,
        outfit_name: &str,
    ) -> Result<Option<TextureAsset>, MaterialError> {
        let mask_path = storage.outfit_file(outfit_dir, outfit_name, OutfitFileKind::BodyVisibilityMask);
        if !mask_path.exists() {
            warn!("Body visibility mask not found: {}", mask_path.display());
            return Ok(None);
        }

        let mask = match load_texture_async(&mask_path).await {
            Ok(mask) => mask,
            Err(e) => {
                warn!("Unable to load body visibility mask: {}", e);
                return Ok(None);
            }
        };
        apply_visibility_mask(opaque_body, &mask).map(Some)
    }

    /// Haircut material on the shader its style calls for.
    ///
    /// Falls back to the standard haircut template whenever the dedicated
    /// shader cannot be resolved.
    pub async fn prepare_hair_material(
        &self,
        storage: &AvatarStorage,
        haircut_dir: &Path,
        haircut_name: &str,
    ) -> Result<ComposedMaterial, MaterialError> {
        let texture_path = storage.haircut_file(haircut_dir, haircut_name, HaircutFileKind::Texture);
        let texture = load_texture_async(&texture_path).await.map_err(|e| {
            error!("Unable to load texture for {} haircut", haircut_name);
            MaterialError::TextureUnavailable(texture_path.clone(), e)
        })?;
        let texture = Arc::new(texture);

        let style = HairShader::for_haircut(haircut_name);
        let mut warnings = Vec::new();

        if let Some(kind) = style.shader_kind() {
            let shader = self.traits.shader_name(kind);
            if self.resources.has_shader(shader) {
                let mut material = Material::with_shader(format!("{}_material", haircut_name), shader);
                if style == HairShader::Solid {
                    material.render_queue = Some(RENDER_QUEUE_TRANSPARENT);
                }
                material.set_texture(HAIR_MAIN_TEX, texture);
                debug!("Haircut '{}' uses {}", haircut_name, shader);
                return Ok(ComposedMaterial { material, warnings });
            }

            error!("{} shader wasn't found. Use standard shader for haircut.", shader);
            warnings.push(MaterialWarning::ShaderFallback {
                shader: shader.to_string(),
            });
        }

        let mut material = self.instantiate(MaterialTemplate::Haircut)?;
        material.set_texture(self.traits.main_texture_slot(), Arc::clone(&texture));
        material.set_texture(EMISSION_MAP, texture);
        Ok(ComposedMaterial { material, warnings })
    }
}

/// Load an optional input, recording a warning when it is absent or unreadable.
async fn load_optional(
    composed: &mut ComposedMaterial,
    channel: TextureChannel,
    path: Option<&Path>,
) -> Option<TextureAsset> {
    let Some(path) = path else {
        composed.warn(MaterialWarning::InputAbsent(channel));
        return None;
    };
    match load_texture_async(path).await {
        Ok(texture) => Some(texture),
        Err(e) => {
            composed.warn(MaterialWarning::LoadFailed {
                channel,
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Drop optional inputs whose files do not exist so they count as absent.
fn existing_inputs(mut request: MaterialRequest) -> MaterialRequest {
    for slot in [
        &mut request.normal,
        &mut request.metallic,
        &mut request.roughness,
        &mut request.visibility_mask,
    ] {
        if slot.as_deref().is_some_and(|p| !p.exists()) {
            debug!("Texture not found: {:?}", slot);
            *slot = None;
        }
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{RenderPipeline, ShaderKind};
    use crate::resources::ResourceCatalog;
    use avatarkit_assets::TextureKind;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("avatarkit-compose-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, name: &str, texture: &TextureAsset) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        texture.save(&path).unwrap();
        path
    }

    fn compositor(pipeline: RenderPipeline) -> MaterialCompositor {
        let traits = PipelineTraits::new(pipeline);
        let catalog = ResourceCatalog::builtin(&traits);
        MaterialCompositor::new(traits, Arc::new(catalog))
    }

    #[tokio::test]
    async fn base_color_only_sets_main_slot() {
        let dir = temp_dir("base-only");
        let base = write(&dir, "base.png", &TextureAsset::filled(2, 2, [90, 60, 30, 255]));

        let composed = compositor(RenderPipeline::Default)
            .compose(MaterialRequest::new(MaterialTemplate::Outfit, base))
            .await
            .unwrap();

        let material = &composed.material;
        assert_eq!(material.texture_count(), 1);
        let main = material.texture("_MainTex").unwrap();
        assert!(main.data.chunks(4).all(|px| px == [90, 60, 30, 255]));
        assert!(material.texture(METALLIC_GLOSS_MAP).is_none());
        assert!(material.texture(BUMP_MAP).is_none());
        assert!(composed
            .warnings
            .contains(&MaterialWarning::InputAbsent(TextureChannel::Metallic)));
        assert!(composed
            .warnings
            .contains(&MaterialWarning::InputAbsent(TextureChannel::Normal)));
    }

    #[tokio::test]
    async fn pbr_inputs_are_packed_and_bound() {
        let dir = temp_dir("pbr");
        let base = write(&dir, "base.png", &TextureAsset::filled(4, 4, [255; 4]));
        let metallic = write(&dir, "metallic.png", &TextureAsset::filled(4, 4, [30, 30, 30, 255]));
        let roughness = write(&dir, "roughness.png", &TextureAsset::filled(4, 4, [64, 64, 64, 255]));
        let normal = write(&dir, "normal.png", &TextureAsset::filled(4, 4, [128, 128, 255, 255]));

        let request = MaterialRequest::new(MaterialTemplate::BodyPbr, base)
            .with_metallic(metallic)
            .with_roughness(roughness)
            .with_normal(normal);
        let composed = compositor(RenderPipeline::Default).compose(request).await.unwrap();

        assert!(composed.warnings.is_empty(), "{:?}", composed.warnings);
        let packed = composed.material.texture(METALLIC_GLOSS_MAP).unwrap();
        assert!(packed.data.chunks(4).all(|px| px[3] == 191));
        let bump = composed.material.texture(BUMP_MAP).unwrap();
        assert_eq!(bump.kind, TextureKind::NormalMap);
    }

    #[tokio::test]
    async fn mismatched_pbr_maps_skip_packing_only() {
        let dir = temp_dir("mismatch");
        let base = write(&dir, "base.png", &TextureAsset::filled(4, 4, [255; 4]));
        let metallic = write(&dir, "metallic.png", &TextureAsset::filled(4, 4, [30, 30, 30, 255]));
        let roughness = write(&dir, "roughness.png", &TextureAsset::filled(2, 2, [64, 64, 64, 255]));
        let normal = write(&dir, "normal.png", &TextureAsset::filled(4, 4, [128, 128, 255, 255]));

        let request = MaterialRequest::new(MaterialTemplate::BodyPbr, base)
            .with_metallic(metallic)
            .with_roughness(roughness)
            .with_normal(normal);
        let composed = compositor(RenderPipeline::Default).compose(request).await.unwrap();

        assert_eq!(
            composed.warnings,
            vec![MaterialWarning::DimensionMismatch {
                channel: TextureChannel::Roughness,
                expected: (4, 4),
                found: (2, 2),
            }]
        );
        assert!(composed.material.texture(METALLIC_GLOSS_MAP).is_none());
        assert!(composed.material.texture(BUMP_MAP).is_some());
        assert!(composed.material.texture("_MainTex").is_some());
    }

    #[tokio::test]
    async fn visibility_mask_cuts_body_alpha() {
        let dir = temp_dir("mask");
        let base = write(&dir, "body.png", &TextureAsset::filled(2, 2, [200, 150, 120, 255]));
        let mut mask = TextureAsset::filled(2, 2, [255, 255, 255, 255]);
        mask.set_pixel(0, 0, [0, 0, 0, 255]);
        let mask = write(&dir, "mask.png", &mask);

        let request = MaterialRequest::new(MaterialTemplate::Body, base).with_visibility_mask(mask);
        let composed = compositor(RenderPipeline::Urp).compose(request).await.unwrap();

        let body = composed.material.texture("_BaseMap").unwrap();
        assert_eq!(body.pixel(0, 0)[3], 0);
        assert_eq!(body.pixel(1, 1)[3], 255);
        assert!(composed.material.texture("_MainTex").is_none());
    }

    #[tokio::test]
    async fn missing_template_fails() {
        let traits = PipelineTraits::default();
        let compositor = MaterialCompositor::new(traits, Arc::new(ResourceCatalog::default()));
        let err = compositor
            .compose(MaterialRequest::new(MaterialTemplate::Body, "/nonexistent/base.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, MaterialError::MissingResource(_)));
    }

    #[tokio::test]
    async fn unreadable_base_color_is_a_warning() {
        let composed = compositor(RenderPipeline::Default)
            .compose(MaterialRequest::new(MaterialTemplate::Body, "/nonexistent/base.png"))
            .await
            .unwrap();
        assert_eq!(composed.material.texture_count(), 0);
        assert!(matches!(
            composed.warnings[0],
            MaterialWarning::LoadFailed {
                channel: TextureChannel::BaseColor,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn independent_requests_run_concurrently() {
        let dir = temp_dir("concurrent");
        let body = write(&dir, "body.png", &TextureAsset::filled(2, 2, [1, 2, 3, 255]));
        let outfit = write(&dir, "outfit.png", &TextureAsset::filled(3, 3, [4, 5, 6, 255]));
        let compositor = compositor(RenderPipeline::Default);

        let (body, outfit) = tokio::join!(
            compositor.compose(MaterialRequest::new(MaterialTemplate::Body, body)),
            compositor.compose(MaterialRequest::new(MaterialTemplate::Outfit, outfit)),
        );

        assert_eq!(body.unwrap().material.texture("_MainTex").unwrap().width, 2);
        assert_eq!(outfit.unwrap().material.texture("_MainTex").unwrap().width, 3);
    }

    #[tokio::test]
    async fn body_material_from_storage() {
        let root = temp_dir("storage-body");
        let storage = AvatarStorage::new(&root);
        write(&root, "abc/texture.png", &TextureAsset::filled(2, 2, [255; 4]));
        write(&root, "abc/metallness.png", &TextureAsset::filled(2, 2, [0, 0, 0, 255]));
        write(&root, "abc/roughness.png", &TextureAsset::filled(2, 2, [255, 0, 0, 255]));

        let composed = compositor(RenderPipeline::Default)
            .prepare_body_material(&storage, "abc", true)
            .await
            .unwrap();

        assert_eq!(
            composed.material.name,
            "fullbody_materials/avatar_sdk_template_body_pbr_material"
        );
        let packed = composed.material.texture(METALLIC_GLOSS_MAP).unwrap();
        assert_eq!(packed.pixel(1, 1)[3], 0);
        assert_eq!(
            composed.warnings,
            vec![MaterialWarning::InputAbsent(TextureChannel::Normal)]
        );
    }

    #[tokio::test]
    async fn transparent_body_without_mask_is_none() {
        let root = temp_dir("storage-no-mask");
        let storage = AvatarStorage::new(&root);
        let body = TextureAsset::filled(2, 2, [255; 4]);
        let result = compositor(RenderPipeline::Default)
            .prepare_transparent_body_texture(&storage, &body, Path::new("outfits"), "outfit_1")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn transparent_body_uses_outfit_mask() {
        let root = temp_dir("storage-mask");
        let storage = AvatarStorage::new(&root);
        let mut mask = TextureAsset::filled(2, 2, [255; 4]);
        mask.set_pixel(0, 1, [0, 0, 0, 255]);
        write(&root, "outfits/outfit_0/outfit_0_body_visibility_mask.png", &mask);

        let body = TextureAsset::filled(2, 2, [10, 10, 10, 255]);
        let cut = compositor(RenderPipeline::Default)
            .prepare_transparent_body_texture(&storage, &body, Path::new("outfits"), "outfit_0")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cut.pixel(0, 1), [10, 10, 10, 0]);
        assert_eq!(cut.pixel(1, 1), [10, 10, 10, 255]);
    }

    #[tokio::test]
    async fn solid_haircut_uses_solid_shader() {
        let root = temp_dir("hair-solid");
        let storage = AvatarStorage::new(&root);
        write(&root, "haircuts/balding/balding.png", &TextureAsset::filled(2, 2, [40, 30, 20, 255]));

        let composed = compositor(RenderPipeline::Default)
            .prepare_hair_material(&storage, Path::new("haircuts"), "balding")
            .await
            .unwrap();

        assert_eq!(composed.material.shader, "Avatar SDK/HaircutSolidLitShader");
        assert_eq!(composed.material.render_queue, Some(RENDER_QUEUE_TRANSPARENT));
        assert!(composed.material.texture(HAIR_MAIN_TEX).is_some());
        assert!(composed.warnings.is_empty());
    }

    #[tokio::test]
    async fn strand_haircut_without_shader_falls_back() {
        let root = temp_dir("hair-fallback");
        let storage = AvatarStorage::new(&root);
        write(&root, "haircuts/rasta/rasta.png", &TextureAsset::filled(2, 2, [40, 30, 20, 255]));

        let traits = PipelineTraits::new(RenderPipeline::Urp);
        let mut catalog = ResourceCatalog::builtin(&traits);
        catalog.shaders.remove(traits.shader_name(ShaderKind::HairStrandsLit));
        let compositor = MaterialCompositor::new(traits, Arc::new(catalog));

        let composed = compositor
            .prepare_hair_material(&storage, Path::new("haircuts"), "rasta")
            .await
            .unwrap();

        assert_eq!(
            composed.material.name,
            "fullbody_materials/urp/avatar_sdk_template_haircut_material_urp"
        );
        assert!(composed.material.texture("_BaseMap").is_some());
        assert!(composed.material.texture(EMISSION_MAP).is_some());
        assert!(matches!(
            composed.warnings[0],
            MaterialWarning::ShaderFallback { .. }
        ));
    }

    #[tokio::test]
    async fn unknown_haircut_uses_standard_template() {
        let root = temp_dir("hair-standard");
        let storage = AvatarStorage::new(&root);
        write(&root, "haircuts/mohawk/mohawk.png", &TextureAsset::filled(1, 1, [0, 0, 0, 255]));

        let composed = compositor(RenderPipeline::Default)
            .prepare_hair_material(&storage, Path::new("haircuts"), "mohawk")
            .await
            .unwrap();

        assert_eq!(composed.material.shader, "Standard");
        assert!(composed.material.texture("_MainTex").is_some());
        assert!(composed.warnings.is_empty());
    }

    #[tokio::test]
    async fn haircut_without_texture_fails() {
        let root = temp_dir("hair-missing");
        let storage = AvatarStorage::new(&root);
        let err = compositor(RenderPipeline::Default)
            .prepare_hair_material(&storage, Path::new("haircuts"), "balding")
            .await
            .unwrap_err();
        assert!(matches!(err, MaterialError::TextureUnavailable(..)));
    }
}
