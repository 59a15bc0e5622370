use avatarkit_assets::TextureAsset;
use rayon::prelude::*;

use crate::error::MaterialError;

fn ensure_same_size(target: &TextureAsset, source: &TextureAsset) -> Result<(), MaterialError> {
    if target.dimensions() != source.dimensions() {
        return Err(MaterialError::DimensionMismatch {
            expected: target.dimensions(),
            found: source.dimensions(),
        });
    }
    Ok(())
}

/// Store smoothness (255 - roughness red) in the metallic map's alpha channel.
///
/// On size mismatch the metallic map is left untouched.
pub fn pack_roughness_into_metallic(
    metallic: &mut TextureAsset,
    roughness: &TextureAsset,
) -> Result<(), MaterialError> {
    ensure_same_size(metallic, roughness)?;

    metallic
        .data
        .par_chunks_exact_mut(4)
        .zip(roughness.data.par_chunks_exact(4))
        .for_each(|(m, r)| m[3] = 255 - r[0]);
    Ok(())
}

/// Copy of `body` whose alpha is the mask's red channel.
pub fn apply_visibility_mask(
    body: &TextureAsset,
    mask: &TextureAsset,
) -> Result<TextureAsset, MaterialError> {
    ensure_same_size(body, mask)?;

    let mut out = body.clone();
    out.data
        .par_chunks_exact_mut(4)
        .zip(mask.data.par_chunks_exact(4))
        .for_each(|(b, m)| b[3] = m[0]);
    Ok(out)
}
