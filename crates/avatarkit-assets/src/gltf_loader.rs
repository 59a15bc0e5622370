use std::collections::HashMap;
use std::path::Path;

use avatarkit_core::{Mat4, MeshBone};
use tracing::debug;

use crate::error::AssetError;

/// Bones of the first skin found in a glTF file.
pub struct SkinContents {
    pub name: String,
    pub bones: Vec<MeshBone>,
}

/// Load a glTF 2.0 file (.gltf or .glb) and extract the joints of its first skin,
/// in joint order, with their parent names and inverse bind matrices.
pub fn load_skin(path: &Path) -> Result<SkinContents, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }

    let (document, buffers, _images) = gltf::import(path)
        .map_err(|e| AssetError::GltfLoadFailed(path.to_path_buf(), e.to_string()))?;

    let skin = document
        .skins()
        .next()
        .ok_or_else(|| AssetError::NoSkin(path.to_path_buf()))?;

    let node_names: Vec<String> = document
        .nodes()
        .map(|n| match n.name() {
            Some(name) => name.to_string(),
            None => format!("node_{}", n.index()),
        })
        .collect();
    let node_name = |index: usize| -> String { node_names[index].clone() };

    // child node index -> parent node index
    let mut parents: HashMap<usize, usize> = HashMap::new();
    for node in document.nodes() {
        for child in node.children() {
            parents.insert(child.index(), node.index());
        }
    }

    let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
    let inverse_binds: Vec<Mat4> = reader
        .read_inverse_bind_matrices()
        .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
        .unwrap_or_default();

    let bones: Vec<MeshBone> = skin
        .joints()
        .enumerate()
        .map(|(i, joint)| MeshBone {
            name: node_name(joint.index()),
            parent: parents.get(&joint.index()).map(|&p| node_name(p)),
            // Missing inverse bind matrices default to identity.
            bind_pose: inverse_binds.get(i).copied().unwrap_or(Mat4::IDENTITY),
        })
        .collect();

    let name = skin.name().unwrap_or("unnamed").to_string();
    debug!(
        "glTF '{}': skin '{}' with {} joints",
        path.display(),
        name,
        bones.len()
    );

    Ok(SkinContents { name, bones })
}
