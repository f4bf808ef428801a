use crate::library::{AssetDescriptor, LibraryManifest};
use crate::map::AssetKey;
use crate::scene::decoder::{DecodedObject, MeshDecoder};
use crate::scene::types::{Material, Mesh};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Sub-meshes whose name contains one of these markers are structural
/// helpers (occluders, bounding boxes, alignment planes), not render
/// geometry.
const STRUCTURAL_MARKERS: [&str; 3] = ["occl", "box", "plane"];

/// Scoped owner of everything one decoder invocation created. Dropping the
/// workspace releases all scratch objects on every exit path; the
/// representative mesh must be copied out before that.
struct DecodeWorkspace {
    objects: Vec<DecodedObject>,
}

impl DecodeWorkspace {
    fn new(objects: Vec<DecodedObject>) -> Self {
        Self { objects }
    }

    /// Selection policy: drop structural sub-meshes, require at least one
    /// non-null material slot, then take the highest vertex count (the first
    /// encountered wins ties).
    fn select_representative(&self) -> Option<Mesh> {
        let mut best: Option<&DecodedObject> = None;
        let candidates = self
            .objects
            .iter()
            .filter(|object| {
                let lower = object.name.to_lowercase();
                !STRUCTURAL_MARKERS
                    .iter()
                    .any(|marker| lower.contains(marker))
            })
            .filter(|object| object.has_material());

        for candidate in candidates {
            if best.is_none_or(|b| candidate.mesh.vertex_count() > b.mesh.vertex_count()) {
                best = Some(candidate);
            }
        }

        best.map(|object| object.mesh.clone())
    }
}

/// Session-scoped resolver in front of the external decoder. The mesh cache
/// is written only here; consumers always receive independent deep copies.
pub struct MeshResolver<'a, D: MeshDecoder> {
    decoder: &'a D,
    use_caching: bool,
    mesh_cache: HashMap<AssetKey, Option<Mesh>>,
    material_cache: HashMap<String, Arc<Material>>,
}

impl<'a, D: MeshDecoder> MeshResolver<'a, D> {
    pub fn new(decoder: &'a D, use_caching: bool) -> Self {
        MeshResolver {
            decoder,
            use_caching,
            mesh_cache: HashMap::new(),
            material_cache: HashMap::new(),
        }
    }

    /// Resolves the asset to an independent mesh payload, or `None` when the
    /// asset misses (file absent, decode failure, nothing survives
    /// filtering). Misses are cached too, so the decoder runs at most once
    /// per asset per session.
    pub fn resolve(
        &mut self,
        key: &AssetKey,
        library: &LibraryManifest,
        descriptor: &AssetDescriptor,
    ) -> Option<Mesh> {
        if self.use_caching {
            if let Some(cached) = self.mesh_cache.get(key) {
                return cached.clone();
            }
        }

        let resolved = self.decode_representative(key, library, descriptor);
        if self.use_caching {
            self.mesh_cache.insert(key.clone(), resolved.clone());
        }
        resolved
    }

    fn decode_representative(
        &self,
        key: &AssetKey,
        library: &LibraryManifest,
        descriptor: &AssetDescriptor,
    ) -> Option<Mesh> {
        let mesh_path = library.root_path.join(&descriptor.mesh_file);
        if !mesh_path.exists() {
            debug!(
                "Mesh file {} for {} does not exist, skipping",
                mesh_path.display(),
                key
            );
            return None;
        }

        let workspace = match self.decoder.decode(&mesh_path) {
            Ok(objects) => DecodeWorkspace::new(objects),
            Err(e) => {
                warn!("Error decoding mesh {}: {:#}", mesh_path.display(), e);
                return None;
            }
        };

        let representative = workspace.select_representative();
        if representative.is_none() {
            debug!(
                "No usable sub-mesh in {} for {}, skipping",
                mesh_path.display(),
                key
            );
        }
        representative
    }

    /// Builds or reuses the material for a texture name. The cache key is
    /// the texture name alone, so assets sharing a texture name share one
    /// material.
    pub fn material_for(
        &mut self,
        texture_name: &str,
        descriptor: &AssetDescriptor,
        library_root: &Path,
    ) -> Option<Arc<Material>> {
        if let Some(material) = self.material_cache.get(texture_name) {
            return Some(Arc::clone(material));
        }

        let texture = descriptor.textures.get(texture_name)?;
        let diffuse_path = library_root.join(&texture.diffuse_map);
        if !diffuse_path.exists() {
            debug!(
                "Diffuse map {} for texture {} does not exist, skipping",
                diffuse_path.display(),
                texture_name
            );
            return None;
        }

        let material = Arc::new(Material::textured(texture_name, diffuse_path));
        self.material_cache
            .insert(texture_name.to_string(), Arc::clone(&material));
        Some(material)
    }
}
