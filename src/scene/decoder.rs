use crate::scene::types::{Mesh, VertexBuffers};
use glam::{Vec2, Vec3};
use itertools::Itertools;
use std::path::Path;

/// One named object produced by a decoder invocation.
#[derive(Debug, Clone)]
pub struct DecodedObject {
    pub name: String,
    pub mesh: Mesh,
    /// Material slot assignments; a slot may be empty.
    pub material_slots: Vec<Option<String>>,
}

impl DecodedObject {
    pub fn has_material(&self) -> bool {
        self.material_slots.iter().any(|slot| slot.is_some())
    }
}

/// External mesh decoder collaborator. A decoder turns one asset file into
/// zero or more named objects and returns them directly to the caller; it
/// must not retain state between invocations.
pub trait MeshDecoder {
    fn decode(&self, mesh_path: &Path) -> Result<Vec<DecodedObject>, anyhow::Error>;
}

/// Wavefront OBJ decoder. `o`/`g` statements become the named sub-meshes and
/// the `.mtl` table provides the material assignments.
pub struct ObjMeshDecoder;

impl MeshDecoder for ObjMeshDecoder {
    fn decode(&self, mesh_path: &Path) -> Result<Vec<DecodedObject>, anyhow::Error> {
        let (models, materials) = tobj::load_obj(
            mesh_path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;
        // A broken or absent .mtl leaves every slot empty instead of failing
        // the whole decode.
        let materials = materials.unwrap_or_default();

        Ok(models
            .into_iter()
            .map(|model| {
                let slot = model
                    .mesh
                    .material_id
                    .and_then(|id| materials.get(id))
                    .map(|material| material.name.clone());
                DecodedObject {
                    name: model.name,
                    mesh: mesh_from_obj(&model.mesh),
                    material_slots: vec![slot],
                }
            })
            .collect_vec())
    }
}

fn mesh_from_obj(mesh: &tobj::Mesh) -> Mesh {
    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect_vec();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| Vec3::new(n[0], n[1], n[2]))
        .collect_vec();
    let texcoords = mesh
        .texcoords
        .chunks_exact(2)
        .map(|t| Vec2::new(t[0], t[1]))
        .collect_vec();

    Mesh {
        vertex_buffers: VertexBuffers {
            position_buffer: positions,
            normals_buffer: normals,
            texcoord_buffer: texcoords,
        },
        index_buffer: mesh.indices.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_obj_with_material_table() -> Result<(), anyhow::Error> {
        let mesh_path = std::env::current_dir()?.join("test-data/libs/Barriers/meshes/wall01.obj");
        let objects = ObjMeshDecoder.decode(&mesh_path)?;

        assert_eq!(objects.len(), 2);

        let wall = objects
            .iter()
            .find(|o| o.name == "Wall01")
            .expect("Wall01 object");
        assert_eq!(wall.mesh.vertex_count(), 8);
        assert!(wall.has_material());
        assert_eq!(wall.material_slots[0].as_deref(), Some("wall"));

        let occluder = objects
            .iter()
            .find(|o| o.name == "occluder_box")
            .expect("occluder object");
        assert!(!occluder.has_material());

        Ok(())
    }
}
