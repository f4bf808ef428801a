use glam::{Vec2, Vec3, Vec4};
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

#[derive(Clone)]
pub struct Mesh {
    pub vertex_buffers: VertexBuffers,
    pub index_buffer: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertex_buffers.position_buffer.len()
    }
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ vertex_buffers: {:?}, ", self.vertex_buffers)?;
        write!(f, "index_buffer: [{}] }}", self.index_buffer.len())
    }
}

#[derive(Clone, Default)]
pub struct VertexBuffers {
    pub position_buffer: Vec<Vec3>,
    pub normals_buffer: Vec<Vec3>,
    pub texcoord_buffer: Vec<Vec2>,
}

impl Debug for VertexBuffers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ position_buffer: [{}], ", self.position_buffer.len())?;
        write!(f, "normals_buffer: [{}], ", self.normals_buffer.len())?;
        write!(f, "texcoord_buffer: [{}] }}", self.texcoord_buffer.len())
    }
}

/// Suffix of material names derived from a texture. Export relies on it to
/// recover the texture name from a material when no identity metadata exists.
pub const MATERIAL_NAME_SUFFIX: &str = "_material";

#[derive(Debug, Clone, PartialEq)]
pub enum AlbedoType {
    Value(Vec4),
    /// Base color comes from the image at this path, bound by the host to its
    /// physically-based shading model.
    TextureWithPath(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub albedo: AlbedoType,
}

impl Material {
    pub fn textured(texture_name: &str, diffuse_map: PathBuf) -> Self {
        Material {
            name: format!("{texture_name}{MATERIAL_NAME_SUFFIX}"),
            albedo: AlbedoType::TextureWithPath(diffuse_map),
        }
    }

    /// The texture name encoded in this material's name, if it follows the
    /// `<texture>_material` convention.
    pub fn texture_name(&self) -> Option<&str> {
        if self.name.contains(MATERIAL_NAME_SUFFIX) {
            self.name.split(MATERIAL_NAME_SUFFIX).next()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_name_follows_the_naming_convention() {
        let material = Material::textured("wall_tex", PathBuf::from("textures/wall01_d.png"));
        assert_eq!(material.name, "wall_tex_material");
        assert_eq!(material.texture_name(), Some("wall_tex"));
    }

    #[test]
    fn foreign_material_names_carry_no_texture() {
        let material = Material {
            name: "Principled".to_string(),
            albedo: AlbedoType::Value(Vec4::ONE),
        };
        assert_eq!(material.texture_name(), None);
    }
}
