use crate::scene::types::{Material, Mesh};
use glam::DVec3;
use std::collections::HashMap;
use std::sync::Arc;

/// Identity of an imported instance, attached so an export can reproduce the
/// placement without parsing the object name.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityMetadata {
    pub library_name: String,
    pub group_name: String,
    pub prop_name: String,
    pub texture_name: Option<String>,
    pub has_texture: bool,
}

pub type InstanceHandle = usize;

#[derive(Debug, Clone)]
pub struct SceneInstance {
    pub name: String,
    pub mesh: Mesh,
    pub position: DVec3,
    pub rotation_euler: DVec3,
    pub scale: DVec3,
    pub material: Option<Arc<Material>>,
    pub identity: Option<IdentityMetadata>,
    pub selected: bool,
    pub collection: Option<String>,
}

/// Host scene graph collaborator. The import side creates and decorates
/// instances, the export side enumerates them read-only.
pub trait SceneGraph {
    fn create_instance(&mut self, name: &str, mesh: Mesh) -> InstanceHandle;
    fn set_transform(
        &mut self,
        handle: InstanceHandle,
        position: DVec3,
        rotation_euler: DVec3,
        scale: DVec3,
    );
    fn assign_material(&mut self, handle: InstanceHandle, material: Arc<Material>);
    fn set_identity(&mut self, handle: InstanceHandle, identity: IdentityMetadata);
    fn set_collection(&mut self, handle: InstanceHandle, collection: &str);
    fn instances(&self) -> &[SceneInstance];
}

/// Reference host implementation. Mimics the duplicate-name handling of
/// common editors: a second instance named "Foo" becomes "Foo.001".
#[derive(Default)]
pub struct InMemoryScene {
    instances: Vec<SceneInstance>,
    name_counters: HashMap<String, u32>,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances_mut(&mut self) -> &mut [SceneInstance] {
        &mut self.instances
    }

    fn unique_name(&mut self, name: &str) -> String {
        match self.name_counters.get_mut(name) {
            None => {
                self.name_counters.insert(name.to_string(), 0);
                name.to_string()
            }
            Some(counter) => {
                *counter += 1;
                format!("{name}.{counter:03}")
            }
        }
    }
}

impl SceneGraph for InMemoryScene {
    fn create_instance(&mut self, name: &str, mesh: Mesh) -> InstanceHandle {
        let unique = self.unique_name(name);
        self.instances.push(SceneInstance {
            name: unique,
            mesh,
            position: DVec3::ZERO,
            rotation_euler: DVec3::ZERO,
            scale: DVec3::ONE,
            material: None,
            identity: None,
            selected: false,
            collection: None,
        });
        self.instances.len() - 1
    }

    fn set_transform(
        &mut self,
        handle: InstanceHandle,
        position: DVec3,
        rotation_euler: DVec3,
        scale: DVec3,
    ) {
        let instance = &mut self.instances[handle];
        instance.position = position;
        instance.rotation_euler = rotation_euler;
        instance.scale = scale;
    }

    fn assign_material(&mut self, handle: InstanceHandle, material: Arc<Material>) {
        self.instances[handle].material = Some(material);
    }

    fn set_identity(&mut self, handle: InstanceHandle, identity: IdentityMetadata) {
        self.instances[handle].identity = Some(identity);
    }

    fn set_collection(&mut self, handle: InstanceHandle, collection: &str) {
        self.instances[handle].collection = Some(collection.to_string());
    }

    fn instances(&self) -> &[SceneInstance] {
        &self.instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::types::VertexBuffers;

    fn empty_mesh() -> Mesh {
        Mesh {
            vertex_buffers: VertexBuffers::default(),
            index_buffer: Vec::new(),
        }
    }

    #[test]
    fn duplicate_names_get_numbered_suffixes() {
        let mut scene = InMemoryScene::new();
        scene.create_instance("Barriers::Concrete::Wall01", empty_mesh());
        scene.create_instance("Barriers::Concrete::Wall01", empty_mesh());
        scene.create_instance("Barriers::Concrete::Wall01", empty_mesh());

        let names = scene
            .instances()
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "Barriers::Concrete::Wall01",
                "Barriers::Concrete::Wall01.001",
                "Barriers::Concrete::Wall01.002",
            ]
        );
    }
}
