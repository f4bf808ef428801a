pub mod resolver;

use crate::common::coordinate_systems::{map_to_scene_position, map_to_scene_rotation};
use crate::common::naming::encode_object_name;
use crate::import::resolver::MeshResolver;
use crate::library::LibraryIndex;
use crate::map::{AssetKey, PlacementRecord, placements_from_document};
use crate::scene::decoder::MeshDecoder;
use crate::scene::graph::{IdentityMetadata, SceneGraph};
use crate::settings::ImportSettings;
use anyhow::Context;
use glam::DVec3;
use log::info;
use mapxml_parser::map::parse_map;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    LibrariesLoading,
    Placing,
    Done,
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub libraries_loaded: usize,
    pub instances_created: usize,
    pub placements_skipped: usize,
    pub elapsed: Duration,
}

/// One import run. Owns its caches for the duration of the run; nothing is
/// carried across sessions.
pub struct ImportSession<'a, D: MeshDecoder, S: SceneGraph> {
    settings: ImportSettings,
    decoder: &'a D,
    scene: &'a mut S,
    phase: ImportPhase,
}

impl<'a, D: MeshDecoder, S: SceneGraph> ImportSession<'a, D, S> {
    pub fn new(settings: ImportSettings, decoder: &'a D, scene: &'a mut S) -> Self {
        ImportSession {
            settings,
            decoder,
            scene,
            phase: ImportPhase::Idle,
        }
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    /// Full import: load the libraries, parse the map, place everything.
    pub fn run(
        &mut self,
        map_path: &Path,
        libraries_dir: &Path,
    ) -> Result<ImportStats, anyhow::Error> {
        let started = Instant::now();

        self.phase = ImportPhase::LibrariesLoading;
        info!("Loading prop libraries...");
        let index = LibraryIndex::build(libraries_dir)?;

        let file = File::open(map_path)
            .with_context(|| format!("Failed to open map file {}", map_path.display()))?;
        let doc = parse_map(BufReader::new(file))
            .with_context(|| format!("Error parsing XML file {}", map_path.display()))?;
        let placements = placements_from_document(&doc, self.settings.angle_mode);

        let collection = self
            .settings
            .create_collection
            .then(|| map_path.file_stem())
            .flatten()
            .map(|stem| stem.to_string_lossy().into_owned());

        let mut stats = self.place(&index, &placements, collection.as_deref());
        stats.libraries_loaded = index.len();
        stats.elapsed = started.elapsed();
        Ok(stats)
    }

    /// Places the records grouped by asset, so the first instance of each
    /// distinct asset pays for the decode and every later one is a cache
    /// clone. Document order is preserved within each group.
    pub fn place(
        &mut self,
        index: &LibraryIndex,
        placements: &[PlacementRecord],
        collection: Option<&str>,
    ) -> ImportStats {
        self.phase = ImportPhase::Placing;
        let total = placements.len();
        let batch_size = self.settings.batch_size.max(1);
        info!("Importing {total} props...");

        let mut group_order = Vec::new();
        let mut groups: HashMap<AssetKey, Vec<&PlacementRecord>> = HashMap::new();
        for record in placements {
            match groups.entry(record.asset_key()) {
                Entry::Occupied(mut entry) => entry.get_mut().push(record),
                Entry::Vacant(entry) => {
                    group_order.push(entry.key().clone());
                    entry.insert(vec![record]);
                }
            }
        }

        let mut resolver = MeshResolver::new(self.decoder, self.settings.use_caching);
        let mut created = 0usize;
        let mut skipped = 0usize;

        for key in &group_order {
            for record in &groups[key] {
                if self.place_one(&mut resolver, index, key, record, collection) {
                    created += 1;
                    if created % batch_size == 0 {
                        info!("Imported {created}/{total} props...");
                    }
                } else {
                    skipped += 1;
                }
            }
        }

        self.phase = ImportPhase::Done;
        info!("Finished importing {created} props");
        ImportStats {
            libraries_loaded: 0,
            instances_created: created,
            placements_skipped: skipped,
            elapsed: Duration::ZERO,
        }
    }

    fn place_one(
        &mut self,
        resolver: &mut MeshResolver<'a, D>,
        index: &LibraryIndex,
        key: &AssetKey,
        record: &PlacementRecord,
        collection: Option<&str>,
    ) -> bool {
        let Some((library, descriptor)) = index.lookup(key) else {
            return false;
        };
        let Some(mesh) = resolver.resolve(key, library, descriptor) else {
            return false;
        };

        let name = encode_object_name(
            &record.library_name,
            &record.group_name,
            &record.prop_name,
        );
        let handle = self.scene.create_instance(&name, mesh);

        let position = map_to_scene_position(
            record.position,
            self.settings.scale_factor,
            self.settings.axis_up,
        );
        let rotation = map_to_scene_rotation(record.rotation_z, self.settings.axis_up);
        self.scene.set_transform(
            handle,
            position,
            rotation,
            DVec3::splat(self.settings.scale_factor),
        );

        self.scene.set_identity(
            handle,
            IdentityMetadata {
                library_name: record.library_name.clone(),
                group_name: record.group_name.clone(),
                prop_name: record.prop_name.clone(),
                texture_name: record.texture_name.clone(),
                has_texture: record.texture_name.is_some(),
            },
        );

        if let Some(collection) = collection {
            self.scene.set_collection(handle, collection);
        }

        if self.settings.import_textures {
            if let Some(texture_name) = &record.texture_name {
                if let Some(material) =
                    resolver.material_for(texture_name, descriptor, &library.root_path)
                {
                    self.scene.assign_material(handle, material);
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::decoder::DecodedObject;
    use crate::scene::graph::InMemoryScene;
    use crate::scene::types::{Mesh, VertexBuffers};
    use crate::settings::AngleMode;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use std::cell::Cell;
    use std::f64::consts::FRAC_PI_2;
    use std::path::PathBuf;

    struct StubDecoder {
        calls: Cell<usize>,
    }

    impl MeshDecoder for StubDecoder {
        fn decode(&self, _mesh_path: &Path) -> Result<Vec<DecodedObject>, anyhow::Error> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![DecodedObject {
                name: "Wall01".to_string(),
                mesh: Mesh {
                    vertex_buffers: VertexBuffers {
                        position_buffer: vec![Vec3::ZERO; 8],
                        normals_buffer: Vec::new(),
                        texcoord_buffer: Vec::new(),
                    },
                    index_buffer: Vec::new(),
                },
                material_slots: vec![Some("wall".to_string())],
            }])
        }
    }

    fn paths() -> (PathBuf, PathBuf) {
        let base = std::env::current_dir().unwrap().join("test-data");
        (base.join("maps"), base.join("libs"))
    }

    #[test]
    fn three_placements_one_decode() -> Result<(), anyhow::Error> {
        let (maps, libs) = paths();
        let decoder = StubDecoder {
            calls: Cell::new(0),
        };
        let mut scene = InMemoryScene::new();
        let settings = ImportSettings {
            angle_mode: AngleMode::Degrees,
            ..ImportSettings::default()
        };

        let stats = ImportSession::new(settings, &decoder, &mut scene)
            .run(&maps.join("three_walls.xml"), &libs)?;

        assert_eq!(decoder.calls.get(), 1);
        assert_eq!(stats.instances_created, 3);
        assert_eq!(stats.placements_skipped, 0);
        assert_eq!(scene.instances().len(), 3);

        // Host-side duplicate suffixes, document order preserved.
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

        // Degrees mode: the third placement's 90° becomes π/2 about vertical.
        let third = &scene.instances()[2];
        assert_relative_eq!(third.rotation_euler.z, FRAC_PI_2, epsilon = 1e-9);
        // Default scale factor 0.01: map x=200 lands at scene x=2.
        assert_relative_eq!(third.position.x, 2.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn identity_metadata_is_stamped_for_export() -> Result<(), anyhow::Error> {
        let (maps, libs) = paths();
        let decoder = StubDecoder {
            calls: Cell::new(0),
        };
        let mut scene = InMemoryScene::new();
        let settings = ImportSettings {
            angle_mode: AngleMode::Degrees,
            ..ImportSettings::default()
        };

        ImportSession::new(settings, &decoder, &mut scene)
            .run(&maps.join("three_walls.xml"), &libs)?;

        let identity = scene.instances()[0]
            .identity
            .as_ref()
            .expect("identity metadata");
        assert_eq!(identity.library_name, "Barriers");
        assert_eq!(identity.group_name, "Concrete");
        assert_eq!(identity.prop_name, "Wall01");
        assert_eq!(identity.texture_name.as_deref(), Some("wall_tex"));
        assert!(identity.has_texture);

        // Materials resolved once and shared across the three instances.
        let materials = scene
            .instances()
            .iter()
            .map(|i| i.material.as_ref().expect("material assigned"))
            .collect::<Vec<_>>();
        assert!(std::sync::Arc::ptr_eq(materials[0], materials[1]));
        assert_eq!(materials[0].name, "wall_tex_material");

        // The collection tag defaults to the map's file stem.
        assert_eq!(
            scene.instances()[0].collection.as_deref(),
            Some("three_walls")
        );

        Ok(())
    }

    #[test]
    fn misses_are_skipped_without_failing_the_run() -> Result<(), anyhow::Error> {
        let (maps, libs) = paths();
        let decoder = StubDecoder {
            calls: Cell::new(0),
        };
        let mut scene = InMemoryScene::new();

        let mut session = ImportSession::new(ImportSettings::default(), &decoder, &mut scene);
        let stats = session.run(&maps.join("with_misses.xml"), &libs)?;

        // One resolvable placement; the unknown-library and missing-mesh
        // placements are skipped, the positionless one is dropped earlier.
        assert_eq!(stats.instances_created, 1);
        assert_eq!(stats.placements_skipped, 2);
        assert_eq!(session.phase(), ImportPhase::Done);
        Ok(())
    }

    #[test]
    fn malformed_map_is_fatal() {
        let (maps, libs) = paths();
        let decoder = StubDecoder {
            calls: Cell::new(0),
        };
        let mut scene = InMemoryScene::new();

        let result = ImportSession::new(ImportSettings::default(), &decoder, &mut scene)
            .run(&maps.join("not_a_map.xml"), &libs);
        assert!(result.is_err());
    }
}
