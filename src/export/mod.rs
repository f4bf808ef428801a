use crate::common::coordinate_systems::{scene_to_map_position, scene_to_map_rotation};
use crate::common::naming::{decode_object_name, strip_duplicate_suffix};
use crate::scene::graph::{SceneGraph, SceneInstance};
use crate::settings::{AngleMode, ExportSettings};
use anyhow::Context;
use itertools::Itertools;
use mapxml_parser::map::{
    MAP_FORMAT_VERSION, MapDocument, Position, PropElement, Rotation, StaticGeometry, write_map,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// How many undecodable names the outcome preview lists before collapsing
/// the rest into a count.
const SKIPPED_PREVIEW_CAP: usize = 5;

#[derive(Debug)]
pub struct ExportOutcome {
    pub exported: usize,
    pub skipped: usize,
    pub skipped_names: Vec<String>,
    pub elapsed: Duration,
}

impl ExportOutcome {
    /// Capped preview of the skipped names so a large batch of bad names
    /// doesn't flood the diagnostics.
    pub fn skipped_preview(&self) -> String {
        let preview = self
            .skipped_names
            .iter()
            .take(SKIPPED_PREVIEW_CAP)
            .join(", ");
        if self.skipped_names.len() > SKIPPED_PREVIEW_CAP {
            format!(
                "{}... and {} more",
                preview,
                self.skipped_names.len() - SKIPPED_PREVIEW_CAP
            )
        } else {
            preview
        }
    }
}

/// One export run over a read-only view of the host scene.
pub struct ExportSession<'a, S: SceneGraph> {
    settings: ExportSettings,
    scene: &'a S,
}

impl<'a, S: SceneGraph> ExportSession<'a, S> {
    pub fn new(settings: ExportSettings, scene: &'a S) -> Self {
        ExportSession { settings, scene }
    }

    pub fn run<W: Write>(&self, sink: W) -> Result<ExportOutcome, anyhow::Error> {
        let started = Instant::now();

        let (document, mut outcome) = self.build_document();
        write_map(&document, sink).context("Error exporting XML")?;

        outcome.elapsed = started.elapsed();
        Ok(outcome)
    }

    pub fn run_to_file(&self, path: &Path) -> Result<ExportOutcome, anyhow::Error> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        let outcome = self.run(&mut writer)?;
        writer.flush()?;
        Ok(outcome)
    }

    fn selected_instances(&self) -> Vec<&SceneInstance> {
        let instances = self.scene.instances();
        if self.settings.selected_only {
            instances.iter().filter(|i| i.selected).collect_vec()
        } else if let Some(collection) = &self.settings.collection {
            instances
                .iter()
                .filter(|i| i.collection.as_deref() == Some(collection.as_str()))
                .collect_vec()
        } else {
            instances.iter().collect_vec()
        }
    }

    fn build_document(&self) -> (MapDocument, ExportOutcome) {
        let mut props = Vec::new();
        let mut skipped_names = Vec::new();

        for instance in self.selected_instances() {
            let Some((library_name, group_name, prop_name)) = identity_triple(instance) else {
                skipped_names.push(instance.name.clone());
                continue;
            };

            let mut rotation_z =
                scene_to_map_rotation(instance.rotation_euler, self.settings.axis_up);
            if self.settings.angle_mode == AngleMode::Degrees {
                rotation_z = rotation_z.to_degrees();
            }

            let position = scene_to_map_position(
                instance.position,
                self.settings.scale_factor,
                self.settings.axis_up,
            );

            props.push(PropElement {
                library_name,
                group_name,
                name: prop_name,
                rotation: Some(Rotation {
                    z: Some(rotation_z),
                }),
                texture_name: texture_name_for(instance),
                position: Some(Position {
                    x: position.x,
                    y: position.y,
                    z: position.z,
                }),
            });
        }

        let exported = props.len();
        let document = MapDocument {
            version: Some(MAP_FORMAT_VERSION.to_string()),
            static_geometry: Some(StaticGeometry { props }),
        };
        let outcome = ExportOutcome {
            exported,
            skipped: skipped_names.len(),
            skipped_names,
            elapsed: Duration::ZERO,
        };
        (document, outcome)
    }
}

/// Identity precedence: explicit metadata when present, the name grammar as
/// the fallback.
fn identity_triple(instance: &SceneInstance) -> Option<(String, String, String)> {
    if let Some(identity) = &instance.identity {
        return Some((
            identity.library_name.clone(),
            identity.group_name.clone(),
            identity.prop_name.clone(),
        ));
    }
    decode_object_name(&instance.name)
}

/// Texture precedence: explicit metadata when present, otherwise inferred
/// from the first material's naming convention. `None` still serializes as
/// an empty `texture-name` element.
fn texture_name_for(instance: &SceneInstance) -> Option<String> {
    if let Some(identity) = &instance.identity {
        if !identity.has_texture {
            return None;
        }
        return identity
            .texture_name
            .as_deref()
            .map(strip_duplicate_suffix)
            .map(str::to_string)
            .filter(|t| !t.is_empty());
    }

    let material = instance.material.as_ref()?;
    material
        .texture_name()
        .map(str::to_string)
        .filter(|t| !t.is_empty())
}
