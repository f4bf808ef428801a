use crate::settings::AngleMode;
use glam::DVec3;
use itertools::Itertools;
use log::debug;
use mapxml_parser::map::MapDocument;
use std::fmt;

/// The (library, group, prop) triple identifying one distinct geometry
/// asset. Placements with equal keys share one cached mesh.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub library: String,
    pub group: String,
    pub prop: String,
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.library, self.group, self.prop)
    }
}

/// One intended instance, normalized from a `<prop>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub library_name: String,
    pub group_name: String,
    pub prop_name: String,
    /// Source units, before any scale factor is applied.
    pub position: DVec3,
    /// Always radians, regardless of the document's angle mode.
    pub rotation_z: f64,
    pub texture_name: Option<String>,
}

impl PlacementRecord {
    pub fn asset_key(&self) -> AssetKey {
        AssetKey {
            library: self.library_name.clone(),
            group: self.group_name.clone(),
            prop: self.prop_name.clone(),
        }
    }
}

/// Normalizes a raw document into the ordered placement list. Placements
/// without a position are dropped (partially-authored scenes are expected),
/// missing rotations default to zero, and degree values are converted to
/// radians up front so the rest of the pipeline only ever sees radians.
pub fn placements_from_document(doc: &MapDocument, angle_mode: AngleMode) -> Vec<PlacementRecord> {
    let Some(geometry) = &doc.static_geometry else {
        return Vec::new();
    };

    geometry
        .props
        .iter()
        .filter_map(|prop| {
            let Some(position) = prop.position else {
                debug!("Placement {} carries no position, dropping it", prop.name);
                return None;
            };

            let mut rotation_z = prop.rotation.and_then(|r| r.z).unwrap_or(0.0);
            if angle_mode == AngleMode::Degrees {
                rotation_z = rotation_z.to_radians();
            }

            Some(PlacementRecord {
                library_name: prop.library_name.clone(),
                group_name: prop.group_name.clone(),
                prop_name: prop.name.clone(),
                position: DVec3::new(position.x, position.y, position.z),
                rotation_z,
                texture_name: prop.texture_name.clone().filter(|t| !t.is_empty()),
            })
        })
        .collect_vec()
}
