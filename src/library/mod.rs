use crate::map::AssetKey;
use anyhow::Context;
use log::{debug, warn};
use mapxml_parser::library::parse_library;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE_NAME: &str = "library.xml";

#[derive(Debug, Clone)]
pub struct TextureDescriptor {
    /// Relative to the owning library's root.
    pub diffuse_map: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AssetDescriptor {
    /// Relative to the owning library's root.
    pub mesh_file: PathBuf,
    pub textures: HashMap<String, TextureDescriptor>,
}

/// One parsed library manifest. Immutable once built.
#[derive(Debug)]
pub struct LibraryManifest {
    pub name: String,
    pub root_path: PathBuf,
    props: HashMap<String, AssetDescriptor>,
}

impl LibraryManifest {
    pub fn descriptor(&self, group: &str, prop: &str) -> Option<&AssetDescriptor> {
        self.props.get(&prop_key(group, prop))
    }

    pub fn prop_count(&self) -> usize {
        self.props.len()
    }
}

fn prop_key(group: &str, prop: &str) -> String {
    format!("{group}/{prop}")
}

/// Lookup from library name to manifest, built once per session by scanning
/// the libraries directory.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    libraries: HashMap<String, LibraryManifest>,
}

impl LibraryIndex {
    /// Scans every subdirectory of `root` for a manifest. A library that is
    /// missing its manifest or fails to parse is skipped with a diagnostic;
    /// only a missing/unreadable `root` itself is fatal.
    pub fn build(root: &Path) -> Result<LibraryIndex, anyhow::Error> {
        let entries = std::fs::read_dir(root)
            .with_context(|| format!("Prop libraries directory not found: {}", root.display()))?;

        let mut libraries = HashMap::new();
        for entry in entries {
            let lib_dir = entry?.path();
            if !lib_dir.is_dir() {
                continue;
            }
            let manifest_path = lib_dir.join(MANIFEST_FILE_NAME);
            if !manifest_path.exists() {
                continue;
            }

            match Self::load_manifest(&lib_dir, &manifest_path) {
                Ok(manifest) => {
                    debug!(
                        "Loaded library {} with {} props",
                        manifest.name,
                        manifest.prop_count()
                    );
                    libraries.insert(manifest.name.clone(), manifest);
                }
                Err(e) => warn!("Error loading prop library {}: {:#}", lib_dir.display(), e),
            }
        }

        Ok(LibraryIndex { libraries })
    }

    fn load_manifest(
        lib_dir: &Path,
        manifest_path: &Path,
    ) -> Result<LibraryManifest, anyhow::Error> {
        let doc = parse_library(BufReader::new(File::open(manifest_path)?))?;
        let name = doc
            .name
            .filter(|n| !n.is_empty())
            .context("Library manifest has no name attribute")?;

        let mut props = HashMap::new();
        for group in &doc.groups {
            for prop in &group.props {
                let Some(mesh) = &prop.mesh else {
                    debug!(
                        "Prop {}/{} in library {} declares no mesh, ignoring",
                        group.name, prop.name, name
                    );
                    continue;
                };

                let mut textures = HashMap::new();
                for texture in prop.textures.iter().chain(&mesh.textures) {
                    if let Some(diffuse_map) = &texture.diffuse_map {
                        textures.insert(
                            texture.name.clone(),
                            TextureDescriptor {
                                diffuse_map: PathBuf::from(diffuse_map),
                            },
                        );
                    }
                }

                let key = prop_key(&group.name, &prop.name);
                let descriptor = AssetDescriptor {
                    mesh_file: PathBuf::from(&mesh.file),
                    textures,
                };
                if props.insert(key.clone(), descriptor).is_some() {
                    // Last wins, matching how these manifests are authored in
                    // the wild. Likely an authoring mistake, hence the log.
                    debug!("Duplicate prop key {key} in library {name}, keeping the later entry");
                }
            }
        }

        Ok(LibraryManifest {
            name,
            root_path: lib_dir.to_path_buf(),
            props,
        })
    }

    pub fn lookup(&self, key: &AssetKey) -> Option<(&LibraryManifest, &AssetDescriptor)> {
        let library = self.libraries.get(&key.library)?;
        let descriptor = library.descriptor(&key.group, &key.prop)?;
        Some((library, descriptor))
    }

    pub fn get(&self, name: &str) -> Option<&LibraryManifest> {
        self.libraries.get(name)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}
