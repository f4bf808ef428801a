use crate::ParserError;
use quick_xml::de::Deserializer;
use serde::Deserialize;
use serde_derive::Deserialize;
use std::io::Read;

/// One library manifest (`library.xml`). The root tag is not prescribed by
/// the format, only its `name` attribute matters.
#[derive(Deserialize, Debug, Default)]
pub struct LibraryDocument {
    #[serde(rename = "@name")]
    pub name: Option<String>,
    #[serde(rename = "prop-group", default)]
    pub groups: Vec<PropGroup>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PropGroup {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "prop", default)]
    pub props: Vec<PropDeclaration>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PropDeclaration {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(default)]
    pub mesh: Option<MeshElement>,
    #[serde(rename = "texture", default)]
    pub textures: Vec<TextureElement>,
}

#[derive(Deserialize, Debug, Default)]
pub struct MeshElement {
    #[serde(rename = "@file", default)]
    pub file: String,
    /// Some authoring tools nest the texture table inside the mesh element
    /// instead of next to it.
    #[serde(rename = "texture", default)]
    pub textures: Vec<TextureElement>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TextureElement {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@diffuse-map")]
    pub diffuse_map: Option<String>,
}

pub fn parse_library<R: Read>(mut read: R) -> Result<LibraryDocument, ParserError> {
    let mut bytes = Vec::new();
    read.read_to_end(&mut bytes)?;

    let mut deserializer = Deserializer::from_reader(&bytes[..]);
    Ok(LibraryDocument::deserialize(&mut deserializer)?)
}
