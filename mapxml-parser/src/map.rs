use crate::{ParserError, root_tag};
use quick_xml::Writer;
use quick_xml::de::Deserializer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::Deserialize;
use serde_derive::Deserialize;
use std::io::{Read, Write};

pub const MAP_ROOT_TAG: &str = "map";
pub const MAP_FORMAT_VERSION: &str = "1.0.Light";

/// Raw map document as it appears on the wire. Normalization (dropping
/// position-less placements, angle conversion) happens in the consumer.
#[derive(Deserialize, Debug, Default)]
pub struct MapDocument {
    #[serde(rename = "@version")]
    pub version: Option<String>,
    #[serde(rename = "static-geometry")]
    pub static_geometry: Option<StaticGeometry>,
}

#[derive(Deserialize, Debug, Default)]
pub struct StaticGeometry {
    #[serde(rename = "prop", default)]
    pub props: Vec<PropElement>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PropElement {
    #[serde(rename = "@library-name", default)]
    pub library_name: String,
    #[serde(rename = "@group-name", default)]
    pub group_name: String,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(default)]
    pub rotation: Option<Rotation>,
    #[serde(rename = "texture-name", default)]
    pub texture_name: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct Rotation {
    #[serde(default)]
    pub z: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub fn parse_map<R: Read>(mut read: R) -> Result<MapDocument, ParserError> {
    let mut bytes = Vec::new();
    read.read_to_end(&mut bytes)?;

    let found = root_tag(&bytes)?;
    if found != MAP_ROOT_TAG {
        return Err(ParserError::MalformedDocument {
            expected: MAP_ROOT_TAG,
            found,
        });
    }

    let mut deserializer = Deserializer::from_reader(&bytes[..]);
    Ok(MapDocument::deserialize(&mut deserializer)?)
}

/// Writes the document with a stable two-space indentation. Field widths are
/// part of the format: 6 decimals for the angle, 3 for positions. The
/// `texture-name` element is always emitted and self-closed when empty.
pub fn write_map<W: Write>(doc: &MapDocument, sink: W) -> Result<(), ParserError> {
    let mut writer = Writer::new_with_indent(sink, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut map = BytesStart::new(MAP_ROOT_TAG);
    if let Some(version) = &doc.version {
        map.push_attribute(("version", version.as_str()));
    }
    writer.write_event(Event::Start(map))?;
    writer.write_event(Event::Start(BytesStart::new("static-geometry")))?;

    if let Some(geometry) = &doc.static_geometry {
        for prop in &geometry.props {
            write_prop(&mut writer, prop)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("static-geometry")))?;
    writer.write_event(Event::End(BytesEnd::new(MAP_ROOT_TAG)))?;
    Ok(())
}

fn write_prop<W: Write>(writer: &mut Writer<W>, prop: &PropElement) -> Result<(), ParserError> {
    let mut elem = BytesStart::new("prop");
    elem.push_attribute(("library-name", prop.library_name.as_str()));
    elem.push_attribute(("group-name", prop.group_name.as_str()));
    elem.push_attribute(("name", prop.name.as_str()));
    writer.write_event(Event::Start(elem))?;

    let rotation = prop.rotation.and_then(|r| r.z).unwrap_or(0.0);
    writer.write_event(Event::Start(BytesStart::new("rotation")))?;
    writer
        .create_element("z")
        .write_text_content(BytesText::new(&format!("{rotation:.6}")))?;
    writer.write_event(Event::End(BytesEnd::new("rotation")))?;

    match prop.texture_name.as_deref().filter(|t| !t.is_empty()) {
        Some(texture) => {
            writer
                .create_element("texture-name")
                .write_text_content(BytesText::new(texture))?;
        }
        None => {
            writer.create_element("texture-name").write_empty()?;
        }
    }

    let position = prop.position.unwrap_or_default();
    writer.write_event(Event::Start(BytesStart::new("position")))?;
    for (axis, value) in [("x", position.x), ("y", position.y), ("z", position.z)] {
        writer
            .create_element(axis)
            .write_text_content(BytesText::new(&format!("{value:.3}")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("position")))?;

    writer.write_event(Event::End(BytesEnd::new("prop")))?;
    Ok(())
}
