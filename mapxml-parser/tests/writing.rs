use mapxml_parser::map::{
    MAP_FORMAT_VERSION, MapDocument, Position, PropElement, Rotation, StaticGeometry, parse_map,
    write_map,
};

fn sample_document() -> MapDocument {
    MapDocument {
        version: Some(MAP_FORMAT_VERSION.to_string()),
        static_geometry: Some(StaticGeometry {
            props: vec![
                PropElement {
                    library_name: "Barriers".to_string(),
                    group_name: "Concrete".to_string(),
                    name: "Wall01".to_string(),
                    rotation: Some(Rotation { z: Some(90.0) }),
                    texture_name: Some("wall_tex".to_string()),
                    position: Some(Position {
                        x: 200.0,
                        y: 0.0,
                        z: 0.5,
                    }),
                },
                PropElement {
                    library_name: "Decor".to_string(),
                    group_name: "default".to_string(),
                    name: "Crate02".to_string(),
                    rotation: None,
                    texture_name: None,
                    position: Some(Position {
                        x: -12.25,
                        y: 4.0,
                        z: 0.0,
                    }),
                },
            ],
        }),
    }
}

#[test]
fn writes_fixed_decimal_widths() -> Result<(), anyhow::Error> {
    let mut sink = Vec::new();
    write_map(&sample_document(), &mut sink)?;
    let xml = String::from_utf8(sink)?;

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<map version=\"1.0.Light\">"));
    assert!(xml.contains("<z>90.000000</z>"));
    assert!(xml.contains("<x>200.000</x>"));
    assert!(xml.contains("<x>-12.250</x>"));
    // A missing rotation still serializes, as zero.
    assert!(xml.contains("<z>0.000000</z>"));
    Ok(())
}

#[test]
fn texture_name_element_is_always_present_and_self_closing_when_empty() -> Result<(), anyhow::Error>
{
    let mut sink = Vec::new();
    write_map(&sample_document(), &mut sink)?;
    let xml = String::from_utf8(sink)?;

    assert!(xml.contains("<texture-name>wall_tex</texture-name>"));
    assert!(xml.contains("<texture-name/>"));
    assert!(!xml.contains("<texture-name></texture-name>"));
    Ok(())
}

#[test]
fn written_document_parses_back() -> Result<(), anyhow::Error> {
    let mut sink = Vec::new();
    write_map(&sample_document(), &mut sink)?;

    let reparsed = parse_map(&sink[..])?;
    assert_eq!(reparsed.version.as_deref(), Some(MAP_FORMAT_VERSION));

    let geometry = reparsed.static_geometry.expect("static-geometry present");
    assert_eq!(geometry.props.len(), 2);
    assert_eq!(geometry.props[0].rotation.and_then(|r| r.z), Some(90.0));
    assert_eq!(
        geometry.props[0].position,
        Some(Position {
            x: 200.0,
            y: 0.0,
            z: 0.5,
        })
    );
    // Empty texture-name normalizes to an empty string on re-parse.
    assert!(
        geometry.props[1]
            .texture_name
            .as_deref()
            .unwrap_or("")
            .is_empty()
    );
    Ok(())
}
