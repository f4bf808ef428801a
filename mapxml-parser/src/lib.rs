use thiserror::Error;

pub mod library;
pub mod map;

#[derive(Error, Debug)]
pub enum ParserError {
    /// The document's root element is not what the format requires.
    #[error("The document root is <{found}>, expected <{expected}>")]
    MalformedDocument { expected: &'static str, found: String },

    #[error("Source contains no data")]
    EmptySource,

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    XmlError(#[from] quick_xml::Error),

    #[error(transparent)]
    DeserializationError(#[from] quick_xml::DeError),
}

/// Returns the tag name of the first start element, skipping over the
/// declaration, comments and whitespace.
pub(crate) fn root_tag(bytes: &[u8]) -> Result<String, ParserError> {
    let mut reader = quick_xml::Reader::from_reader(bytes);
    loop {
        match reader.read_event()? {
            quick_xml::events::Event::Start(e) | quick_xml::events::Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            quick_xml::events::Event::Eof => return Err(ParserError::EmptySource),
            _ => continue,
        }
    }
}
