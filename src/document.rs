//! XML property documents
//!
//! Reads and writes the Hadoop-style property file layout:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <configuration>
//!   <property>
//!     <name>dfs.replication</name>
//!     <description>Block copies</description>
//!     <value>3</value>
//!   </property>
//! </configuration>
//! ```
//!
//! Direct `<property>` children of the root become [`PropertyRecord`]s. Any
//! other element under the root (an `<xi:include>`, say) is carried through
//! untouched and written back in its original position. Leaf text is stored
//! verbatim; entities are unescaped on load and escaped on save.

use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use tracing::debug;

use crate::models::PropertyRecord;
use crate::store::PropertyStore;

/// Element name of a single property entry
pub const PROPERTY_TAG: &str = "property";
const NAME_TAG: &str = "name";
const DESCRIPTION_TAG: &str = "description";
const VALUE_TAG: &str = "value";

/// Root element used for documents created from scratch
pub const DEFAULT_ROOT: &str = "configuration";

/// Default number of spaces per nesting level when writing
pub const DEFAULT_INDENT: usize = 2;

/// Error raised while reading or writing a property document
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// The input is not well-formed XML
    #[error("XML syntax error at byte {position}: {source}")]
    Syntax {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    /// No root element was found
    #[error("document has no root element")]
    MissingRoot,
    /// Non-whitespace text outside the root element
    #[error("unexpected text outside the root element")]
    StrayText,
    /// Elements after the root element was closed
    #[error("unexpected content after closing </{0}>")]
    TrailingContent(String),
    /// Input ended with an element still open
    #[error("document ended inside <{0}>")]
    UnexpectedEof(String),
    /// A `<property>` element without a `<name>` child
    #[error("property #{index} has no <name> element")]
    MissingName { index: usize },
    /// A property field contained child elements
    #[error("<{field}> must contain text only, found <{element}>")]
    NestedField { field: String, element: String },
    /// Two properties with the same name (rejected in strict mode only)
    #[error("duplicate property name '{0}'")]
    DuplicateName(String),
    /// Element or attribute name is not valid UTF-8
    #[error("invalid UTF-8 in document: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Serialization failure
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// One direct child of the root, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyItem {
    /// The next loaded record in the store
    Property,
    /// An element that is not a `<property>`, as owned events
    Element(Vec<Event<'static>>),
}

/// An ordered collection of properties plus the root container they live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    root: String,
    attributes: Vec<(String, String)>,
    properties: PropertyStore,
    body: Vec<BodyItem>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl ConfigDocument {
    /// Create an empty document with the given root element name.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            attributes: Vec::new(),
            properties: PropertyStore::new(),
            body: Vec::new(),
        }
    }

    /// Root element name.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Root element attributes in source order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }

    /// Parse a document from XML text.
    ///
    /// Comments and processing instructions are dropped. Repeated property
    /// names are accepted; lookups act on the first one.
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);

        let (mut document, has_children) = loop {
            match next_event(&mut reader)? {
                Event::Start(e) => break (Self::from_root(&e, reader.buffer_position())?, true),
                Event::Empty(e) => break (Self::from_root(&e, reader.buffer_position())?, false),
                Event::Text(t) if !is_blank(&t) => return Err(DocumentError::StrayText),
                Event::Eof => return Err(DocumentError::MissingRoot),
                _ => {}
            }
        };

        if has_children {
            document.read_body(&mut reader)?;
        }

        loop {
            match next_event(&mut reader)? {
                Event::Eof => break,
                Event::Text(t) if is_blank(&t) => {}
                Event::Comment(_) | Event::PI(_) => {}
                _ => return Err(DocumentError::TrailingContent(document.root.clone())),
            }
        }

        Ok(document)
    }

    fn from_root(start: &BytesStart, position: usize) -> Result<Self, DocumentError> {
        let mut document = Self::new(element_name(start)?);
        for attr in start.attributes() {
            let attr = attr
                .map_err(|e| DocumentError::Syntax { position, source: e.into() })?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr
                .unescape_value()
                .map_err(|source| DocumentError::Syntax { position, source })?
                .into_owned();
            document.attributes.push((key, value));
        }
        Ok(document)
    }

    fn read_body(&mut self, reader: &mut Reader<&[u8]>) -> Result<(), DocumentError> {
        let mut index = 0;
        loop {
            match next_event(reader)? {
                Event::Start(e) if e.name().as_ref() == PROPERTY_TAG.as_bytes() => {
                    index += 1;
                    self.properties.push(read_property(reader, index)?);
                    self.body.push(BodyItem::Property);
                }
                Event::Empty(e) if e.name().as_ref() == PROPERTY_TAG.as_bytes() => {
                    return Err(DocumentError::MissingName { index: index + 1 });
                }
                Event::Start(e) => {
                    let element = element_name(&e)?;
                    debug!(%element, "keeping unknown element under <{}>", self.root);
                    let events = capture_element(reader, e)?;
                    self.body.push(BodyItem::Element(events));
                }
                Event::Empty(e) => {
                    let element = element_name(&e)?;
                    debug!(%element, "keeping unknown element under <{}>", self.root);
                    self.body.push(BodyItem::Element(vec![Event::Empty(e.into_owned())]));
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(DocumentError::UnexpectedEof(self.root.clone())),
                _ => {}
            }
        }
    }

    /// Serialize the document with an XML declaration and UTF-8 encoding.
    ///
    /// `indent` is the number of spaces per level; `0` writes everything on
    /// one line. Records added after loading follow all loaded content.
    pub fn to_xml(&self, indent: usize) -> Result<String, DocumentError> {
        let mut writer = if indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        };

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new(self.root.as_str());
        for (key, value) in &self.attributes {
            root.push_attribute((key.as_str(), value.as_str()));
        }

        if self.properties.is_empty() && self.body.is_empty() {
            writer.write_event(Event::Empty(root))?;
        } else {
            writer.write_event(Event::Start(root))?;
            let mut records = self.properties.iter();
            for item in &self.body {
                match item {
                    BodyItem::Property => {
                        if let Some(record) = records.next() {
                            write_property(&mut writer, record)?;
                        }
                    }
                    BodyItem::Element(events) => {
                        for event in events {
                            writer.write_event(event)?;
                        }
                    }
                }
            }
            for record in records {
                write_property(&mut writer, record)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.root.as_str())))?;
        }

        let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| e.utf8_error())?;
        xml.push('\n');
        Ok(xml)
    }
}

impl FromStr for ConfigDocument {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn next_event<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>, DocumentError> {
    reader.read_event().map_err(|source| syntax(reader, source))
}

fn syntax(reader: &Reader<&[u8]>, source: quick_xml::Error) -> DocumentError {
    DocumentError::Syntax { position: reader.buffer_position(), source }
}

fn element_name(start: &BytesStart) -> Result<String, DocumentError> {
    Ok(std::str::from_utf8(start.name().as_ref())?.to_string())
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

/// Keep the first occurrence of a repeated field.
fn set_once(slot: &mut Option<String>, text: String) {
    if slot.is_none() {
        *slot = Some(text);
    }
}

/// Collect an element and everything inside it as owned events.
///
/// Whitespace-only text is dropped; the writer re-indents on output.
fn capture_element(reader: &mut Reader<&[u8]>, start: BytesStart) -> Result<Vec<Event<'static>>, DocumentError> {
    let name = element_name(&start)?;
    let mut events = vec![Event::Start(start.into_owned())];
    let mut depth = 1usize;
    while depth > 0 {
        let event = next_event(reader)?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Text(t) if is_blank(t) => continue,
            Event::Eof => return Err(DocumentError::UnexpectedEof(name)),
            _ => {}
        }
        events.push(event.into_owned());
    }
    Ok(events)
}

fn read_property(reader: &mut Reader<&[u8]>, index: usize) -> Result<PropertyRecord, DocumentError> {
    let mut name = None;
    let mut description = None;
    let mut value = None;
    let mut extras = Vec::new();

    loop {
        let (field, text) = match next_event(reader)? {
            Event::Start(e) => {
                let field = element_name(&e)?;
                let text = read_field_text(reader, &field)?;
                (field, text)
            }
            Event::Empty(e) => (element_name(&e)?, String::new()),
            Event::End(_) => break,
            Event::Eof => return Err(DocumentError::UnexpectedEof(PROPERTY_TAG.to_string())),
            _ => continue,
        };

        match field.as_str() {
            NAME_TAG => set_once(&mut name, text),
            DESCRIPTION_TAG => set_once(&mut description, text),
            VALUE_TAG => set_once(&mut value, text),
            _ => extras.push((field, text)),
        }
    }

    let name = name.ok_or(DocumentError::MissingName { index })?;
    Ok(PropertyRecord { name, description, value: value.unwrap_or_default(), extras })
}

fn read_field_text(reader: &mut Reader<&[u8]>, field: &str) -> Result<String, DocumentError> {
    let mut text = String::new();
    loop {
        match next_event(reader)? {
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|source| syntax(reader, source))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Start(e) | Event::Empty(e) => {
                return Err(DocumentError::NestedField {
                    field: field.to_string(),
                    element: element_name(&e)?,
                });
            }
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(DocumentError::UnexpectedEof(field.to_string())),
            _ => {}
        }
    }
}

fn write_property(writer: &mut Writer<Vec<u8>>, record: &PropertyRecord) -> Result<(), DocumentError> {
    writer.write_event(Event::Start(BytesStart::new(PROPERTY_TAG)))?;
    write_leaf(writer, NAME_TAG, &record.name)?;
    if let Some(description) = &record.description {
        write_leaf(writer, DESCRIPTION_TAG, description)?;
    }
    write_leaf(writer, VALUE_TAG, &record.value)?;
    for (field, text) in &record.extras {
        write_leaf(writer, field, text)?;
    }
    writer.write_event(Event::End(BytesEnd::new(PROPERTY_TAG)))?;
    Ok(())
}

fn write_leaf(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<(), DocumentError> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(tag)))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }
    Ok(())
}
