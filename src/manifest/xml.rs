//! XML reading and writing for git-repo compatible manifests

use super::element::Element;
use super::registry::ROOT_TAG;
use crate::{ArmmError, Result};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

/// Default indentation width for written manifests
pub const DEFAULT_INDENT: usize = 2;

/// Parse manifest XML into its root element
///
/// Whitespace-only text is discarded. Fails if the document is not well
/// formed or its root is not `<manifest>`.
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(start_element(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(ref e)) => {
                let mut element = stack.pop().ok_or_else(|| {
                    ArmmError::Parse(format!(
                        "Unexpected closing tag: {}",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                let text = element.text.take().unwrap_or_default();
                element.set_text(text);
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.decode().map_err(parse_err)?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::CData(ref e)) => {
                let text = e.decode().map_err(parse_err)?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::GeneralRef(ref e)) => {
                let resolved = resolve_reference(e)?;
                push_text(&mut stack, &resolved)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ArmmError::Parse(format!(
                    "Error parsing manifest XML at position {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            // Declarations, comments, doctypes and processing instructions
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ArmmError::Parse(format!("Unclosed element: {}", open.tag)));
    }

    let root = root.ok_or_else(|| ArmmError::Parse("Manifest has no root element".to_string()))?;
    if root.tag != ROOT_TAG {
        return Err(ArmmError::Parse(format!(
            "Root element must be <{}>, found <{}>",
            ROOT_TAG, root.tag
        )));
    }

    Ok(root)
}

/// Serialize a root element with an XML declaration and stable indentation
pub fn write(root: &Element, indent: usize) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_err)?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');

    String::from_utf8(bytes).map_err(write_err)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in element.attrs.iter() {
        start.push_attribute((key, value));
    }

    if element.children.is_empty() && element.text.is_none() {
        writer.write_event(Event::Empty(start)).map_err(write_err)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(write_err)?;
    if let Some(ref text) = element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_err)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(write_err)?;

    Ok(())
}

fn start_element(e: &BytesStart) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ArmmError::Parse(format!("Invalid attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ArmmError::Parse(format!("Invalid attribute value: {}", e)))?;
        element.attrs.set(key, value);
    }

    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push(element);
    } else if root.is_some() {
        return Err(ArmmError::Parse(format!(
            "Multiple root elements, found extra <{}>",
            element.tag
        )));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        // Whitespace after a child is indentation written by the writer
        Some(current) if !current.children.is_empty() && text.trim().is_empty() => Ok(()),
        Some(current) => {
            current
                .text
                .get_or_insert_with(String::new)
                .push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ArmmError::Parse(
            "Text content outside of the root element".to_string(),
        )),
    }
}

fn resolve_reference(e: &BytesRef) -> Result<String> {
    if let Some(ch) = e.resolve_char_ref().map_err(parse_err)? {
        return Ok(ch.to_string());
    }
    let name = e.decode().map_err(parse_err)?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| ArmmError::Parse(format!("Unknown entity reference: &{};", name)))
}

fn parse_err<E: Display>(e: E) -> ArmmError {
    ArmmError::Parse(format!("Error decoding manifest XML: {}", e))
}

fn write_err<E: Display>(e: E) -> ArmmError {
    ArmmError::Io(std::io::Error::other(format!(
        "Failed to write manifest XML: {}",
        e
    )))
}
