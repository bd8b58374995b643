//! XML rendering of invoice records using quick-xml.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::Value;
use tracing::debug;

use crate::error::XmlError;
use crate::models::invoice::{InvoiceField, InvoiceRecord};

/// Root element of the XML document.
pub const ROOT_ELEMENT: &str = "InvoiceData";

/// MIME type of the saved document.
pub const XML_MIME_TYPE: &str = "application/xml";

/// Render a record as a pretty-printed XML document.
///
/// Present fields become child elements of `InvoiceData` in canonical order;
/// absent fields are left out. No attributes are written. Values holding
/// characters outside the XML 1.0 character set are rejected.
pub fn to_xml(record: &InvoiceRecord) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", None, None)))?;

    let mut fields = record.fields().peekable();
    if fields.peek().is_none() {
        write(&mut writer, Event::Empty(BytesStart::new(ROOT_ELEMENT)))?;
    } else {
        write(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
        for (field, value) in fields {
            check_chars(field, value)?;
            let name = field.element_name();
            if value.is_empty() {
                write(&mut writer, Event::Empty(BytesStart::new(name)))?;
            } else {
                write(&mut writer, Event::Start(BytesStart::new(name)))?;
                write(&mut writer, Event::Text(BytesText::new(value)))?;
                write(&mut writer, Event::End(BytesEnd::new(name)))?;
            }
        }
        write(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
    }

    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

/// Convert a parsed JSON object straight to XML.
pub fn json_to_xml(value: &Value) -> Result<String, XmlError> {
    to_xml(&InvoiceRecord::from_json(value)?)
}

/// Read a record back from an `InvoiceData` document.
///
/// Element text is taken verbatim (after unescaping). Unknown elements are
/// skipped.
pub fn from_xml(xml: &str) -> Result<InvoiceRecord, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut record = InvoiceRecord::new();
    let mut seen_root = false;
    let mut current: Option<InvoiceField> = None;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Read(e.to_string()))?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if !seen_root {
                    check_root(&name)?;
                    seen_root = true;
                } else {
                    current = InvoiceField::from_element_name(&name);
                    if current.is_none() {
                        debug!("Skipping unknown element <{}>", name);
                    }
                    text.clear();
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if !seen_root {
                    check_root(&name)?;
                    seen_root = true;
                } else if let Some(field) = InvoiceField::from_element_name(&name) {
                    record.set(field, "");
                }
            }
            Event::Text(e) if current.is_some() => {
                let unescaped = e.unescape().map_err(|e| XmlError::Read(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) if current.is_some() => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::End(_) => {
                if let Some(field) = current.take() {
                    record.set(field, std::mem::take(&mut text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(XmlError::Read("document has no root element".to_string()));
    }
    Ok(record)
}

fn check_chars(field: InvoiceField, value: &str) -> Result<(), XmlError> {
    match value.chars().find(|&ch| !is_xml_char(ch)) {
        Some(ch) => Err(XmlError::InvalidCharacter {
            field: field.key().to_string(),
            ch,
        }),
        None => Ok(()),
    }
}

/// The `Char` production of XML 1.0.
fn is_xml_char(ch: char) -> bool {
    matches!(ch,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn check_root(name: &str) -> Result<(), XmlError> {
    if name == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(XmlError::UnexpectedRoot(name.to_string()))
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}
