use std::io::{Cursor, Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::error::ExtractError;
use crate::model::SourceLine;

const DOCUMENT_XML: &str = "word/document.xml";

fn read_document_xml<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, ExtractError> {
    let mut document = archive.by_name(DOCUMENT_XML)?;
    let mut xml = String::new();
    document.read_to_string(&mut xml)?;
    Ok(xml)
}

fn push_paragraph(lines: &mut Vec<SourceLine>, index: u32, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        lines.push(SourceLine::new(index, text));
    }
}

/// One item per `w:p` paragraph, numbered by 1-based paragraph index. Empty
/// paragraphs are skipped but still advance the index.
pub(crate) fn paragraphs_from_xml(xml: &str) -> Result<Vec<SourceLine>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut paragraph_index = 0_u32;
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.name().as_ref() {
                b"w:p" => {
                    paragraph_index += 1;
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(element) => match element.name().as_ref() {
                b"w:p" => {
                    in_paragraph = false;
                    push_paragraph(&mut lines, paragraph_index, &current);
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(element) => match element.name().as_ref() {
                b"w:p" => paragraph_index += 1,
                b"w:tab" | b"w:br" if in_paragraph => current.push(' '),
                _ => {}
            },
            Event::Text(text) if in_text && in_paragraph => {
                let unescaped = text
                    .unescape()
                    .map_err(|error| ExtractError::DocxXml(error.into()))?;
                current.push_str(&unescaped);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines)
}

pub(crate) fn read_docx_lines(bytes: &[u8]) -> Result<Vec<SourceLine>, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let xml = read_document_xml(&mut archive)?;
    paragraphs_from_xml(&xml)
}
