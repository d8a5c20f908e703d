//! DOCX text extraction: reads the main document part of the Office Open XML package and
//! emits one line per body paragraph.
//!
//! Tables, text boxes, headers/footers and embedded objects are skipped.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{DocumentFormat, IngestError};

const DOCUMENT_PART: &str = "word/document.xml";

/// Returns the text of every body paragraph in document order, each followed by `\n`.
pub fn extract_text(bytes: &[u8]) -> Result<String, IngestError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| corrupt(format!("not a DOCX package: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| corrupt(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| corrupt(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    let mut text = String::new();
    for paragraph in body_paragraphs(&xml)? {
        text.push_str(&paragraph);
        text.push('\n');
    }
    Ok(text)
}

/// Walks `document.xml` and collects the run text of each top-level `w:p`.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    // depth inside w:tbl / w:txbxContent, whose paragraphs are not body paragraphs
    let mut skipped = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| corrupt(format!("malformed {DOCUMENT_PART}: {e}")))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" => skipped += 1,
                _ if skipped > 0 => {}
                b"w:p" => current = Some(String::new()),
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                if skipped > 0 {
                    continue;
                }
                match e.name().as_ref() {
                    b"w:p" => paragraphs.push(String::new()),
                    b"w:tab" if run_depth > 0 => push_to(&mut current, "\t"),
                    b"w:br" | b"w:cr" if run_depth > 0 => push_to(&mut current, "\n"),
                    _ => {}
                }
            }
            Event::Text(t) if in_text && skipped == 0 => {
                let text = t
                    .unescape()
                    .map_err(|e| corrupt(format!("bad text in {DOCUMENT_PART}: {e}")))?;
                push_to(&mut current, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" => skipped = skipped.saturating_sub(1),
                _ if skipped > 0 => {}
                b"w:p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_to(paragraph: &mut Option<String>, text: &str) {
    if let Some(p) = paragraph.as_mut() {
        p.push_str(text);
    }
}

fn corrupt(reason: String) -> IngestError {
    IngestError::CorruptDocument {
        format: DocumentFormat::Docx,
        reason,
    }
}
