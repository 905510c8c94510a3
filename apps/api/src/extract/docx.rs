//! Word variant: reads `word/document.xml` out of the OOXML package and
//! returns the body paragraphs in document order, each followed by `\n`.
//!
//! Only paragraphs that are direct children of `w:body` count. Paragraphs in
//! tables, headers, footers and text boxes are not part of the output.
//! Inside a paragraph, run text (`w:t`) is kept, `w:tab` becomes `\t` and
//! `w:br` / `w:cr` become `\n`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::extract::{ExtractError, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, Default)]
pub struct WordExtractor;

impl TextExtractor for WordExtractor {
    fn name(&self) -> &'static str {
        "word"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| ExtractError::Word(e.to_string()))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ExtractError::Word(format!("{DOCUMENT_PART}: {e}")))?
            .read_to_string(&mut xml)?;

        let paragraphs = body_paragraphs(&xml)?;
        Ok(join_paragraphs(&paragraphs))
    }
}

pub fn join_paragraphs(paragraphs: &[String]) -> String {
    let mut text = String::with_capacity(paragraphs.iter().map(|p| p.len() + 1).sum());
    for paragraph in paragraphs {
        text.push_str(paragraph);
        text.push('\n');
    }
    text
}

/// Text of each body-level `w:p` in `document.xml`.
pub fn body_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    // Open body-level paragraph, with the depth its `w:p` sits at in `open`.
    let mut current: Option<(usize, String)> = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"p" && current.is_none() && parent_is(&open, b"body") {
                    current = Some((open.len(), String::new()));
                }
                open.push(name);
            }
            Event::Empty(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"p" if current.is_none() && parent_is(&open, b"body") => {
                        paragraphs.push(String::new());
                    }
                    b"tab" | b"br" | b"cr" if parent_is(&open, b"r") => {
                        if let Some((depth, text)) = current.as_mut() {
                            if directly_in_paragraph(&open, *depth) {
                                text.push(if name.as_ref() == b"tab" { '\t' } else { '\n' });
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let Some((depth, text)) = current.as_mut() {
                    if parent_is(&open, b"t") && directly_in_paragraph(&open, *depth) {
                        text.push_str(&t.unescape().map_err(malformed)?);
                    }
                }
            }
            Event::End(_) => {
                open.pop();
                if matches!(current, Some((depth, _)) if depth == open.len()) {
                    if let Some((_, text)) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parent_is(open: &[Vec<u8>], name: &[u8]) -> bool {
    open.last().is_some_and(|last| last.as_slice() == name)
}

/// True when no nested paragraph (text box content) sits between the
/// body-level paragraph at `depth` and the innermost open element.
fn directly_in_paragraph(open: &[Vec<u8>], depth: usize) -> bool {
    open.iter().skip(depth + 1).all(|name| name.as_slice() != b"p")
}

fn malformed(err: impl std::fmt::Display) -> ExtractError {
    ExtractError::Word(format!("malformed {DOCUMENT_PART}: {err}"))
}
