//! DOCX (Office Open XML) raw text extraction.
//!
//! A `.docx` is a ZIP archive; body text lives in `word/document.xml` as
//! runs of `<w:t>` inside `<w:p>` paragraphs. Each paragraph is emitted
//! followed by a blank line when it closes, so a text box nested inside a
//! paragraph comes out ahead of the paragraph that holds it. Tabs and breaks
//! inside runs are kept; tab stops in paragraph properties are not.

use std::io::{BufReader, Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{ExtractError, Extractor};

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxExtractor;

impl Extractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn label(&self) -> &'static str {
        "DOCX"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let part = match archive.by_name(DOCUMENT_PART) {
            Ok(part) => part,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ExtractError::MissingPart(DOCUMENT_PART))
            }
            Err(e) => return Err(e.into()),
        };
        paragraphs_to_text(BufReader::new(part))
    }
}

fn paragraphs_to_text<R: Read>(reader: BufReader<R>) -> Result<String, ExtractError> {
    let mut xml = Reader::from_reader(reader);
    let mut buf = Vec::new();

    let mut out = String::new();
    // Paragraphs nest (text boxes live inside a run of the outer paragraph).
    let mut open: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    // Inside pPr/rPr, `tab` and `br` describe layout, not content.
    let mut props_depth = 0usize;
    // `mc:Fallback` repeats the `mc:Choice` content for older readers.
    let mut fallback_depth = 0usize;
    let mut in_text = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) if fallback_depth > 0 => {
                if e.local_name().as_ref() == b"Fallback" {
                    fallback_depth += 1;
                }
            }
            Event::End(e) if fallback_depth > 0 => {
                if e.local_name().as_ref() == b"Fallback" {
                    fallback_depth -= 1;
                }
            }
            _ if fallback_depth > 0 => {}
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => run_depth += 1,
                b"pPr" | b"rPr" => props_depth += 1,
                b"t" => in_text = true,
                b"Fallback" => fallback_depth = 1,
                _ => {}
            },
            Event::Empty(e) => {
                let in_content = run_depth > 0 && props_depth == 0;
                match e.local_name().as_ref() {
                    b"tab" if in_content => push_to(&mut open, "\t"),
                    b"br" | b"cr" if in_content => push_to(&mut open, "\n"),
                    // A self-closed paragraph is still a (blank) paragraph.
                    b"p" => out.push_str("\n\n"),
                    _ => {}
                }
            }
            Event::Text(t) if in_text => {
                let text = t.unescape()?;
                push_to(&mut open, &text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"pPr" | b"rPr" => props_depth = props_depth.saturating_sub(1),
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        out.push_str(&paragraph);
                        out.push_str("\n\n");
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn push_to(open: &mut [String], text: &str) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push_str(text);
    }
}
