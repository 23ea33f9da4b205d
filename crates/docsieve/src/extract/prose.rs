//! Conceptual prose extractor

use super::scan::{FenceScanner, LineKind};
use super::ContentBlock;
use crate::types::ContentType;

/// Paragraphs must be strictly longer than this many characters
const MIN_PARAGRAPH_LEN: usize = 100;

/// Subsection heading prefix kept as a context marker
const SUBSECTION_PREFIX: &str = "###";

/// Extract explanatory paragraphs, skipping code, lists and rules
///
/// `###` headings are kept in document order as context for the
/// paragraphs around them. They are only emitted while fewer than
/// `max_items` paragraphs have been kept and do not count towards it.
pub fn extract_prose(text: &str, max_items: usize) -> ContentBlock {
    let mut block = ContentBlock::new(ContentType::Concepts, max_items);
    let mut paragraph: Vec<&str> = Vec::new();

    for line in FenceScanner::new(text) {
        match line.kind {
            LineKind::Open(_) | LineKind::Close => flush(&mut paragraph, &mut block),
            LineKind::Fenced => {}
            LineKind::Text => {
                let raw = line.raw;
                if is_rule(raw) || raw.starts_with("Source:") {
                    continue;
                }
                if raw.trim().is_empty() {
                    flush(&mut paragraph, &mut block);
                } else if raw.starts_with(SUBSECTION_PREFIX) {
                    flush(&mut paragraph, &mut block);
                    if !block.is_full() {
                        block.push_marker(format!("{}\n", raw));
                    }
                } else if !is_list_item(raw) {
                    paragraph.push(raw);
                }
            }
        }
    }
    flush(&mut paragraph, &mut block);

    block
}

/// Close the current paragraph, keeping it if long enough
fn flush(paragraph: &mut Vec<&str>, block: &mut ContentBlock) {
    if paragraph.is_empty() {
        return;
    }
    let text = paragraph.join(" ");
    paragraph.clear();
    if text.chars().count() > MIN_PARAGRAPH_LEN {
        block.push_item(format!("{}\n", text));
    }
}

/// `---` or `===` horizontal rules
fn is_rule(line: &str) -> bool {
    line.len() >= 3 && (line.bytes().all(|b| b == b'-') || line.bytes().all(|b| b == b'='))
}

/// Bullet items and bold-led definition lines
fn is_list_item(line: &str) -> bool {
    if line.starts_with("* ") || line.starts_with("- ") {
        return true;
    }
    line.strip_prefix("**")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_alphabetic())
}
