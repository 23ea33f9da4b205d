//! Single-line extractors: important notes and API signatures

use super::ContentBlock;
use crate::types::ContentType;
use regex::Regex;
use std::sync::LazyLock;

static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)important|note:|warning:|caution:|tip:|remember:|must|should not|deprecated|breaking change",
    )
    .expect("note pattern is valid")
});

/// Function/variable declarations, interfaces and type aliases
static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:export )?(?:",
        r"(?:async )?(?:function|const|let|var) [a-zA-Z_$][a-zA-Z0-9_$]*.*\(",
        r"|interface [a-zA-Z_$]",
        r"|type [a-zA-Z_$][a-zA-Z0-9_$]* =",
        r")",
    ))
    .expect("signature pattern is valid")
});

/// Extract warning/caution/deprecation lines as a bullet list
pub fn extract_notes(text: &str, max_items: usize) -> ContentBlock {
    let mut block = ContentBlock::new(ContentType::Notes, max_items);
    for line in text.lines().filter(|l| NOTE_RE.is_match(l)) {
        if !block.push_item(format!("- {}", line.trim())) {
            break;
        }
    }
    block
}

/// Extract declaration-shaped lines as a bullet list
pub fn extract_signatures(text: &str, max_items: usize) -> ContentBlock {
    let mut block = ContentBlock::new(ContentType::ApiRef, max_items);
    for line in text.lines().filter(|l| SIGNATURE_RE.is_match(l)) {
        if !block.push_item(format!("- `{}`", line)) {
            break;
        }
    }
    block
}
