//! Content extractors
//!
//! Design: every extractor is a pure, single-pass function over the raw
//! documentation text. Fence tracking is shared through [`scan`], so each
//! extractor only supplies its own filtering rule and rendering.
//!
//! Extractors return a [`ContentBlock`]; its `Display` output is the
//! rendered markdown, or an empty string when nothing matched.

mod fenced;
mod lines;
mod prose;
mod scan;
mod sections;

pub use fenced::{extract_apidoc, extract_code_blocks, extract_commands};
pub use lines::{extract_notes, extract_signatures};
pub use prose::extract_prose;
pub use sections::{extract_migration, extract_patterns, extract_troubleshooting};

use crate::types::ContentType;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    text: String,
    counted: bool,
}

/// Extracted fragments for one content category
///
/// Holds at most `limit` counted items. Context markers (such as the
/// subsection headings kept by the prose extractor) are interleaved with
/// items but do not count against the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    category: ContentType,
    fragments: Vec<Fragment>,
    limit: usize,
}

impl ContentBlock {
    pub(crate) fn new(category: ContentType, limit: usize) -> Self {
        Self {
            category,
            fragments: Vec::new(),
            limit,
        }
    }

    /// Append a counted item; ignored once the limit is reached
    pub(crate) fn push_item(&mut self, text: impl Into<String>) -> bool {
        if self.is_full() {
            return false;
        }
        self.fragments.push(Fragment {
            text: text.into(),
            counted: true,
        });
        true
    }

    /// Append an uncounted context marker
    pub(crate) fn push_marker(&mut self, text: impl Into<String>) {
        self.fragments.push(Fragment {
            text: text.into(),
            counted: false,
        });
    }

    /// Category this block was extracted for
    pub fn category(&self) -> ContentType {
        self.category
    }

    /// Number of counted items
    pub fn items(&self) -> usize {
        self.fragments.iter().filter(|f| f.counted).count()
    }

    /// Maximum number of counted items
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// True once `limit` items have been collected
    pub fn is_full(&self) -> bool {
        self.items() >= self.limit
    }

    /// True if nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Rendered fragments in document order
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|f| f.text.as_str())
    }
}

impl fmt::Display for ContentBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&fragment.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_limit() {
        let mut block = ContentBlock::new(ContentType::Notes, 2);
        assert!(block.push_item("- a"));
        block.push_marker("### marker\n");
        assert!(block.push_item("- b"));
        assert!(!block.push_item("- c"));
        assert!(block.is_full());
        assert_eq!(block.items(), 2);
        assert_eq!(block.fragments().count(), 3);
        assert_eq!(block.limit(), 2);
        assert_eq!(block.category(), ContentType::Notes);
    }

    #[test]
    fn test_block_display() {
        let mut block = ContentBlock::new(ContentType::Notes, 5);
        assert_eq!(block.to_string(), "");
        block.push_item("- a");
        block.push_item("- b");
        assert_eq!(block.to_string(), "- a\n- b");
    }
}
