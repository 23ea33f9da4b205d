//! Keyword-triggered section extractors
//!
//! A line matching one of the trigger patterns starts a section that runs
//! until the next trigger line. Patterns, migration notes and
//! troubleshooting all share this engine with different triggers.

use super::scan::{FenceScanner, LineKind};
use super::ContentBlock;
use crate::types::ContentType;
use regex::Regex;
use std::sync::LazyLock;

/// Section content must be strictly longer than this many characters
const MIN_SECTION_LEN: usize = 50;

static PATTERN_TRIGGERS: LazyLock<Regex> = LazyLock::new(|| {
    trigger_regex(&[
        "best practice",
        "pattern",
        "recommend",
        "should not",
        "avoid",
        "prefer",
        "idiomatic",
        "convention",
        "guideline",
    ])
});

static MIGRATION_TRIGGERS: LazyLock<Regex> =
    LazyLock::new(|| trigger_regex(&["breaking change", "migrat", "upgrad", r"version [0-9]"]));

static TROUBLESHOOTING_TRIGGERS: LazyLock<Regex> = LazyLock::new(|| {
    trigger_regex(&[
        "workaround",
        "temporary",
        "debug",
        "troubleshoot",
        r"fix(?:ing)?\s",
        r"error\s",
        "warning",
        "issue",
        "problem",
        "solution",
    ])
});

fn trigger_regex(patterns: &[&str]) -> Regex {
    Regex::new(&format!("(?i){}", patterns.join("|"))).expect("trigger patterns are valid")
}

/// Extract best-practice and convention sections
pub fn extract_patterns(text: &str, max_items: usize) -> ContentBlock {
    keyword_sections(text, max_items, ContentType::Patterns, "Pattern", &PATTERN_TRIGGERS)
}

/// Extract migration and breaking-change sections
pub fn extract_migration(text: &str, max_items: usize) -> ContentBlock {
    keyword_sections(text, max_items, ContentType::Migration, "Migration", &MIGRATION_TRIGGERS)
}

/// Extract workaround and debugging sections
pub fn extract_troubleshooting(text: &str, max_items: usize) -> ContentBlock {
    keyword_sections(
        text,
        max_items,
        ContentType::Troubleshooting,
        "Troubleshooting",
        &TROUBLESHOOTING_TRIGGERS,
    )
}

/// Section being accumulated
struct OpenSection<'a> {
    header: &'a str,
    lines: Vec<&'a str>,
}

fn keyword_sections(
    text: &str,
    max_items: usize,
    category: ContentType,
    label: &str,
    trigger: &Regex,
) -> ContentBlock {
    let mut block = ContentBlock::new(category, max_items);
    let mut current: Option<OpenSection<'_>> = None;

    for line in FenceScanner::new(text) {
        let starts_section = line.kind == LineKind::Text && trigger.is_match(line.raw);
        if starts_section {
            if let Some(section) = current.take() {
                close_section(section, label, &mut block);
            }
            current = Some(OpenSection {
                header: strip_heading_marks(line.raw),
                lines: Vec::new(),
            });
        } else if let Some(section) = current.as_mut() {
            section.lines.push(line.raw);
        }
    }
    if let Some(section) = current {
        close_section(section, label, &mut block);
    }

    block
}

fn close_section(section: OpenSection<'_>, label: &str, block: &mut ContentBlock) {
    let content = section.lines.join("\n");
    if content.chars().count() <= MIN_SECTION_LEN {
        return;
    }
    let mut rendered = format!("### {} {}\n", label, block.items() + 1);
    if !section.header.is_empty() {
        rendered.push_str(&format!("**{}**\n\n", section.header));
    }
    rendered.push_str(&content);
    rendered.push_str("\n\n---\n");
    block.push_item(rendered);
}

/// Drop leading `#` markers and the whitespace after them
fn strip_heading_marks(line: &str) -> &str {
    match line.strip_prefix('#') {
        Some(rest) => rest.trim_start_matches('#').trim_start(),
        None => line,
    }
}
