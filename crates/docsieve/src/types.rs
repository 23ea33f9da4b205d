//! Core types for Docsieve

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of items kept per content type
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Content category that can be extracted from raw documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    /// Fenced code examples
    Examples,
    /// APIDOC blocks and declaration signatures
    ApiRef,
    /// Shell/terminal commands
    Setup,
    /// Conceptual prose paragraphs
    Concepts,
    /// Breaking changes and upgrade notes
    Migration,
    /// Workarounds and debugging tips
    Troubleshooting,
    /// Best practices and conventions
    Patterns,
    /// Warnings, cautions and deprecations
    Notes,
    /// No filtering
    All,
}

impl ContentType {
    /// Every recognized content type, in menu order
    pub const ALL: [ContentType; 9] = [
        ContentType::Examples,
        ContentType::ApiRef,
        ContentType::Setup,
        ContentType::Concepts,
        ContentType::Migration,
        ContentType::Troubleshooting,
        ContentType::Patterns,
        ContentType::Notes,
        ContentType::All,
    ];

    /// Name as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Examples => "examples",
            ContentType::ApiRef => "api-ref",
            ContentType::Setup => "setup",
            ContentType::Concepts => "concepts",
            ContentType::Migration => "migration",
            ContentType::Troubleshooting => "troubleshooting",
            ContentType::Patterns => "patterns",
            ContentType::Notes => "notes",
            ContentType::All => "all",
        }
    }

    /// Comma separated list of every valid name
    pub fn menu() -> String {
        Self::ALL
            .iter()
            .map(ContentType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown content type: {}", s))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legacy `--mode` values kept for older callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyMode {
    /// `code` -> examples,api-ref
    Code,
    /// `info` -> concepts,examples
    Info,
}

impl LegacyMode {
    /// Content types this mode stands for
    pub fn content_types(&self) -> &'static str {
        match self {
            LegacyMode::Code => "examples,api-ref",
            LegacyMode::Info => "concepts,examples",
        }
    }
}

impl FromStr for LegacyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(LegacyMode::Code),
            "info" => Ok(LegacyMode::Info),
            _ => Err(format!("Unknown mode: {} (expected code or info)", s)),
        }
    }
}

/// Which content types to extract and how many items to keep of each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    content_types: String,
    max_items: usize,
}

impl ExtractionRequest {
    /// Create a request from a comma separated list of content types
    pub fn new(content_types: impl Into<String>, max_items: usize) -> Self {
        Self {
            content_types: content_types.into(),
            max_items,
        }
    }

    /// Request for unfiltered content
    pub fn all(max_items: usize) -> Self {
        Self::new(ContentType::All.as_str(), max_items)
    }

    /// The content types exactly as the caller wrote them
    pub fn content_types(&self) -> &str {
        &self.content_types
    }

    /// Maximum items kept per content type
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Requested names in caller order, trimmed
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.content_types
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// True if the whole request is `all`; inside a list it is not special
    pub fn is_all(&self) -> bool {
        self.content_types.trim() == ContentType::All.as_str()
    }
}

impl Default for ExtractionRequest {
    fn default() -> Self {
        Self::new(ContentType::Examples.as_str(), DEFAULT_MAX_ITEMS)
    }
}

/// One text item of an MCP tool result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Item kind, normally "text"
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Text payload
    #[serde(default)]
    pub text: String,
}

/// Result of an MCP `tools/call`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Returned content items
    #[serde(default)]
    pub content: Vec<ContentItem>,

    /// Set by the server when the tool failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Build a successful single-text result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem {
                kind: "text".to_string(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    /// Text of the first content item, or "" when there is none
    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}
