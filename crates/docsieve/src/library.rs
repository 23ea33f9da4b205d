//! Library identifiers and name resolution parsing

use crate::error::DocsError;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

static LIBRARY_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/[a-zA-Z0-9_-]+/[a-zA-Z0-9_.-]+(/[a-zA-Z0-9_.-]+)?$")
        .expect("library id pattern is valid")
});

static RESOLVED_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Context7-compatible library ID:\s*([/\w.-]+)").expect("resolve pattern is valid")
});

static RESOLVED_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s*(.+)").expect("title pattern is valid"));

// Git Bash rewrites `/org/project` into a path under its install directory
static DRIVE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]:[/\\].*?[/\\]Git[/\\](.+)$").expect("drive path pattern is valid")
});

static MSYS_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/[a-z]/.*?/Git/(.+)$").expect("msys path pattern is valid")
});

/// Undo MINGW/MSYS path expansion of a library identifier
///
/// `C:/Program Files/Git/vercel/next.js` and
/// `/c/Program Files/Git/vercel/next.js` both become `/vercel/next.js`.
/// Anything else is returned as is.
pub fn repair_shell_path(value: &str) -> Cow<'_, str> {
    if let Some(caps) = DRIVE_PATH_RE.captures(value) {
        return Cow::Owned(format!("/{}", caps[1].replace('\\', "/")));
    }
    if let Some(caps) = MSYS_PATH_RE.captures(value) {
        return Cow::Owned(format!("/{}", &caps[1]));
    }
    Cow::Borrowed(value)
}

/// Context7 library identifier, `/org/project` or `/org/project/version`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryId(String);

impl LibraryId {
    /// Validate a caller-supplied identifier
    pub fn parse(value: &str) -> Result<Self, DocsError> {
        if LIBRARY_ID_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(DocsError::InvalidLibraryId(value.to_string()))
        }
    }

    /// Identifier as returned by the service; not re-validated
    pub(crate) fn resolved(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Library picked by the service for a name lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved identifier
    pub id: LibraryId,
    /// Display title of the first listed match, possibly empty
    pub title: String,
}

impl Resolution {
    /// Parse a resolve response; `None` when it names no identifier
    pub fn parse(text: &str) -> Option<Self> {
        let id = RESOLVED_ID_RE.captures(text)?.get(1)?.as_str();
        let title = RESOLVED_TITLE_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end().to_string())
            .unwrap_or_default();
        Some(Self {
            id: LibraryId::resolved(id),
            title,
        })
    }

    /// Whether this resolution plausibly is the library the caller named
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        let id = self.id.as_str().to_lowercase();
        if id.contains(&name) || self.title.to_lowercase().contains(&name) {
            return true;
        }

        let strip = |s: &str| -> String {
            s.chars()
                .filter(|c| !matches!(c, '.' | '-' | '_' | ' '))
                .collect()
        };
        strip(&id).contains(&strip(&name))
    }
}
