//! Runtime configuration: API key discovery and endpoint selection

use crate::retry::RetrySchedule;
use crate::transport::DEFAULT_ENDPOINT;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "CONTEXT7_API_KEY";

/// Key file looked up in the working directory and the home directory
pub const KEY_FILE_NAME: &str = ".context7.env";

/// Where an API key was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// `CONTEXT7_API_KEY`
    Environment,
    /// `./.context7.env`
    ProjectFile,
    /// `~/.context7.env`
    UserFile,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeySource::Environment => "environment variable",
            KeySource::ProjectFile => "project config (.context7.env)",
            KeySource::UserFile => "user config (~/.context7.env)",
        })
    }
}

/// A discovered Context7 API key
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    source: KeySource,
}

// Keep the secret out of debug logs
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &self.masked())
            .field("source", &self.source)
            .finish()
    }
}

impl ApiKey {
    /// Wrap a key value
    pub fn new(value: impl Into<String>, source: KeySource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    /// Look the key up in the environment, `./.context7.env`, then `~/.context7.env`
    pub fn discover() -> Option<Self> {
        Self::discover_in(
            std::env::var(API_KEY_ENV).ok(),
            Path::new(KEY_FILE_NAME),
            user_key_file().as_deref(),
        )
    }

    /// Discovery over explicit sources; the first non-empty value wins
    pub fn discover_in(
        env_value: Option<String>,
        project_file: &Path,
        user_file: Option<&Path>,
    ) -> Option<Self> {
        if let Some(value) = env_value.filter(|v| !v.is_empty()) {
            return Some(Self::new(value, KeySource::Environment));
        }
        if let Some(value) = read_key_file(project_file) {
            return Some(Self::new(value, KeySource::ProjectFile));
        }
        user_file
            .and_then(read_key_file)
            .map(|value| Self::new(value, KeySource::UserFile))
    }

    /// The raw key
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Where the key came from
    pub fn source(&self) -> KeySource {
        self.source
    }

    /// First 12 and last 4 characters, joined by `...`
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        let head: String = chars.iter().take(12).collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Read `CONTEXT7_API_KEY=...` from a key file
///
/// Missing or unreadable files yield `None`. The value is trimmed of
/// whitespace and surrounding quotes; empty values are skipped.
pub fn read_key_file(path: &Path) -> Option<String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!("No key file at {}: {}", path.display(), err);
            return None;
        }
    };

    let prefix = format!("{}=", API_KEY_ENV);
    contents.lines().find_map(|line| {
        let value = line
            .trim()
            .strip_prefix(&prefix)?
            .trim()
            .trim_matches(|c| c == '\'' || c == '"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Discovered API key, if any
    pub api_key: Option<ApiKey>,
    /// MCP endpoint
    pub endpoint: Url,
    /// Delays between query attempts
    pub retry: RetrySchedule,
}

impl Config {
    /// Configuration with a discovered API key and the default retry schedule
    pub fn discover(endpoint: Url) -> Self {
        Self {
            api_key: ApiKey::discover(),
            endpoint,
            retry: RetrySchedule::default(),
        }
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            retry: RetrySchedule::default(),
        }
    }
}

/// Path of the user-level key file, if a home directory is known
pub fn user_key_file() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(KEY_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_key_file_trims_quotes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(KEY_FILE_NAME);
        fs::write(
            &path,
            "# Context7\nOTHER=1\n  CONTEXT7_API_KEY = \"ctx7sk_abc\" \n",
        )
        .unwrap();
        // "CONTEXT7_API_KEY =" has a space before '=' and is not a key line
        assert_eq!(read_key_file(&path), None);

        fs::write(&path, "CONTEXT7_API_KEY=\nCONTEXT7_API_KEY= 'ctx7sk_abc'\n").unwrap();
        assert_eq!(read_key_file(&path).as_deref(), Some("ctx7sk_abc"));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_key_file(&dir.path().join("absent.env")), None);
    }

    #[test]
    fn test_discovery_order() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project.env");
        let user = dir.path().join("user.env");
        fs::write(&project, "CONTEXT7_API_KEY=project-key\n").unwrap();
        fs::write(&user, "CONTEXT7_API_KEY=user-key\n").unwrap();

        let key = ApiKey::discover_in(Some("env-key".into()), &project, Some(&user)).unwrap();
        assert_eq!(key.value(), "env-key");
        assert_eq!(key.source(), KeySource::Environment);

        let key = ApiKey::discover_in(Some(String::new()), &project, Some(&user)).unwrap();
        assert_eq!(key.value(), "project-key");
        assert_eq!(key.source().to_string(), "project config (.context7.env)");

        let missing = dir.path().join("missing.env");
        let key = ApiKey::discover_in(None, &missing, Some(&user)).unwrap();
        assert_eq!(key.value(), "user-key");
        assert_eq!(key.source(), KeySource::UserFile);

        assert!(ApiKey::discover_in(None, &missing, None).is_none());
    }

    #[test]
    fn test_masked() {
        let key = ApiKey::new("ctx7sk_0123456789abcdef", KeySource::Environment);
        assert_eq!(key.masked(), "ctx7sk_01234...cdef");
        assert!(!format!("{:?}", key).contains("56789ab"));

        let short = ApiKey::new("ключ", KeySource::Environment);
        assert_eq!(short.masked(), "ключ...ключ");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.has_api_key());
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.retry.attempts(), 3);
    }
}
