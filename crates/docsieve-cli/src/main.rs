//! Docsieve CLI - fetch library documentation filtered by content type

use clap::{ArgGroup, Parser};
use docsieve::{
    ApiKey, Config, ContentType, DocsClient, DocsQuery, ExtractionRequest, LegacyMode,
    LibrarySelector, DASHBOARD_URL, DEFAULT_ENDPOINT, DEFAULT_MAX_ITEMS,
};
use std::io::{self, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;

const AFTER_HELP: &str = "\
Content Type Examples:
  --content-type examples              Code examples only
  --content-type api-ref               API signatures and documentation
  --content-type examples,api-ref      Both code examples AND API reference
  --content-type setup                 Installation/terminal commands
  --content-type concepts,examples     Explanations with code examples
  --content-type migration             Before/after, breaking changes
  --content-type troubleshooting       Workarounds, debugging tips
  --content-type patterns              Best practices and conventions
  --content-type notes                 Warnings, cautions, deprecations
  --content-type all                   No filtering, return everything

Usage Examples:
  docsieve --library react --topic useState --content-type examples
  docsieve --library-id /vercel/next.js --topic routing --content-type examples,api-ref
  docsieve --library prisma --topic \"getting started\" --content-type setup";

/// Docsieve - token-efficient documentation fetcher using Context7 MCP
#[derive(Parser, Debug)]
#[command(name = "docsieve")]
#[command(author, version, about, long_about = None, after_help = AFTER_HELP)]
#[command(group(ArgGroup::new("source").args(["library_id", "library"])))]
struct Cli {
    /// Context7 library ID, e.g. /reactjs/react.dev (skips resolution)
    #[arg(long)]
    library_id: Option<String>,

    /// Library name to resolve, e.g. react
    #[arg(long)]
    library: Option<String>,

    /// Topic to focus on
    #[arg(long, default_value = "")]
    topic: String,

    /// Comma separated content types [default: examples]
    #[arg(long)]
    content_type: Option<String>,

    /// Maximum items per content type
    #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
    max_items: usize,

    /// Legacy mode: code (examples,api-ref) or info (concepts,examples)
    #[arg(long)]
    mode: Option<LegacyMode>,

    /// Log progress and token statistics to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Check API key configuration status
    #[arg(long)]
    api_status: bool,

    /// MCP endpoint
    #[arg(long, hide = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: Url,
}

impl Cli {
    /// Content types after applying the legacy mode
    fn content_types(&self) -> String {
        match (&self.content_type, self.mode) {
            (Some(content_type), _) => content_type.clone(),
            (None, Some(mode)) => mode.content_types().to_string(),
            (None, None) => ContentType::Examples.to_string(),
        }
    }

    fn query(&self) -> DocsQuery {
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());
        let library = match (non_empty(&self.library_id), non_empty(&self.library)) {
            (Some(id), _) => Some(LibrarySelector::Id(id)),
            (None, Some(name)) => Some(LibrarySelector::Name(name)),
            (None, None) => None,
        };

        DocsQuery {
            library,
            topic: self.topic.clone(),
            request: ExtractionRequest::new(self.content_types(), self.max_items),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::discover(cli.endpoint.clone());

    if cli.api_status {
        writeln_safe(&format_api_status(config.api_key.as_ref()));
        return;
    }

    match &config.api_key {
        Some(key) => info!("API Key: configured ({})", key.source()),
        None => info!("API Key: not configured"),
    }

    let client = DocsClient::from_config(&config);
    match client.fetch_docs(&cli.query()).await {
        Ok(output) => writeln_safe(&output.text),
        Err(err) => {
            debug!(category = ?err.category(), "{}", err);
            writeln_safe(&err.report());
            std::process::exit(err.exit_code());
        }
    }
}

/// Log to stderr; `warn` by default, `info` with --verbose, RUST_LOG wins
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Format the --api-status report
fn format_api_status(key: Option<&ApiKey>) -> String {
    let mut output = String::from("Context7 API Key Status\n=======================\n\n");
    match key {
        Some(key) => {
            output.push_str("Status: CONFIGURED\n");
            output.push_str(&format!("Key: {}\n", key.masked()));
            output.push_str(&format!("Source: {}", key.source()));
        }
        None => {
            output.push_str("Status: NOT CONFIGURED\n\n");
            output.push_str("To configure, save your API key:\n");
            output.push_str("  echo \"CONTEXT7_API_KEY=your_key\" > ~/.context7.env\n\n");
            output.push_str(&format!("Get a free API key at: {}", DASHBOARD_URL));
        }
    }
    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use docsieve::KeySource;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("docsieve").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--library", "react"]);
        assert_eq!(cli.content_types(), "examples");
        assert_eq!(cli.max_items, 5);
        assert_eq!(cli.endpoint.as_str(), DEFAULT_ENDPOINT);

        let query = cli.query();
        assert_eq!(query.library, Some(LibrarySelector::Name("react".to_string())));
        assert_eq!(query.topic, "");
        assert_eq!(query.request.content_types(), "examples");
    }

    #[test]
    fn test_legacy_mode_mapping() {
        let cli = parse(&["--library", "react", "--mode", "code"]);
        assert_eq!(cli.content_types(), "examples,api-ref");

        let cli = parse(&["--library", "react", "--mode", "info"]);
        assert_eq!(cli.content_types(), "concepts,examples");

        assert!(Cli::try_parse_from(["docsieve", "--mode", "full"]).is_err());
    }

    #[test]
    fn test_content_type_overrides_mode() {
        let cli = parse(&[
            "--library-id",
            "/vercel/next.js",
            "--content-type",
            "setup,notes",
            "--mode",
            "code",
            "--max-items",
            "2",
        ]);
        let query = cli.query();
        assert_eq!(
            query.library,
            Some(LibrarySelector::Id("/vercel/next.js".to_string()))
        );
        assert_eq!(query.request.content_types(), "setup,notes");
        assert_eq!(query.request.max_items(), 2);
    }

    #[test]
    fn test_library_options_conflict() {
        let result = Cli::try_parse_from([
            "docsieve",
            "--library",
            "react",
            "--library-id",
            "/reactjs/react.dev",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_library_is_missing() {
        let cli = parse(&["--library-id", "", "--topic", "hooks"]);
        assert_eq!(cli.query().library, None);
    }

    #[test]
    fn test_api_status_configured() {
        let key = ApiKey::new("ctx7sk_0123456789abcdef", KeySource::UserFile);
        let output = format_api_status(Some(&key));
        assert!(output.starts_with("Context7 API Key Status\n=======================\n\n"));
        assert!(output.contains("Status: CONFIGURED\n"));
        assert!(output.contains("Key: ctx7sk_01234...cdef\n"));
        assert!(output.ends_with("Source: user config (~/.context7.env)"));
    }

    #[test]
    fn test_api_status_missing() {
        let output = format_api_status(None);
        assert!(output.contains("Status: NOT CONFIGURED"));
        assert!(output.ends_with("Get a free API key at: https://context7.com/dashboard"));
    }
}
