//! Caller-facing reports for every failure
//!
//! Each report is a self-contained block: a bracketed tag, what went wrong,
//! how to fix it, and where the call budget stands.

use crate::error::DocsError;

/// Remote calls allowed per question (one resolve + one query + one spare)
pub const CALL_BUDGET: u8 = 3;

/// Where to get or inspect an API key
pub const DASHBOARD_URL: &str = "https://context7.com/dashboard";

const COMMON_LIBRARY_IDS: &[(&str, &str)] = &[
    ("React", "/reactjs/react.dev"),
    ("Next.js", "/vercel/next.js"),
    ("Express", "/expressjs/express"),
    ("Prisma", "/prisma/docs"),
    ("FastAPI", "/fastapi/fastapi"),
    ("LangChain", "/langchain-ai/langchainjs"),
];

/// Setup instructions shown when no API key is configured
pub const API_KEY_MISSING: &str = "[CONTEXT7_API_KEY_MISSING]

Context7 API key is not configured.

## How to Fix

Save your API key using one of these methods:

**Option 1:** Save to config file
```bash
echo \"CONTEXT7_API_KEY=<your_key>\" > ~/.context7.env
```

**Option 2:** Set environment variable (temporary)
```bash
export CONTEXT7_API_KEY=<your_key>
```

Get a free API key at: https://context7.com/dashboard
The API key starts with `ctx7sk_` or `ctx7sk-`";

fn common_ids(limit: usize, width: usize) -> String {
    COMMON_LIBRARY_IDS
        .iter()
        .take(limit)
        .map(|(name, id)| format!("  {:<width$} {}", format!("{}:", name), id))
        .collect::<Vec<_>>()
        .join("\n")
}

fn key_remediation(has_api_key: bool, with_key: &str) -> String {
    if has_api_key {
        format!("\n{} {}", with_key, DASHBOARD_URL)
    } else {
        format!("\n\n{}", API_KEY_MISSING)
    }
}

impl DocsError {
    /// Render the full report for this error
    pub fn report(&self) -> String {
        match self {
            DocsError::MissingLibrary => format!(
                "[MISSING_ARGUMENT]\n\n\
                 Must specify --library-id or --library\n\n\
                 Examples:\n  \
                 --library react --topic hooks\n  \
                 --library-id /reactjs/react.dev --topic useState\n\n\
                 Call budget: 0 of {CALL_BUDGET} calls used"
            ),
            DocsError::InvalidLibraryId(id) => format!(
                "[INVALID_LIBRARY_ID]\n\n\
                 Invalid library ID format: {id}\n\n\
                 Library ID must be in format: /org/project or /org/project/version\n\n\
                 Examples:\n  /reactjs/react.dev\n  /vercel/next.js\n  /vercel/next.js/v14.3.0\n\n\
                 Call budget: 0 calls used (validation failed before API call)\n\
                 Use --library <name> to auto-resolve, or correct the ID format."
            ),
            DocsError::ResolveFailed { name, message } => format!(
                "[RESOLVE_ERROR]\n\n\
                 Failed to resolve library name: {name}\n\n\
                 Error: {message}\n\n\
                 Call budget: 1 of {CALL_BUDGET} calls used (resolution attempt)\n\
                 Use --library-id with the exact ID to skip resolution."
            ),
            DocsError::LibraryNotFound(name) => format!(
                "[LIBRARY_NOT_FOUND]\n\n\
                 Could not find library: {name}\n\n\
                 Call budget: 1 of {CALL_BUDGET} calls used (resolution attempt)\n\n\
                 Try:\n  \
                 - Different spelling (e.g., 'nextjs' instead of 'next.js')\n  \
                 - Using --library-id with exact ID\n\n\
                 Common library IDs:\n{}",
                common_ids(4, 9)
            ),
            DocsError::LibraryMismatch { name, id, title } => format!(
                "[LIBRARY_MISMATCH]\n\n\
                 Warning: '{name}' resolved to an unexpected library.\n\n\
                 Resolved library: {title}\n\
                 Library ID: {id}\n\n\
                 This may not be what you're looking for.\n\n\
                 Call budget: 1 of {CALL_BUDGET} calls used\n\n\
                 Options:\n  \
                 1. Try a different spelling of the library name\n  \
                 2. Use --library-id with the exact ID if this is correct\n  \
                 3. Check common library IDs below\n\n\
                 Common library IDs:\n{}",
                common_ids(COMMON_LIBRARY_IDS.len(), 10)
            ),
            DocsError::RateLimited { has_api_key } => format!(
                "[RATE_LIMIT_ERROR]\n\n\
                 Context7 rate limit exceeded.\n\n\
                 Call budget: This counts against your {CALL_BUDGET}-call limit.{}",
                key_remediation(
                    *has_api_key,
                    "Your API key may have exceeded its quota. Check:"
                )
            ),
            DocsError::AuthFailed { has_api_key } => format!(
                "[AUTH_ERROR]\n\n\
                 Authentication failed with Context7.{}\n\n\
                 Call budget: This counts against your {CALL_BUDGET}-call limit.",
                key_remediation(
                    *has_api_key,
                    "Your API key may be invalid. Get a new one at:"
                )
            ),
            DocsError::RetriesExhausted {
                attempts,
                last_error,
            } => format!(
                "[FETCH_FAILED_AFTER_RETRIES]\n\n\
                 MCP call failed after {attempts} attempts.\n\n\
                 Last error: {last_error}\n\n\
                 This does NOT count against your Context7 call budget."
            ),
            DocsError::FetchFailed(details) => format!(
                "[FETCH_ERROR]\n\n\
                 Failed to fetch documentation from Context7.\n\n\
                 Error details: {details}\n\n\
                 Call budget: this call may count against your {CALL_BUDGET}-call limit."
            ),
            DocsError::EmptyResults { library_id, topic } => format!(
                "[EMPTY_RESULTS]\n\n\
                 No documentation found for this query.\n\n\
                 Library ID: {library_id}\n\
                 Topic: {topic}\n\n\
                 Call budget: 2 of {CALL_BUDGET} calls used (resolution + query)\n\
                 You have 1 call remaining for this question.\n\n\
                 Suggestions:\n  \
                 1. Try a broader topic (e.g., 'hooks' instead of 'useCustomHook')\n  \
                 2. Try different content-type (e.g., --content-type all)\n  \
                 3. Verify the library ID is correct\n  \
                 4. Use the remaining call budget wisely"
            ),
            DocsError::NothingExtracted {
                requested,
                library_id,
                topic,
            } => format!(
                "[CONTENT_TYPE_EMPTY]\n\n\
                 No content found for requested types: {requested}\n\
                 Fallback to 'all' also returned no results.\n\n\
                 Library ID: {library_id}\n\
                 Topic: {topic}\n\n\
                 Call budget: 1-2 of {CALL_BUDGET} calls used\n\
                 Try a broader topic or different library."
            ),
        }
    }
}
