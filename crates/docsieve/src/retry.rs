//! Retry schedule and failure classification for remote calls

use std::time::Duration;

/// Delays between query attempts; the length bounds the attempt count
pub const DEFAULT_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(10),
];

/// Error text fragments that mean the quota is exhausted
const RATE_LIMIT_PATTERNS: &[&str] = &["rate limit", "429", "Too many requests"];

/// Error text fragments that mean the credentials were rejected
const AUTH_PATTERNS: &[&str] = &["unauthorized", "Unauthorized", "API key", "authentication"];

/// Error text fragments of transient network failures
const RETRYABLE_PATTERNS: &[&str] = &[
    "Timeout",
    "timeout",
    "ETIMEDOUT",
    "ECONNREFUSED",
    "ECONNRESET",
    "Connection",
    "connection",
    "Network",
    "network",
];

/// Fixed sequence of delays between attempts
///
/// Attempt `n` (1-based) is followed by the `n`-th delay, except the final
/// attempt, which is never followed by a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySchedule {
    delays: Vec<Duration>,
}

impl RetrySchedule {
    /// Create a schedule; an empty list still allows a single attempt
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// Maximum number of attempts
    pub fn attempts(&self) -> usize {
        self.delays.len().max(1)
    }

    /// Delay to wait after a failed `attempt`, or `None` after the last one
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt == 0 || attempt >= self.attempts() {
            return None;
        }
        self.delays.get(attempt - 1).copied()
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_DELAYS.to_vec())
    }
}

/// How a failed call should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transient infrastructure failure; worth retrying
    Retryable,
    /// Quota exhausted; retrying cannot help
    RateLimit,
    /// Credentials rejected; retrying cannot help
    Auth,
    /// Anything else; stop without retrying
    Unclassified,
}

impl FailureKind {
    /// Classify an error message, fatal patterns first
    pub fn classify(message: &str) -> Self {
        let contains_any = |patterns: &[&str]| patterns.iter().any(|p| message.contains(p));

        if contains_any(RATE_LIMIT_PATTERNS) {
            FailureKind::RateLimit
        } else if contains_any(AUTH_PATTERNS) {
            FailureKind::Auth
        } else if contains_any(RETRYABLE_PATTERNS) {
            FailureKind::Retryable
        } else {
            FailureKind::Unclassified
        }
    }
}

/// One failed attempt of a remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    /// 1-based attempt number
    pub number: usize,
    /// Error text reported by the transport
    pub error: String,
    /// Classification of `error`
    pub kind: FailureKind,
}

impl FetchAttempt {
    /// Record a failed attempt and classify its error
    pub fn failed(number: usize, error: impl Into<String>) -> Self {
        let error = error.into();
        let kind = FailureKind::classify(&error);
        Self {
            number,
            error,
            kind,
        }
    }
}
