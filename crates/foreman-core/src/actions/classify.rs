//! Error classification
//!
//! The platform reports failures as free text. A handful of patterns are
//! enough to tell the user whether to fix their environment or just retry.

use once_cell::sync::Lazy;
use regex::Regex;

/// User-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A tool or service the action depends on is missing or down
    PrerequisiteUnavailable,
    /// The target no longer exists
    NotFound,
    /// The target is in a state that forbids the action
    Conflict,
    /// The deadline passed before the platform answered
    Timeout,
    Generic,
}

impl ErrorCategory {
    /// Actionable hint shown next to the failure
    pub fn hint(&self) -> &'static str {
        match self {
            Self::PrerequisiteUnavailable => "check that the fleet CLI and its dependencies are installed and running",
            Self::NotFound => "the target may have been removed; refresh with r",
            Self::Conflict => "the target changed state; refresh and try again",
            Self::Timeout => "the operation may still be running; refresh to check",
            Self::Generic => "see the log for details",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PrerequisiteUnavailable => "prerequisite unavailable",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::Timeout => "timed out",
            Self::Generic => "failed",
        }
    }
}

/// Ordered: the first matching pattern wins
static PATTERNS: Lazy<Vec<(Regex, ErrorCategory)>> = Lazy::new(|| {
    [
        (
            r"(?i)(timed out|deadline exceeded|timeout)",
            ErrorCategory::Timeout,
        ),
        (
            r"(?i)(command not found|executable file not found|no such file or directory|not installed|is not running|connection refused|tmux|daemon (is )?(down|unavailable))",
            ErrorCategory::PrerequisiteUnavailable,
        ),
        (
            r"(?i)(already (exists|running|stopped)|conflict|locked|in use)",
            ErrorCategory::Conflict,
        ),
        (
            r"(?i)(not found|unknown (worker|project|rig|item)|does not exist|no such)",
            ErrorCategory::NotFound,
        ),
    ]
    .into_iter()
    .map(|(pattern, category)| (Regex::new(pattern).expect("valid regex"), category))
    .collect()
});

/// Classify a human-readable failure message
pub fn classify_error(message: &str) -> ErrorCategory {
    PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(message))
        .map(|(_, category)| *category)
        .unwrap_or(ErrorCategory::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerequisite_messages() {
        assert_eq!(
            classify_error("exec: \"tmux\": executable file not found in $PATH"),
            ErrorCategory::PrerequisiteUnavailable
        );
        assert_eq!(
            classify_error("fleet: command not found"),
            ErrorCategory::PrerequisiteUnavailable
        );
        assert_eq!(
            classify_error("dial unix /tmp/fleet.sock: connection refused"),
            ErrorCategory::PrerequisiteUnavailable
        );
    }

    #[test]
    fn test_other_categories() {
        assert_eq!(
            classify_error("worker api/w9 not found"),
            ErrorCategory::NotFound
        );
        assert_eq!(
            classify_error("worker already running"),
            ErrorCategory::Conflict
        );
        assert_eq!(
            classify_error("action timed out after 30s"),
            ErrorCategory::Timeout
        );
        assert_eq!(classify_error("exit status 1"), ErrorCategory::Generic);
    }

    #[test]
    fn test_every_category_has_a_hint() {
        for category in [
            ErrorCategory::PrerequisiteUnavailable,
            ErrorCategory::NotFound,
            ErrorCategory::Conflict,
            ErrorCategory::Timeout,
            ErrorCategory::Generic,
        ] {
            assert!(!category.hint().is_empty());
        }
    }
}
