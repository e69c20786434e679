//! Bounded polling and response matching
//!
//! The bots answer asynchronously, so every check runs on a fixed
//! one-second interval with a bounded attempt budget instead of a
//! single read.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use regex::Regex;

use crate::common::Result;

/// Delay between polling attempts
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Attempt budget used unless a caller asks for another one
pub const DEFAULT_ATTEMPTS: u32 = 30;

/// What an observed text must look like
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The whole text, byte for byte
    Exact(String),
    /// A regex that must match at the start of the text
    Pattern(Regex),
}

impl Matcher {
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Exact(expected) => text == expected,
            // Anchored at the start only; the tail may be anything
            Self::Pattern(re) => re.find(text).map_or(false, |m| m.start() == 0),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(expected) => write!(f, "'{}'", expected),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Retry an async probe until it reports true or the budget runs out
///
/// Returns whether the probe ever matched; probe errors abort immediately.
pub async fn poll_until<F, Fut>(attempts: u32, mut probe: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    for attempt in 0..attempts {
        if probe().await? {
            return Ok(true);
        }
        if attempt + 1 < attempts {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use std::cell::Cell;

    #[test]
    fn test_exact_matcher() {
        let matcher = Matcher::exact("Saving john's birthday.");
        assert!(matcher.matches("Saving john's birthday."));
        assert!(!matcher.matches("Saving john's birthday. "));
        assert!(!matcher.matches("saving john's birthday."));
    }

    #[test]
    fn test_pattern_matcher_is_anchored_at_start() {
        let matcher = Matcher::pattern(r"https?://\S+").unwrap();
        assert!(matcher.matches("https://i.imgur.com/abc.jpg"));
        assert!(matcher.matches("http://example.com plus a caption"));
        assert!(!matcher.matches("look at https://example.com"));
    }

    #[test]
    fn test_matcher_display() {
        assert_eq!(Matcher::exact("hi").to_string(), "'hi'");
        assert_eq!(Matcher::pattern("ab+").unwrap().to_string(), "/ab+/");
    }

    #[tokio::test]
    async fn test_poll_until_first_try() {
        let calls = Cell::new(0u32);
        let hit = poll_until(5, || async {
            calls.set(calls.get() + 1);
            Ok(true)
        })
        .await
        .unwrap();
        assert!(hit);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_poll_until_exhausts_budget_without_sleeping_after_last() {
        let calls = Cell::new(0u32);
        let hit = poll_until(1, || async {
            calls.set(calls.get() + 1);
            Ok(false)
        })
        .await
        .unwrap();
        assert!(!hit);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_poll_until_propagates_probe_errors() {
        let result: Result<bool> = poll_until(3, || async {
            Err(Error::Config("probe broke".to_string()))
        })
        .await;
        assert!(result.is_err());
    }
}
