// src/tag/diagnostics.rs
// =============================================================================
// Human readable text for everything that can go wrong.
//
// These strings end up *inside the generated page* in place of the README or
// wiki content, so they are written for a site visitor (or the site author
// previewing a build), not for a log file.
// =============================================================================

use chrono::{DateTime, Utc};

use crate::error::ParamError;
use crate::github::{describe_wait, FetchFailure, FetchRequest, RateLimit};

// "the README of octo/demo" / "wiki page \"Home\" of octo/demo"
fn subject(req: &FetchRequest) -> String {
    match &req.page {
        Some(page) => format!("wiki page \"{}\" of {}", page, req.slug()),
        None => format!("the README of {}", req.slug()),
    }
}

// Formats a diagnostic for a failed fetch.
//
// `now` is only used for the rate-limit reset distance.
pub fn describe(req: &FetchRequest, failure: &FetchFailure, now: DateTime<Utc>) -> String {
    match failure {
        FetchFailure::NotFound => match &req.page {
            Some(page) => format!("Wiki page \"{}\" not found for {}.", page, req.slug()),
            None => format!("README not found for {} (ref {}).", req.slug(), req.git_ref),
        },
        FetchFailure::RateLimited(limit) => format!(
            "Could not load {}: {}, {}.",
            subject(req),
            quota_text(limit),
            reset_text(limit, now)
        ),
        FetchFailure::Transient(message) => {
            format!("Could not load {}: {}.", subject(req), message)
        }
        FetchFailure::Timeout => format!(
            "Could not load {}: GitHub did not answer before the timeout.",
            subject(req)
        ),
    }
}

pub fn invalid_params(tag: &str, error: &ParamError) -> String {
    format!("Invalid {} parameters: {}.", tag, error)
}

fn quota_text(limit: &RateLimit) -> String {
    match limit.limit {
        Some(n) => format!("GitHub API rate limit of {} requests per hour exhausted", n),
        None => "GitHub API rate limit exhausted".to_string(),
    }
}

fn reset_text(limit: &RateLimit, now: DateTime<Utc>) -> String {
    match limit.wait_from(now) {
        Some(wait) => format!("try again in about {}", describe_wait(wait)),
        None => "try again later".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn readme() -> FetchRequest {
        FetchRequest::parse_readme("octo, demo").unwrap()
    }

    #[test]
    fn test_not_found_mentions_owner_and_repo() {
        let msg = describe(&readme(), &FetchFailure::NotFound, now());
        assert!(msg.contains("octo"));
        assert!(msg.contains("demo"));
        assert_eq!(msg, "README not found for octo/demo (ref main).");
    }

    #[test]
    fn test_wiki_not_found_mentions_page() {
        let req = FetchRequest::parse_wiki("octo, demo, Setup").unwrap();
        let msg = describe(&req, &FetchFailure::NotFound, now());
        assert_eq!(msg, "Wiki page \"Setup\" not found for octo/demo.");
    }

    #[test]
    fn test_rate_limited_mentions_wait_and_limit() {
        let limit = RateLimit {
            remaining: 0,
            limit: Some(60),
            reset_at: Some(now() + TimeDelta::minutes(5)),
        };
        let msg = describe(&readme(), &FetchFailure::RateLimited(limit), now());

        assert!(msg.contains("5 minutes"), "{}", msg);
        assert!(msg.contains("60"), "{}", msg);
    }

    #[test]
    fn test_rate_limited_in_hours() {
        let limit = RateLimit {
            remaining: 0,
            limit: Some(5000),
            reset_at: Some(now() + TimeDelta::minutes(130)),
        };
        let msg = describe(&readme(), &FetchFailure::RateLimited(limit), now());
        assert!(msg.contains("about 2 hours"), "{}", msg);
    }

    #[test]
    fn test_rate_limited_without_headers() {
        let limit = RateLimit {
            remaining: 0,
            limit: None,
            reset_at: None,
        };
        let msg = describe(&readme(), &FetchFailure::RateLimited(limit), now());
        assert_eq!(
            msg,
            "Could not load the README of octo/demo: GitHub API rate limit exhausted, try again later."
        );
    }

    #[test]
    fn test_transient_carries_message() {
        let failure = FetchFailure::Transient("HTTP 502 Bad Gateway".to_string());
        let msg = describe(&readme(), &failure, now());
        assert!(msg.contains("HTTP 502 Bad Gateway"));
    }

    #[test]
    fn test_timeout() {
        let msg = describe(&readme(), &FetchFailure::Timeout, now());
        assert!(msg.contains("timeout"));
    }
}
