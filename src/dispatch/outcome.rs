//! Completed request outcomes.

/// Longest body kept in an outcome, in bytes.
pub const MAX_BODY_EXCERPT: usize = 4096;

/// Whether a request counts as a success for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Failure,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::Failure => "failure",
        }
    }
}

/// Result of one dispatched request. Never handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub uri: String,
    pub status: OutcomeStatus,
    /// Only set on the HTTP client path.
    pub status_code: Option<u16>,
    /// Only set on the HTTP client path.
    pub body_excerpt: Option<String>,
    /// `body_excerpt` holds less than the full response body.
    pub truncated: bool,
    /// The body is an HTML page rather than an application payload.
    pub is_html: bool,
}

impl RequestOutcome {
    /// Classify an HTTP response: success means status 200 and a body that
    /// is not an HTML document.
    pub fn from_response(uri: &str, status_code: u16, body: &str) -> Self {
        let is_html = is_html_document(body);
        let status = if status_code == 200 && !is_html {
            OutcomeStatus::Success
        } else {
            OutcomeStatus::Failure
        };

        let kept = excerpt(body, MAX_BODY_EXCERPT);
        Self {
            uri: uri.to_string(),
            status,
            status_code: Some(status_code),
            body_excerpt: Some(kept.to_string()),
            truncated: kept.len() < body.len(),
            is_html,
        }
    }

    /// Outcome of a raw socket write, which has no response.
    pub fn sent(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            status: OutcomeStatus::Success,
            status_code: None,
            body_excerpt: None,
            truncated: false,
            is_html: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Detects an HTML doctype marker at the start of a body.
pub fn is_html_document(body: &str) -> bool {
    let trimmed = body.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    trimmed
        .get(..9)
        .map(|head| head.eq_ignore_ascii_case("<!doctype"))
        .unwrap_or(false)
}

/// Longest prefix of `s` no longer than `max` bytes, cut on a char boundary.
fn excerpt(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
