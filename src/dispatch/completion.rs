//! Completion handling for the HTTP client path.
//!
//! Runs once per completed request and turns the outcome into sink entries:
//! - success → one debug entry with the response body
//!   (bodies cut to the excerpt limit end with a truncation marker)
//! - failure → one error entry, then one debug entry with either the caught
//!   body or a note that the response was an HTML page

use crate::dispatch::outcome::RequestOutcome;
use crate::observability::LogSink;

/// Controller/action pair of the code that issued the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    pub controller: String,
    pub action: String,
}

impl RouteContext {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }
}

/// Write the sink entries for a completed request.
pub fn log_completion(sink: &dyn LogSink, outcome: &RequestOutcome, ctx: Option<&RouteContext>) {
    let mut body = outcome.body_excerpt.clone().unwrap_or_default();
    if outcome.truncated {
        body.push_str(" ... (truncated)");
    }

    if outcome.is_success() {
        sink.debug(&format!("Uri: {}, response: {}", outcome.uri, body));
        return;
    }

    let code = outcome
        .status_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string());

    match ctx {
        Some(ctx) => sink.error(&format!(
            "Error on request ({}) [status {}]: {} -> {}",
            outcome.uri, code, ctx.controller, ctx.action
        )),
        None => sink.error(&format!(
            "An error occurred on request, uri: {} [status {}]",
            outcome.uri, code
        )),
    }

    if outcome.is_html {
        sink.debug("NOTE: above response is an HTML page (likely a redirect or error page), check the route and its redirections");
    } else {
        sink.debug(&format!("Caught response: {}", body));
    }
}
