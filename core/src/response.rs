//! Maps a finished exchange onto the terminal `RequestState`.

use serde_json::Value;

use crate::error::{FetchError, TransportError};
use crate::http::HttpResponse;
use crate::state::RequestState;

/// Terminal state for a completed transport exchange.
///
/// - transport failure: `Error` of kind `Network`, status 0
/// - 2xx: `Success` with the parsed body, or a `Parse` error if the body is not JSON
/// - anything else: `Http` error; the body is parsed only when the response
///   declares a JSON content type
pub fn resolve(outcome: Result<HttpResponse, TransportError>) -> RequestState {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => return RequestState::Error(FetchError::network(&err)),
    };

    if response.is_success() {
        return match serde_json::from_str::<Value>(&response.body) {
            Ok(data) => RequestState::Success { data },
            Err(_) => parse_failure(&response),
        };
    }

    let data = if response.declares_json() {
        match serde_json::from_str::<Value>(&response.body) {
            Ok(data) => Some(data),
            Err(_) => return parse_failure(&response),
        }
    } else {
        None
    };

    RequestState::Error(FetchError::http(
        response.status,
        &response.status_text,
        &response.body,
        data,
    ))
}

fn parse_failure(response: &HttpResponse) -> RequestState {
    RequestState::Error(FetchError::parse(
        response.status,
        &response.status_text,
        &response.body,
    ))
}
