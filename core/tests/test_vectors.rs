//! Verify completion resolution against JSON test vectors in `test-vectors/`.
//!
//! Each case describes a simulated transport outcome and the terminal state
//! it must resolve to. Expected payloads are compared as parsed JSON values,
//! so key order in the vector files does not matter.

use fetch_core::{resolve, HttpResponse, RequestState, RequestStatus, TransportError};
use serde_json::Value;

fn outcome(case: &Value) -> Result<HttpResponse, TransportError> {
    if let Some(message) = case.get("transport_error") {
        return Err(TransportError::Network(message.as_str().unwrap().to_string()));
    }
    let sim = &case["response"];
    let headers = sim["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let pair = h.as_array().unwrap();
            (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
        })
        .collect();
    Ok(HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        status_text: sim["status_text"].as_str().unwrap().to_string(),
        headers,
        body: sim["body"].as_str().unwrap().to_string(),
    })
}

#[test]
fn resolve_test_vectors() {
    let raw = include_str!("../../test-vectors/resolve.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected"];
        let state = resolve(outcome(case));

        let status = serde_json::to_value(state.status()).unwrap();
        assert_eq!(status, expected["status"], "{name}: status");

        match &state {
            RequestState::Success { data } => {
                assert_eq!(data, &expected["data"], "{name}: data");
            }
            RequestState::Error(err) => {
                let kind = serde_json::to_value(err.kind).unwrap();
                assert_eq!(kind, expected["kind"], "{name}: kind");
                assert_eq!(u64::from(err.status), expected["code"].as_u64().unwrap(), "{name}: code");
                assert_eq!(err.message, expected["message"].as_str().unwrap(), "{name}: message");
                let data = err.data.clone().unwrap_or(Value::Null);
                assert_eq!(data, expected["data"], "{name}: error data");
            }
            other => panic!("{name}: unexpected state {other:?}"),
        }
    }
}

#[test]
fn vectors_cover_every_terminal_outcome() {
    let raw = include_str!("../../test-vectors/resolve.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let statuses: Vec<RequestStatus> = vectors["cases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|case| resolve(outcome(case)).status())
        .collect();
    assert!(statuses.contains(&RequestStatus::Success));
    assert!(statuses.contains(&RequestStatus::Error));
    assert!(!statuses.contains(&RequestStatus::Loading));
}
