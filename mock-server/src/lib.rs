use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Upper bound for `/slow` so a typo cannot hang a test run.
const MAX_DELAY_MS: u64 = 10_000;

/// Body returned by `/echo`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub body: String,
    /// Only `x-*` request headers, lower-cased.
    pub headers: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct SlowQuery {
    #[serde(default)]
    pub ms: u64,
}

/// Request counts per path.
pub type Hits = Arc<RwLock<HashMap<String, u64>>>;

pub fn app() -> Router {
    let hits: Hits = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/ok", get(ok))
        .route("/malformed", get(malformed))
        .route("/missing", get(missing))
        .route("/plain-error", get(plain_error))
        .route("/slow", get(slow))
        .route("/echo", post(echo).put(echo).delete(echo))
        .route("/hits", get(list_hits))
        .layer(middleware::from_fn_with_state(hits.clone(), track))
        .with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn track(State(hits): State<Hits>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if path != "/hits" {
        *hits.write().await.entry(path.clone()).or_default() += 1;
    }
    let request_id = Uuid::new_v4();
    debug!(%request_id, method = %request.method(), %path, "request");

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

async fn ok() -> Json<Value> {
    Json(json!({"v": 1}))
}

async fn malformed() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{\"v\": 1")
}

async fn missing() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"reason": "missing"})))
}

async fn plain_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn slow(Query(query): Query<SlowQuery>) -> Json<Value> {
    let ms = query.ms.min(MAX_DELAY_MS);
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(json!({"slow": true, "ms": ms}))
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter(|(name, _)| name.as_str().starts_with("x-"))
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        body,
        headers,
    })
}

async fn list_hits(State(hits): State<Hits>) -> Json<HashMap<String, u64>> {
    Json(hits.read().await.clone())
}
