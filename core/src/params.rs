//! Request parameters captured for a single attempt.
//!
//! # Design
//! `RequestParams` is a value object: once handed to `start` it is cloned and
//! never mutated. Equality is structural and is exactly the comparison the
//! controller uses to suppress duplicate requests. Headers live in a
//! `BTreeMap`, so two parameter sets that differ only in header insertion
//! order compare equal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;
use crate::http::HttpMethod;

/// Everything needed to open and send one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestParams {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            headers: BTreeMap::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the body and mark it as JSON.
    pub fn with_json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, ParamsError> {
        let body = serde_json::to_string(payload)?;
        Ok(self
            .with_header("Content-Type", "application/json")
            .with_body(body))
    }
}
