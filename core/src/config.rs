//! Inputs of a `FetchBinding`.
//!
//! # Design
//! `FetchConfig` is the caller-facing configuration surface. It deserializes
//! from the same camelCase shape a host UI layer would pass
//! (`{"url": ..., "type": "POST", "autoLoad": true}`), with every field
//! except `url` optional. The request-defining part (url, payload, headers,
//! method) is projected into `RequestParams`; comparing those projections is
//! how a binding decides whether its inputs changed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::HttpMethod;
use crate::params::RequestParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchConfig {
    pub url: String,
    /// Request body. Strings are sent as-is, any other value as compact JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, rename = "type")]
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Reload whenever the request-defining inputs change.
    #[serde(default)]
    pub auto_load: bool,
    /// Load once as soon as the binding is mounted.
    #[serde(default)]
    pub call_on_mount: bool,
}

impl FetchConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            payload: None,
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            auto_load: false,
            call_on_mount: false,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn auto_load(mut self, enabled: bool) -> Self {
        self.auto_load = enabled;
        self
    }

    pub fn call_on_mount(mut self, enabled: bool) -> Self {
        self.call_on_mount = enabled;
        self
    }

    /// Parameters for a request issued with the current inputs.
    pub fn params(&self) -> RequestParams {
        RequestParams {
            url: self.url.clone(),
            method: self.method,
            body: self.payload.as_ref().map(|payload| match payload {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            }),
            headers: self.headers.clone(),
        }
    }
}
