//! Request lifecycle state.
//!
//! # Design
//! `RequestState` is the single source of truth. The boolean projections
//! (`is_loading`, `is_success`, ...) are computed from the variant on every
//! call and never stored, so they cannot drift from the tag. `Snapshot` is a
//! flattened, serializable view for hosts that forward state as JSON.

use serde::Serialize;
use serde_json::Value;

use crate::error::FetchError;

/// Tag of a `RequestState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Idle,
    Loading,
    Success,
    Error,
    Cancelled,
}

/// Lifecycle of the controller's single request slot.
///
/// `Idle -> Loading -> {Success | Error | Cancelled}`; any terminal state is
/// replaced wholesale by the next `start`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    /// No request has been started yet.
    #[default]
    Idle,
    /// A request is in flight. The transport handle stays with the controller.
    Loading,
    /// The response was 2xx and its body parsed as JSON.
    Success { data: Value },
    Error(FetchError),
    /// The in-flight request was cancelled. Not an error.
    Cancelled,
}

impl RequestState {
    pub fn status(&self) -> RequestStatus {
        match self {
            RequestState::Idle => RequestStatus::Idle,
            RequestState::Loading => RequestStatus::Loading,
            RequestState::Success { .. } => RequestStatus::Success,
            RequestState::Error(_) => RequestStatus::Error,
            RequestState::Cancelled => RequestStatus::Cancelled,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestState::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RequestState::Error(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RequestState::Cancelled)
    }

    /// Whether no further transition happens without a new `start`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestState::Success { .. } | RequestState::Error(_) | RequestState::Cancelled
        )
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            RequestState::Success { data } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            RequestState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status(),
            data: self.data().cloned(),
            error: self.error().cloned(),
            is_loading: self.is_loading(),
            is_success: self.is_success(),
            is_error: self.is_error(),
            is_cancelled: self.is_cancelled(),
        }
    }
}

/// Serializable view of a `RequestState`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub status: RequestStatus,
    pub data: Option<Value>,
    pub error: Option<FetchError>,
    pub is_loading: bool,
    pub is_success: bool,
    pub is_error: bool,
    pub is_cancelled: bool,
}
