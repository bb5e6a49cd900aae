//! Single-request lifecycle controller for client-side HTTP fetching.
//!
//! # Overview
//! `RequestController` issues one request at a time through a host-supplied
//! `Transport`, tracks it through `Idle -> Loading -> Success | Error |
//! Cancelled`, suppresses rapid identical restarts, and reports every
//! transition to a single subscribed listener. `FetchBinding` sits on top as
//! the consumer-side adapter: one controller per usage site, optional load on
//! mount, reload on input change, clean teardown.
//!
//! # Design
//! - The core performs no I/O. Transports open, send and abort; the
//!   controller only decides state.
//! - Single-threaded: state lives behind `Rc<RefCell<_>>`, completions arrive
//!   on the thread that drives the controller.
//! - Failures never escape `start` or `cancel`; they surface as
//!   `RequestState::Error`.
//! - A generation counter makes completions of cancelled or superseded
//!   requests inert.

pub mod binding;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod params;
pub mod response;
pub mod state;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use binding::FetchBinding;
pub use config::FetchConfig;
pub use controller::{RequestController, DEFAULT_DEBOUNCE};
pub use error::{FetchError, FetchErrorKind, ParamsError, TransportError};
pub use http::{HttpMethod, HttpResponse};
pub use params::RequestParams;
pub use response::resolve;
pub use state::{RequestState, RequestStatus, Snapshot};
pub use transport::{Clock, Completion, SystemClock, Transport, TransportHandle};
