//! The capabilities a host injects into the controller.
//!
//! # Design
//! The controller does not perform I/O. A `Transport` opens a request and
//! returns a `TransportHandle`, which owns the exchange until it completes
//! or is aborted. Completion is delivered once, through a boxed callback,
//! on the same thread that drives the controller; the controller is
//! single-threaded and holds no locks.
//!
//! `Clock` exists so the duplicate-suppression window can be driven by a
//! test instead of wall time.

use std::time::Instant;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpResponse};

/// Callback a handle invokes at most once, when the exchange finishes.
/// An aborted exchange may never invoke it.
pub type Completion = Box<dyn FnOnce(Result<HttpResponse, TransportError>)>;

/// Factory for request handles, one per `start`.
pub trait Transport {
    type Handle: TransportHandle + 'static;

    fn open(&self, method: HttpMethod, url: &str) -> Result<Self::Handle, TransportError>;
}

/// A single opened request.
pub trait TransportHandle {
    fn set_header(&mut self, name: &str, value: &str);

    /// Start the exchange. `on_complete` may run later from the host's event
    /// loop, or before `send` returns for transports that fail immediately.
    fn send(&mut self, body: Option<&str>, on_complete: Completion);

    /// Request that the exchange stop. Advisory: a completion may still fire.
    fn abort(&mut self);
}

/// Source of timestamps for duplicate suppression.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock `Clock`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
