//! Single-slot request controller.
//!
//! # Design
//! `RequestController` owns one logical request slot: the current
//! `RequestState`, at most one live transport handle, and at most one
//! listener. All mutation goes through `start`, `cancel`, and the completion
//! callback handed to the transport.
//!
//! Every non-suppressed `start` bumps a generation counter. A completion
//! carries the generation it was issued for and is ignored unless that
//! generation is still current and the slot has not been cancelled, so an
//! aborted or superseded exchange can never overwrite newer state.
//!
//! The slot lives in an `Rc<RefCell<_>>`. No borrow is held while a listener
//! or a transport method runs, so listeners may call back into the
//! controller and transports may complete synchronously.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::error::{FetchError, TransportError};
use crate::http::HttpResponse;
use crate::params::RequestParams;
use crate::response::resolve;
use crate::state::RequestState;
use crate::transport::{Clock, Completion, SystemClock, Transport, TransportHandle};

/// Window in which an identical `start` is treated as a duplicate.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

type Listener = Rc<dyn Fn(&RequestState)>;

struct Slot<H> {
    state: RequestState,
    live: Option<H>,
    generation: u64,
    cancelled: bool,
    last: Option<(RequestParams, Instant)>,
    listener: Option<Listener>,
}

impl<H> Slot<H> {
    fn is_duplicate(&self, params: &RequestParams, now: Instant, debounce: Duration) -> bool {
        if !self.state.is_loading() {
            return false;
        }
        match &self.last {
            Some((last, at)) => now.saturating_duration_since(*at) < debounce && last == params,
            None => false,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && !self.cancelled
    }
}

/// Drives one request at a time through `Idle -> Loading -> terminal`.
pub struct RequestController<T: Transport> {
    slot: Rc<RefCell<Slot<T::Handle>>>,
    transport: T,
    clock: Rc<dyn Clock>,
    debounce: Duration,
}

impl<T: Transport> RequestController<T> {
    pub fn new(transport: T) -> Self {
        Self::with_clock(transport, SystemClock)
    }

    pub fn with_clock(transport: T, clock: impl Clock + 'static) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                state: RequestState::Idle,
                live: None,
                generation: 0,
                cancelled: false,
                last: None,
                listener: None,
            })),
            transport,
            clock: Rc::new(clock),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Current state. Still updated while no listener is subscribed.
    pub fn state(&self) -> RequestState {
        self.slot.borrow().state.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.slot.borrow().state.is_loading()
    }

    /// Replace the listener. Only one is kept.
    pub fn subscribe(&self, listener: impl Fn(&RequestState) + 'static) {
        self.slot.borrow_mut().listener = Some(Rc::new(listener));
    }

    pub fn unsubscribe(&self) {
        self.slot.borrow_mut().listener = None;
    }

    /// Start a request, superseding any in-flight one.
    ///
    /// An identical request started while the previous one is still loading
    /// and within the debounce window is dropped without any notification.
    pub fn start(&self, params: RequestParams) {
        let now = self.clock.now();
        let (generation, superseded) = {
            let mut slot = self.slot.borrow_mut();
            if slot.is_duplicate(&params, now, self.debounce) {
                trace!(method = %params.method, url = %params.url, "suppressing duplicate request");
                return;
            }
            slot.generation += 1;
            slot.cancelled = false;
            slot.last = Some((params.clone(), now));
            (slot.generation, slot.live.take())
        };

        if let Some(mut handle) = superseded {
            debug!(generation, "aborting superseded request");
            handle.abort();
        }

        debug!(generation, method = %params.method, url = %params.url, "starting request");
        let mut handle = match self.transport.open(params.method, &params.url) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(generation, error = %err, "transport refused to open request");
                if self.enter_loading(generation) {
                    settle(&self.slot, generation, RequestState::Error(FetchError::network(&err)));
                }
                return;
            }
        };
        for (name, value) in &params.headers {
            handle.set_header(name, value);
        }

        // A listener may cancel or restart from inside the Loading
        // notification; the handle is not in the slot yet, so abort it here.
        if !self.enter_loading(generation) || !self.slot.borrow().is_current(generation) {
            handle.abort();
            return;
        }

        handle.send(params.body.as_deref(), self.completion(generation));

        let mut slot = self.slot.borrow_mut();
        if slot.is_current(generation) && slot.state.is_loading() {
            slot.live = Some(handle);
        }
    }

    /// Abort the in-flight request. No-op unless loading.
    pub fn cancel(&self) {
        let (handle, listener) = {
            let mut slot = self.slot.borrow_mut();
            if !slot.state.is_loading() {
                return;
            }
            slot.cancelled = true;
            slot.state = RequestState::Cancelled;
            (slot.live.take(), slot.listener.clone())
        };
        debug!("request cancelled");
        if let Some(mut handle) = handle {
            handle.abort();
        }
        notify(listener, &RequestState::Cancelled);
    }

    fn enter_loading(&self, generation: u64) -> bool {
        let listener = {
            let mut slot = self.slot.borrow_mut();
            if !slot.is_current(generation) {
                return false;
            }
            slot.state = RequestState::Loading;
            slot.listener.clone()
        };
        notify(listener, &RequestState::Loading);
        true
    }

    fn completion(&self, generation: u64) -> Completion {
        let slot: Weak<RefCell<Slot<T::Handle>>> = Rc::downgrade(&self.slot);
        Box::new(move |outcome: Result<HttpResponse, TransportError>| {
            let Some(slot) = slot.upgrade() else {
                trace!(generation, "completion after controller teardown");
                return;
            };
            settle(&slot, generation, resolve(outcome));
        })
    }
}

impl<T: Transport> Drop for RequestController<T> {
    fn drop(&mut self) {
        let handle = {
            let mut slot = self.slot.borrow_mut();
            slot.listener = None;
            slot.cancelled = true;
            slot.live.take()
        };
        if let Some(mut handle) = handle {
            debug!("aborting in-flight request on teardown");
            handle.abort();
        }
    }
}

/// Move a loading slot of `generation` into `next` and notify.
fn settle<H>(slot: &RefCell<Slot<H>>, generation: u64, next: RequestState) {
    let listener = {
        let mut slot = slot.borrow_mut();
        if !slot.is_current(generation) || !slot.state.is_loading() {
            trace!(generation, "ignoring stale completion");
            return;
        }
        slot.live = None;
        slot.state = next.clone();
        slot.listener.clone()
    };
    debug!(generation, status = ?next.status(), "request settled");
    notify(listener, &next);
}

fn notify(listener: Option<Listener>, state: &RequestState) {
    if let Some(listener) = listener {
        listener(state);
    }
}
