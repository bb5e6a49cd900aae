//! In-memory transport and clock for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpResponse};
use crate::state::RequestState;
use crate::transport::{Clock, Completion, Transport, TransportHandle};

/// What the scripted transport saw for one opened request.
#[derive(Debug, Clone, Default)]
pub(crate) struct Exchange {
    pub method: Option<HttpMethod>,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub sent: bool,
    pub aborted: bool,
}

#[derive(Default)]
struct Script {
    exchanges: Vec<Exchange>,
    completions: Vec<Option<Completion>>,
    fail_open: Option<TransportError>,
    respond_immediately: Option<HttpResponse>,
    complete_on_abort: bool,
}

/// Transport whose completions are fired by the test.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later `open` fails with `err`.
    pub fn fail_open(&self, err: TransportError) {
        self.script.borrow_mut().fail_open = Some(err);
    }

    /// Deliver `response` from inside `send`, before it returns.
    pub fn respond_immediately(&self, response: HttpResponse) {
        self.script.borrow_mut().respond_immediately = Some(response);
    }

    /// Fire an `Aborted` completion from inside `abort`, the way a browser
    /// request does.
    pub fn complete_on_abort(&self) {
        self.script.borrow_mut().complete_on_abort = true;
    }

    pub fn opened(&self) -> usize {
        self.script.borrow().exchanges.len()
    }

    pub fn exchange(&self, index: usize) -> Exchange {
        self.script.borrow().exchanges[index].clone()
    }

    /// Fire the completion of request `index`; panics if it already fired.
    pub fn complete(&self, index: usize, outcome: Result<HttpResponse, TransportError>) {
        let completion = self.script.borrow_mut().completions[index]
            .take()
            .expect("completion already delivered");
        completion(outcome);
    }

    pub fn complete_last(&self, outcome: Result<HttpResponse, TransportError>) {
        let last = self.opened() - 1;
        self.complete(last, outcome);
    }
}

pub(crate) struct ScriptedHandle {
    index: usize,
    script: Rc<RefCell<Script>>,
}

impl Transport for ScriptedTransport {
    type Handle = ScriptedHandle;

    fn open(&self, method: HttpMethod, url: &str) -> Result<ScriptedHandle, TransportError> {
        let mut script = self.script.borrow_mut();
        if let Some(err) = script.fail_open.clone() {
            return Err(err);
        }
        script.exchanges.push(Exchange {
            method: Some(method),
            url: url.to_string(),
            ..Exchange::default()
        });
        script.completions.push(None);
        Ok(ScriptedHandle {
            index: script.exchanges.len() - 1,
            script: Rc::clone(&self.script),
        })
    }
}

impl TransportHandle for ScriptedHandle {
    fn set_header(&mut self, name: &str, value: &str) {
        self.script.borrow_mut().exchanges[self.index]
            .headers
            .push((name.to_string(), value.to_string()));
    }

    fn send(&mut self, body: Option<&str>, on_complete: Completion) {
        let immediate = {
            let mut script = self.script.borrow_mut();
            let exchange = &mut script.exchanges[self.index];
            exchange.body = body.map(str::to_string);
            exchange.sent = true;
            script.respond_immediately.clone()
        };
        match immediate {
            Some(response) => on_complete(Ok(response)),
            None => self.script.borrow_mut().completions[self.index] = Some(on_complete),
        }
    }

    fn abort(&mut self) {
        let completion = {
            let mut script = self.script.borrow_mut();
            script.exchanges[self.index].aborted = true;
            if script.complete_on_abort {
                script.completions[self.index].take()
            } else {
                None
            }
        };
        if let Some(completion) = completion {
            completion(Err(TransportError::Aborted));
        }
    }
}

/// Clock advanced by hand.
#[derive(Clone)]
pub(crate) struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Shared list of every state a listener observed.
pub(crate) type Seen = Rc<RefCell<Vec<RequestState>>>;

pub(crate) fn recorder() -> (Seen, impl Fn(&RequestState) + 'static) {
    let seen: Seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |state: &RequestState| sink.borrow_mut().push(state.clone()))
}

pub(crate) fn ok_json(body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(200, "OK", body).with_header("Content-Type", "application/json"))
}
