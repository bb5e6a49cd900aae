//! Consumer-side adapter that ties one controller to one usage site.
//!
//! # Design
//! A `FetchBinding` is the scoped-resource version of a UI fetch hook. It is
//! created with its inputs, later mounted onto a controller, and torn down
//! on `unmount` or drop. While mounted it is the controller's only listener
//! and mirrors the latest state, so a host can read `is_loading()`, `data()`
//! and friends at any time and re-render from the `on_change` callback.
//!
//! Loads requested before mount are deferred and issued right after the
//! binding subscribes.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::FetchConfig;
use crate::controller::RequestController;
use crate::error::FetchError;
use crate::state::{RequestState, RequestStatus};
use crate::transport::Transport;

type ChangeHook = Rc<dyn Fn(&RequestState)>;

#[derive(Default)]
struct Mirror {
    state: RefCell<RequestState>,
    on_change: RefCell<Option<ChangeHook>>,
}

pub struct FetchBinding<T: Transport> {
    config: FetchConfig,
    controller: Option<RequestController<T>>,
    mirror: Rc<Mirror>,
    pending_load: bool,
}

impl<T: Transport> FetchBinding<T> {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config,
            controller: None,
            mirror: Rc::new(Mirror::default()),
            pending_load: false,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.controller.is_some()
    }

    /// Host hook run after every state change the binding observes.
    pub fn on_change(&self, hook: impl Fn(&RequestState) + 'static) {
        *self.mirror.on_change.borrow_mut() = Some(Rc::new(hook));
    }

    /// Take ownership of `controller` and subscribe to it.
    ///
    /// Mounting an already mounted binding tears the previous controller
    /// down first.
    pub fn mount(&mut self, controller: RequestController<T>) {
        self.unmount();

        *self.mirror.state.borrow_mut() = controller.state();
        let mirror = Rc::clone(&self.mirror);
        controller.subscribe(move |state| {
            *mirror.state.borrow_mut() = state.clone();
            let hook = mirror.on_change.borrow().clone();
            if let Some(hook) = hook {
                hook(state);
            }
        });
        self.controller = Some(controller);
        debug!(url = %self.config.url, "binding mounted");

        if self.config.call_on_mount || self.pending_load {
            self.pending_load = false;
            self.load();
        }
    }

    /// Unsubscribe, cancel any in-flight request and release the controller.
    pub fn unmount(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.unsubscribe();
            controller.cancel();
            *self.mirror.state.borrow_mut() = controller.state();
            debug!(url = %self.config.url, "binding unmounted");
        }
    }

    /// Issue a request with the current inputs, or defer it until mount.
    ///
    /// An in-flight request is superseded by the controller rather than
    /// cancelled, so identical loads within the debounce window collapse
    /// into one.
    pub fn load(&mut self) {
        match &self.controller {
            Some(controller) => controller.start(self.config.params()),
            None => self.pending_load = true,
        }
    }

    pub fn cancel(&self) {
        if let Some(controller) = &self.controller {
            if self.is_loading() {
                controller.cancel();
            }
        }
    }

    /// Replace the inputs. With `auto_load`, a change to url, payload,
    /// headers or method cancels the current request and loads again.
    pub fn set_config(&mut self, config: FetchConfig) {
        let changed = self.config.params() != config.params();
        self.config = config;
        if changed && self.config.auto_load && self.is_mounted() {
            debug!(url = %self.config.url, "inputs changed, reloading");
            self.cancel();
            self.load();
        }
    }

    pub fn state(&self) -> RequestState {
        self.mirror.state.borrow().clone()
    }

    pub fn status(&self) -> RequestStatus {
        self.mirror.state.borrow().status()
    }

    pub fn is_loading(&self) -> bool {
        self.mirror.state.borrow().is_loading()
    }

    pub fn is_success(&self) -> bool {
        self.mirror.state.borrow().is_success()
    }

    pub fn is_error(&self) -> bool {
        self.mirror.state.borrow().is_error()
    }

    pub fn is_cancelled(&self) -> bool {
        self.mirror.state.borrow().is_cancelled()
    }

    pub fn data(&self) -> Option<Value> {
        self.mirror.state.borrow().data().cloned()
    }

    /// Decode the success payload into `D`; `Ok(None)` when not successful.
    pub fn data_as<D: DeserializeOwned>(&self) -> Result<Option<D>, serde_json::Error> {
        self.data().map(serde_json::from_value).transpose()
    }

    pub fn error(&self) -> Option<FetchError> {
        self.mirror.state.borrow().error().cloned()
    }
}

impl<T: Transport> Drop for FetchBinding<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
