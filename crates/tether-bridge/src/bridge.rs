//! Application bootstrap.
//!
//! [`bootstrap`] loads the persisted state, launches the application and
//! attaches handlers to its `focus` and `setStorage` ports.

use crate::dom::{Dom, FocusOutcome, focus_unique};
use crate::error::{BridgeError, Result};
use crate::port::{AppPorts, Port};
use crate::scheduler::Scheduler;
use crate::storage::{DEFAULT_STORAGE_KEY, Storage};
use serde_json::Value;
use std::rc::Rc;
use std::time::Duration;

/// Delay between a focus request and the DOM query, giving the view time
/// to render the target element.
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(50);

/// An application the bridge can attach to.
pub trait Application {
    /// Port carrying CSS selectors of elements to focus.
    fn focus_port(&self) -> &Port<String>;

    /// Port carrying the full state to persist.
    fn storage_port(&self) -> &Port<Value>;
}

impl Application for AppPorts {
    fn focus_port(&self) -> &Port<String> {
        &self.focus
    }

    fn storage_port(&self) -> &Port<Value> {
        &self.set_storage
    }
}

/// Everything the bridge talks to.
#[derive(Debug)]
pub struct BridgeContext<S, D, T> {
    storage: S,
    dom: D,
    scheduler: T,
    storage_key: String,
    focus_delay: Duration,
}

impl<S: Storage, D: Dom, T: Scheduler> BridgeContext<S, D, T> {
    /// Context using the `"model"` key and a 50 ms focus delay.
    pub fn new(storage: S, dom: D, scheduler: T) -> Self {
        Self {
            storage,
            dom,
            scheduler,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            focus_delay: DEFAULT_FOCUS_DELAY,
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_focus_delay(mut self, delay: Duration) -> Self {
        self.focus_delay = delay;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn focus_delay(&self) -> Duration {
        self.focus_delay
    }

    /// Read and parse the persisted state.
    ///
    /// Absent or empty text means no prior state. Text that is not valid
    /// JSON is an error; JSON `null` is returned as `Some(Value::Null)`.
    pub fn load_initial_state(&self) -> Result<Option<Value>> {
        let Some(text) = self.storage.get(&self.storage_key)? else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| BridgeError::MalformedState {
                key: self.storage_key.clone(),
                source,
            })
    }

    /// Overwrite the persisted state with `state`.
    pub fn save_state(&self, state: &Value) -> Result<()> {
        let text = serde_json::to_string(state).map_err(BridgeError::Serialize)?;
        self.storage.set(&self.storage_key, &text)
    }

    /// Run one focus request now.
    pub fn apply_focus(&self, selector: &str) -> Result<FocusOutcome> {
        focus_unique(&self.dom, selector)
    }
}

impl<S, D, T> BridgeContext<S, D, T>
where
    S: Storage + 'static,
    D: Dom + 'static,
    T: Scheduler + 'static,
{
    /// Schedule a focus request after the settle delay.
    ///
    /// Requests are independent: a later request does not cancel an earlier
    /// one, and whichever runs last decides focus.
    pub fn request_focus(self: &Rc<Self>, selector: String) {
        let ctx = Rc::clone(self);
        self.scheduler.schedule(
            self.focus_delay,
            Box::new(move || match ctx.apply_focus(&selector) {
                Ok(outcome) => tracing::trace!(selector = selector.as_str(), ?outcome, "focus request"),
                Err(e) => tracing::warn!(selector = selector.as_str(), error = %e, "focus request failed"),
            }),
        );
    }

    fn persist(&self, state: &Value) {
        if let Err(e) = self.save_state(state) {
            tracing::error!(key = self.storage_key.as_str(), error = %e, "failed to persist state");
        }
    }
}

/// Load persisted state, launch the application and wire its ports.
///
/// `launch` receives the parsed state, or `None` when nothing was stored.
/// Malformed stored state aborts startup before `launch` runs.
///
/// # Errors
///
/// Returns [`BridgeError::MalformedState`] for unparseable stored state,
/// storage read failures, or whatever `launch` returns.
pub fn bootstrap<S, D, T, A, F>(ctx: BridgeContext<S, D, T>, launch: F) -> Result<A>
where
    S: Storage + 'static,
    D: Dom + 'static,
    T: Scheduler + 'static,
    A: Application,
    F: FnOnce(Option<Value>) -> Result<A>,
{
    let initial = ctx.load_initial_state()?;
    tracing::debug!(
        key = ctx.storage_key(),
        restored = initial.is_some(),
        "launching application"
    );
    let app = launch(initial)?;

    let ctx = Rc::new(ctx);

    let focus_ctx = Rc::clone(&ctx);
    app.focus_port()
        .subscribe(move |selector: &String| focus_ctx.request_focus(selector.clone()));

    app.storage_port()
        .subscribe(move |state: &Value| ctx.persist(state));

    Ok(app)
}
