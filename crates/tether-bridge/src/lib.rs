//! Bootstrap bridge between a compiled front-end application and the
//! browser capabilities it cannot reach on its own.
//!
//! At startup the bridge reads the persisted state blob, launches the
//! application with it, then listens on two outbound ports:
//!
//! - `focus(selector)`: after a short settle delay, focus the single element
//!   matching `selector` unless it already has focus
//! - `setStorage(state)`: overwrite the persisted state with `state`
//!
//! Storage, DOM and timers are reached through the [`Storage`], [`Dom`] and
//! [`Scheduler`] traits, so the core runs (and is tested) without a browser.
//! On `wasm32` the [`web`] module binds them to `localStorage`, `document`
//! and `setTimeout`.
//!
//! ```
//! use serde_json::json;
//! use std::time::Duration;
//! use tether_bridge::{
//!     AppPorts, BridgeContext, ManualScheduler, MemoryStorage, NoDom, bootstrap,
//! };
//!
//! let storage = MemoryStorage::new();
//! storage.insert("model", r#"{"count":3}"#);
//!
//! let ctx = BridgeContext::new(storage.clone(), NoDom, ManualScheduler::new());
//! let app = bootstrap(ctx, |initial| {
//!     assert_eq!(initial, Some(json!({"count": 3})));
//!     Ok(AppPorts::new())
//! })?;
//!
//! app.set_storage.send(json!({"count": 4}));
//! assert_eq!(storage.get_raw("model").as_deref(), Some(r#"{"count":4}"#));
//! # Ok::<(), tether_bridge::BridgeError>(())
//! ```

pub mod bridge;
pub mod dom;
pub mod error;
pub mod port;
pub mod scheduler;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bridge::{Application, BridgeContext, DEFAULT_FOCUS_DELAY, bootstrap};
pub use dom::{Dom, FocusOutcome, NoDom, focus_unique};
pub use error::{BridgeError, Result};
pub use port::{AppPorts, Port};
pub use scheduler::{ManualScheduler, Scheduler, Task};
pub use storage::{DEFAULT_STORAGE_KEY, MemoryStorage, Storage};
