//! Browser backend: `localStorage`, `document` and `setTimeout`.
//!
//! JavaScript entry point:
//!
//! ```js
//! import init, { start } from './tether_bridge.js';
//! await init();
//! const app = start(Elm.Main);
//! ```

use crate::bridge::{BridgeContext, bootstrap};
use crate::dom::Dom;
use crate::error::{BridgeError, Result};
use crate::port::AppPorts;
use crate::scheduler::{Scheduler, Task};
use crate::storage::Storage;
use js_sys::{Function, JSON, Reflect};
use serde_json::Value;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

/// Readable message for a thrown JavaScript value.
fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| BridgeError::Dom("no global window".to_string()))
}

/// `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self> {
        let inner = window()?
            .local_storage()
            .map_err(|e| BridgeError::StorageUnavailable(js_message(&e)))?
            .ok_or_else(|| BridgeError::StorageUnavailable("localStorage is disabled".to_string()))?;
        Ok(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner
            .get_item(key)
            .map_err(|e| BridgeError::StorageRead {
                key: key.to_string(),
                message: js_message(&e),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| BridgeError::storage_write(key, js_message(&e)))
    }
}

/// `window.document`.
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new() -> Result<Self> {
        let document = window()?
            .document()
            .ok_or_else(|| BridgeError::Dom("window has no document".to_string()))?;
        Ok(Self { document })
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>> {
        let list = self
            .document
            .query_selector_all(selector)
            .map_err(|e| BridgeError::InvalidSelector {
                selector: selector.to_string(),
                message: js_message(&e),
            })?;

        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&self, node: &Element) -> Result<()> {
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| BridgeError::Dom(format!("<{}> cannot take focus", node.tag_name())))?;
        element.focus().map_err(|e| BridgeError::Dom(js_message(&e)))
    }
}

/// `window.setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let callback = Closure::once_into_js(move || task());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        let scheduled = window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref::<Function>(),
                millis,
            )
            .map_err(|e| BridgeError::Dom(js_message(&e)))
        });
        if let Err(e) = scheduled {
            tracing::warn!(error = %e, "failed to schedule task");
        }
    }
}

/// A launched JavaScript application whose ports forward into Rust.
struct JsApplication {
    instance: JsValue,
    ports: AppPorts,
}

impl crate::bridge::Application for JsApplication {
    fn focus_port(&self) -> &crate::port::Port<String> {
        &self.ports.focus
    }

    fn storage_port(&self) -> &crate::port::Port<Value> {
        &self.ports.set_storage
    }
}

impl JsApplication {
    /// Call `main.fullscreen(flags)` and subscribe to its ports.
    fn launch(main: &JsValue, initial: Option<Value>) -> Result<Self> {
        let flags = match initial {
            Some(state) => JSON::parse(&state.to_string())
                .map_err(|e| BridgeError::Launch(js_message(&e)))?,
            None => JsValue::NULL,
        };

        let fullscreen = method(main, "fullscreen")?;
        let instance = fullscreen
            .call1(main, &flags)
            .map_err(|e| BridgeError::Launch(js_message(&e)))?;

        let ports = AppPorts::new();
        let js_ports = Reflect::get(&instance, &JsValue::from_str("ports"))
            .map_err(|e| BridgeError::Launch(js_message(&e)))?;

        let focus = ports.focus.clone();
        subscribe(&js_ports, "focus", move |value| match value.as_string() {
            Some(selector) => focus.send(selector),
            None => tracing::warn!("focus port sent a non-string selector"),
        })?;

        let set_storage = ports.set_storage.clone();
        subscribe(&js_ports, "setStorage", move |value| {
            match to_json("setStorage", &value) {
                Ok(state) => set_storage.send(state),
                Err(e) => tracing::error!(error = %e, "dropping setStorage value"),
            }
        })?;

        Ok(Self { instance, ports })
    }
}

fn method(target: &JsValue, name: &str) -> Result<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| BridgeError::Launch(js_message(&e)))?
        .dyn_into::<Function>()
        .map_err(|_| BridgeError::Launch(format!("'{}' is not a function", name)))
}

/// `ports[name].subscribe(handler)`. The handler lives for the page.
fn subscribe(ports: &JsValue, name: &str, handler: impl FnMut(JsValue) + 'static) -> Result<()> {
    let port = Reflect::get(ports, &JsValue::from_str(name))
        .map_err(|e| BridgeError::Launch(js_message(&e)))?;
    if port.is_undefined() {
        return Err(BridgeError::Launch(format!("application has no '{}' port", name)));
    }

    let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
    method(&port, "subscribe")?
        .call1(&port, closure.as_ref())
        .map_err(|e| BridgeError::Launch(js_message(&e)))?;
    closure.forget();
    Ok(())
}

fn to_json(port: &'static str, value: &JsValue) -> Result<Value> {
    let text = JSON::stringify(value)
        .map_err(|e| BridgeError::Launch(js_message(&e)))?
        .as_string()
        // JSON.stringify(undefined) is undefined
        .unwrap_or_else(|| "null".to_string());
    serde_json::from_str(&text).map_err(|source| BridgeError::PortValue { port, source })
}

/// Launch `main` with the state stored under `"model"` and wire its
/// `focus` and `setStorage` ports. Returns the application instance.
#[wasm_bindgen]
pub fn start(main: JsValue) -> std::result::Result<JsValue, JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let run = || -> Result<JsValue> {
        let ctx = BridgeContext::new(LocalStorage::new()?, WebDom::new()?, TimeoutScheduler);
        let app = bootstrap(ctx, |initial| JsApplication::launch(&main, initial))?;
        Ok(app.instance)
    };

    run().map_err(|e| js_sys::Error::new(&e.to_string()).into())
}
