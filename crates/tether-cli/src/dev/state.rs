//! Shared state for the development server.
//!
//! Tracks connected reload clients using parking_lot RwLock.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Buffered events per client before it is considered stalled.
const CLIENT_BUFFER: usize = 100;

/// Events pushed to connected browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReloadEvent {
    /// Client registered; sent once per connection
    Connected { id: usize },

    /// A stylesheet changed; clients refresh `<link>` tags in place
    Css { path: String },

    /// Any other watched file changed; clients reload the page
    Reload { path: String },
}

impl ReloadEvent {
    /// Pick the event for a changed project-relative path.
    pub fn for_path(relative: &Path) -> Self {
        let path = relative.to_string_lossy().replace('\\', "/");
        let is_css = relative
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("css"));

        if is_css {
            ReloadEvent::Css { path }
        } else {
            ReloadEvent::Reload { path }
        }
    }
}

/// Client connection tracker for Server-Sent Events.
pub type ClientRegistry = Arc<RwLock<HashMap<usize, mpsc::Sender<String>>>>;

/// Shared development server state.
pub struct DevServerState {
    /// Connected SSE clients
    pub clients: ClientRegistry,

    /// Next client ID
    next_client_id: RwLock<usize>,
}

impl DevServerState {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            next_client_id: RwLock::new(0),
        }
    }

    /// Register a new SSE client.
    ///
    /// # Returns
    ///
    /// Client ID and receiver for serialized events
    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = {
            let mut next_id = self.next_client_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);

        (id, rx)
    }

    /// Unregister an SSE client.
    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Send an event to a single client.
    pub async fn send_to(&self, id: usize, event: &ReloadEvent) {
        let sender = self.clients.read().get(&id).cloned();
        if let Some(tx) = sender {
            if tx.send(encode(event)).await.is_err() {
                self.unregister_client(id);
            }
        }
    }

    /// Broadcast an event to all connected clients.
    ///
    /// Clients whose channel is closed are dropped from the registry.
    pub async fn broadcast(&self, event: &ReloadEvent) {
        let json = encode(event);

        // Snapshot so the lock is not held across awaits
        let clients = self.clients.read().clone();

        let mut failed_ids = Vec::new();
        for (id, tx) in clients {
            if tx.send(json.clone()).await.is_err() {
                failed_ids.push(id);
            }
        }

        for id in failed_ids {
            tracing::debug!(client = id, "dropping disconnected reload client");
            self.unregister_client(id);
        }
    }

    /// Get number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}

impl Default for DevServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state handle for passing around the application.
pub type SharedState = Arc<DevServerState>;

fn encode(event: &ReloadEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_for_css_path() {
        let event = ReloadEvent::for_path(Path::new("dist/main.css"));
        assert_eq!(
            event,
            ReloadEvent::Css {
                path: "dist/main.css".to_string()
            }
        );
    }

    #[test]
    fn test_event_for_other_paths() {
        assert!(matches!(
            ReloadEvent::for_path(Path::new("dist/elm.js")),
            ReloadEvent::Reload { .. }
        ));
        assert!(matches!(
            ReloadEvent::for_path(Path::new("dist/index.html")),
            ReloadEvent::Reload { .. }
        ));
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&ReloadEvent::Reload {
            path: "dist/index.html".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"reload","path":"dist/index.html"}"#);
    }

    #[tokio::test]
    async fn test_client_registration() {
        let state = Arc::new(DevServerState::new());

        let (id1, _rx1) = state.register_client();
        let (id2, _rx2) = state.register_client();

        assert_eq!(state.client_count(), 2);
        assert_ne!(id1, id2);

        state.unregister_client(id1);
        assert_eq!(state.client_count(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_drops_closed_clients() {
        let state = DevServerState::new();

        let (_id1, mut rx1) = state.register_client();
        let (_id2, rx2) = state.register_client();
        drop(rx2);

        state
            .broadcast(&ReloadEvent::Css {
                path: "dist/app.css".to_string(),
            })
            .await;

        assert_eq!(state.client_count(), 1);
        let message = rx1.recv().await.expect("event delivered");
        assert!(message.contains(r#""type":"css""#));
    }
}
