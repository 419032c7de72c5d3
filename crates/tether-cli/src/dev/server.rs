//! Development server.
//!
//! Serves the base directory through the middleware chain and exposes the
//! reload endpoints under `/__tether__/`.

use crate::dev::{DevConfig, HistoryFallback, SharedState, middleware, reload};
use crate::error::{CliError, Result};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Development server.
pub struct DevServer {
    /// Server configuration
    config: DevConfig,
    /// Shared application state
    state: SharedState,
}

impl DevServer {
    pub fn new(config: DevConfig, state: SharedState) -> Self {
        Self { config, state }
    }

    /// Build the axum router with all routes.
    ///
    /// # Errors
    ///
    /// Returns error if a history fallback rewrite pattern does not compile
    pub fn router(&self) -> Result<Router> {
        let server = &self.config.server;

        let fallback = HistoryFallback::new(
            &server.server.history_api_fallback,
            self.config.base_dir.clone(),
        )?;

        let assets = Router::new().fallback_service(ServeDir::new(&self.config.base_dir));
        let assets = middleware::apply_chain(
            assets,
            &server.server.middleware,
            Arc::new(fallback),
            server.reload,
        );

        let mut router = Router::new();
        if server.reload {
            router = router
                .route(reload::EVENTS_PATH, get(reload::handle_events))
                .route(reload::SCRIPT_PATH, get(reload::handle_reload_script));
        }

        Ok(router
            .fallback_service(assets)
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self.state.clone()))
    }

    /// Start the development server.
    ///
    /// # Errors
    ///
    /// Returns error if server cannot bind to configured address
    pub async fn start(self) -> Result<()> {
        let addr = self.config.addr;
        let app = self.router()?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        tracing::info!(%addr, base_dir = %self.config.base_dir.display(), "serving");
        crate::ui::success(&format!(
            "Serving {} at {}",
            self.config.base_dir.display(),
            self.config.server_url()
        ));

        axum::serve(listener, app)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))?;

        Ok(())
    }
}
