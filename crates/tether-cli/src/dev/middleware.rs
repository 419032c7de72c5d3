//! Static asset middleware chain.
//!
//! Stages run in the configured order on the way in. The reload snippet,
//! when enabled, sits innermost so it sees the final file response.

use crate::dev::{HistoryFallback, content_type, reload};
use axum::{Router, middleware};
use std::sync::Arc;
use tether_config::MiddlewareKind;

/// Wrap `router` with the configured stages.
///
/// `Router::layer` makes each new layer the outermost one, so stages are
/// applied back to front.
pub fn apply_chain(
    router: Router,
    stages: &[MiddlewareKind],
    fallback: Arc<HistoryFallback>,
    live_reload: bool,
) -> Router {
    let mut router = router;

    if live_reload {
        router = router.layer(middleware::from_fn(reload::reload_snippet));
    }

    for stage in stages.iter().rev() {
        router = match stage {
            MiddlewareKind::HistoryApiFallback => router.layer(middleware::from_fn_with_state(
                fallback.clone(),
                crate::dev::fallback::history_api_fallback,
            )),
            MiddlewareKind::ContentType => {
                router.layer(middleware::from_fn(content_type::content_type))
            }
        };
    }

    router
}
