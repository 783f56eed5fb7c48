//! Axum router — maps all URL paths to handlers.

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{
    related_info::{
        add_publication_page, add_publication_submit, add_uri_page, add_uri_submit,
        delete_publication, delete_uri, edit_publication_page, edit_publication_submit,
        edit_uri_page, edit_uri_submit, index,
    },
    system::health,
};
use crate::middleware::{never_cache, require_post, require_read_access, require_write_access};
use crate::paths;
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    let read = Router::new()
        .route(paths::INDEX, get(index))
        .route_layer(from_fn_with_state(shared.clone(), require_read_access))
        .route_layer(from_fn(never_cache));

    let write = Router::new()
        .route(paths::ADD_URI,          get(add_uri_page).post(add_uri_submit))
        .route(paths::ADD_PUBLICATION,  get(add_publication_page).post(add_publication_submit))
        .route(paths::EDIT_URI,         get(edit_uri_page).post(edit_uri_submit))
        .route(paths::EDIT_PUBLICATION, get(edit_publication_page).post(edit_publication_submit))
        .route_layer(from_fn_with_state(shared.clone(), require_write_access));

    // POST only: the method guard is the outer layer, so a GET is a 405
    // whoever sends it.
    let delete = Router::new()
        .route(paths::DELETE_URI,         post(delete_uri))
        .route(paths::DELETE_PUBLICATION, post(delete_publication))
        .route_layer(from_fn_with_state(shared.clone(), require_write_access))
        .route_layer(from_fn(require_post));

    let mut router = Router::new()
        .route("/health", get(health))
        .merge(read)
        .merge(write)
        .merge(delete);

    if let Some(dir) = &shared.config.server.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
