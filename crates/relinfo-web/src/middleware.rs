//! Interceptors composed around the related-info handlers.
//!
//! Each access check runs after routing (attach with `route_layer`) so the
//! experiment id is available from the path, and returns early on rejection.

use axum::extract::{Path, Request, State};
use axum::http::header::{ALLOW, CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use relinfo_common::{ExperimentId, User};
use serde::Deserialize;
use tracing::debug;

use crate::auth::CurrentUser;
use crate::error::WebError;
use crate::state::SharedState;

/// The part of every related-info path that names the experiment.
#[derive(Debug, Deserialize)]
pub struct ExperimentScope {
    pub experiment_id: ExperimentId,
}

#[derive(Clone, Copy, Debug)]
enum Access {
    Read,
    Write,
}

async fn check(
    state: &SharedState,
    user: &User,
    experiment_id: ExperimentId,
    access: Access,
) -> Result<(), WebError> {
    let allowed = match access {
        Access::Read => state.authz.has_read_access(user, experiment_id).await,
        Access::Write => state.authz.has_write_access(user, experiment_id).await,
    };
    if allowed {
        return Ok(());
    }
    debug!(%user, experiment_id, ?access, "Access denied");
    if user.is_authenticated() {
        Err(WebError::Forbidden(experiment_id))
    } else {
        Err(WebError::Unauthenticated)
    }
}

pub async fn require_read_access(
    State(state): State<SharedState>,
    Path(scope): Path<ExperimentScope>,
    CurrentUser(user): CurrentUser,
    request: Request,
    next: Next,
) -> Response {
    match check(&state, &user, scope.experiment_id, Access::Read).await {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

pub async fn require_write_access(
    State(state): State<SharedState>,
    Path(scope): Path<ExperimentScope>,
    CurrentUser(user): CurrentUser,
    request: Request,
    next: Next,
) -> Response {
    match check(&state, &user, scope.experiment_id, Access::Write).await {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// Reject anything but POST with 405. Layered outside the access checks so
/// the method is refused before the caller is looked at.
pub async fn require_post(request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        return next.run(request).await;
    }
    debug!(method = %request.method(), path = %request.uri().path(), "Method not allowed");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(ALLOW, HeaderValue::from_static("POST"))],
    )
        .into_response()
}

/// Mark the response as never cacheable.
pub async fn never_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate, max-age=0"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    response
}
