//! Related-info pages: list, add, edit and delete related URIs and
//! publications of one experiment.
//!
//! Access checks run in middleware before any of these handlers; see
//! `crate::router`.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use relinfo_common::{ExperimentId, ParameterSetId};
use tracing::debug;

use crate::auth::CurrentUser;
use crate::error::{JsonError, WebError};
use crate::forms::{Form, FormSchema, RelatedPublicationForm, RelatedUriForm};
use crate::paths::{self, IndexLinks};
use crate::state::{AppState, SharedState};
use crate::templates;
use crate::views::{FormView, IndexView};

/// Body returned by the delete endpoints.
pub const DELETE_ACK: &str = r#"{"success": true}"#;

type Posted = axum::Form<HashMap<String, String>>;

pub async fn index(
    State(state): State<SharedState>,
    Path(experiment_id): Path<ExperimentId>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, WebError> {
    let has_write_permissions =
        user.is_authenticated() && state.authz.has_write_access(&user, experiment_id).await;

    let rih = state.handler(experiment_id);
    let view = IndexView {
        experiment_id,
        has_write_permissions,
        related_uris: rih.uris().await?,
        related_publications: rih.publications().await?,
        other_info: rih.auxiliary_parameters(&state.config.schemas.auxiliary).await?,
        links: IndexLinks::for_experiment(experiment_id),
    };
    Ok(Html(state.templates.render(templates::INDEX, &view)?))
}

// ── Related URIs ─────────────────────────────────────────────────────────────

pub async fn add_uri_page(
    State(state): State<SharedState>,
    Path(experiment_id): Path<ExperimentId>,
) -> Result<Response, WebError> {
    render_form(&state, templates::ADD_URI, paths::add_uri(experiment_id), &Form::<RelatedUriForm>::empty())
}

pub async fn add_uri_submit(
    State(state): State<SharedState>,
    Path(experiment_id): Path<ExperimentId>,
    axum::Form(fields): Posted,
) -> Result<Response, WebError> {
    let url = paths::add_uri(experiment_id);
    if fields.is_empty() {
        return render_form(&state, templates::ADD_URI, url, &Form::<RelatedUriForm>::empty());
    }
    let form = Form::<RelatedUriForm>::bind(&fields);
    match form.cleaned_data() {
        Some(data) => {
            state.handler(experiment_id).add_uri(data).await?;
            Ok(redirect_to_experiment(&state, experiment_id))
        }
        None => invalid(&state, templates::ADD_URI, url, &form, experiment_id),
    }
}

pub async fn edit_uri_page(
    State(state): State<SharedState>,
    Path((experiment_id, parameterset_id)): Path<(ExperimentId, ParameterSetId)>,
) -> Result<Response, WebError> {
    let initial = state.handler(experiment_id).uri_form_data(parameterset_id).await?;
    render_form(
        &state,
        templates::ADD_URI,
        paths::edit_uri(experiment_id, parameterset_id),
        &Form::<RelatedUriForm>::with_initial(&initial),
    )
}

pub async fn edit_uri_submit(
    State(state): State<SharedState>,
    Path((experiment_id, parameterset_id)): Path<(ExperimentId, ParameterSetId)>,
    axum::Form(fields): Posted,
) -> Result<Response, WebError> {
    let url = paths::edit_uri(experiment_id, parameterset_id);
    let rih = state.handler(experiment_id);
    if fields.is_empty() {
        let initial = rih.uri_form_data(parameterset_id).await?;
        return render_form(&state, templates::ADD_URI, url, &Form::<RelatedUriForm>::with_initial(&initial));
    }
    let form = Form::<RelatedUriForm>::bind(&fields);
    match form.cleaned_data() {
        Some(data) => {
            rih.edit_uri(data, parameterset_id).await?;
            Ok(redirect_to_experiment(&state, experiment_id))
        }
        None => invalid(&state, templates::ADD_URI, url, &form, experiment_id),
    }
}

pub async fn delete_uri(
    State(state): State<SharedState>,
    Path((experiment_id, parameterset_id)): Path<(ExperimentId, ParameterSetId)>,
) -> Result<Response, JsonError> {
    state.handler(experiment_id).delete_uri(parameterset_id).await?;
    Ok(delete_ack())
}

// ── Related publications ─────────────────────────────────────────────────────

pub async fn add_publication_page(
    State(state): State<SharedState>,
    Path(experiment_id): Path<ExperimentId>,
) -> Result<Response, WebError> {
    render_form(
        &state,
        templates::ADD_PUBLICATION,
        paths::add_publication(experiment_id),
        &Form::<RelatedPublicationForm>::empty(),
    )
}

pub async fn add_publication_submit(
    State(state): State<SharedState>,
    Path(experiment_id): Path<ExperimentId>,
    axum::Form(fields): Posted,
) -> Result<Response, WebError> {
    let url = paths::add_publication(experiment_id);
    if fields.is_empty() {
        return render_form(&state, templates::ADD_PUBLICATION, url, &Form::<RelatedPublicationForm>::empty());
    }
    let form = Form::<RelatedPublicationForm>::bind(&fields);
    match form.cleaned_data() {
        Some(data) => {
            state.handler(experiment_id).add_publication(data).await?;
            Ok(redirect_to_experiment(&state, experiment_id))
        }
        None => invalid(&state, templates::ADD_PUBLICATION, url, &form, experiment_id),
    }
}

pub async fn edit_publication_page(
    State(state): State<SharedState>,
    Path((experiment_id, parameterset_id)): Path<(ExperimentId, ParameterSetId)>,
) -> Result<Response, WebError> {
    let initial = state.handler(experiment_id).publication_form_data(parameterset_id).await?;
    render_form(
        &state,
        templates::ADD_PUBLICATION,
        paths::edit_publication(experiment_id, parameterset_id),
        &Form::<RelatedPublicationForm>::with_initial(&initial),
    )
}

pub async fn edit_publication_submit(
    State(state): State<SharedState>,
    Path((experiment_id, parameterset_id)): Path<(ExperimentId, ParameterSetId)>,
    axum::Form(fields): Posted,
) -> Result<Response, WebError> {
    let url = paths::edit_publication(experiment_id, parameterset_id);
    let rih = state.handler(experiment_id);
    if fields.is_empty() {
        let initial = rih.publication_form_data(parameterset_id).await?;
        return render_form(
            &state,
            templates::ADD_PUBLICATION,
            url,
            &Form::<RelatedPublicationForm>::with_initial(&initial),
        );
    }
    let form = Form::<RelatedPublicationForm>::bind(&fields);
    match form.cleaned_data() {
        Some(data) => {
            rih.edit_publication(data, parameterset_id).await?;
            Ok(redirect_to_experiment(&state, experiment_id))
        }
        None => invalid(&state, templates::ADD_PUBLICATION, url, &form, experiment_id),
    }
}

pub async fn delete_publication(
    State(state): State<SharedState>,
    Path((experiment_id, parameterset_id)): Path<(ExperimentId, ParameterSetId)>,
) -> Result<Response, JsonError> {
    state.handler(experiment_id).delete_publication(parameterset_id).await?;
    Ok(delete_ack())
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn render_form<S: FormSchema>(
    state: &AppState,
    template: &str,
    url: String,
    form: &Form<S>,
) -> Result<Response, WebError> {
    let view = FormView { url, form: form.context() };
    Ok(Html(state.templates.render(template, &view)?).into_response())
}

fn invalid<S: FormSchema>(
    state: &AppState,
    template: &str,
    url: String,
    form: &Form<S>,
    experiment_id: ExperimentId,
) -> Result<Response, WebError> {
    debug!(
        experiment_id,
        fields = ?form.errors().keys().collect::<Vec<_>>(),
        "Form submission failed validation"
    );
    render_form(state, template, url, form)
}

fn redirect_to_experiment(state: &AppState, experiment_id: ExperimentId) -> Response {
    Redirect::to(&state.experiment_view_path(experiment_id)).into_response()
}

fn delete_ack() -> Response {
    ([(CONTENT_TYPE, "application/json")], DELETE_ACK).into_response()
}
