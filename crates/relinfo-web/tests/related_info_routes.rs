//! Drives the related-info routes end to end through the router, with a
//! store that records every call it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use relinfo_common::{
    ExperimentId, Parameter, ParameterSet, ParameterSetId, PublicationFormData, SchemaNamespaces,
    UriFormData,
};
use relinfo_config::{AuthConfig, Config, ExperimentAcl};
use relinfo_store::{MemoryParameterStore, ParameterStore, RelatedInfoHandler, Result};
use relinfo_web::auth::AclAuthorizer;
use relinfo_web::handlers::related_info::DELETE_ACK;
use relinfo_web::router::build_router;
use relinfo_web::state::AppState;
use tower::ServiceExt;

// ── Recording store ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List(ExperimentId),
    Get(ParameterSetId),
    Create(ExperimentId),
    Replace(ParameterSetId),
    Delete(ParameterSetId),
}

#[derive(Default)]
struct RecordingStore {
    inner: MemoryParameterStore,
    calls: Mutex<Vec<Call>>,
}

impl RecordingStore {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

#[async_trait]
impl ParameterStore for RecordingStore {
    async fn parameter_sets(&self, experiment_id: ExperimentId, schema: &str) -> Result<Vec<ParameterSet>> {
        self.record(Call::List(experiment_id));
        self.inner.parameter_sets(experiment_id, schema).await
    }

    async fn parameter_set(&self, id: ParameterSetId) -> Result<ParameterSet> {
        self.record(Call::Get(id));
        self.inner.parameter_set(id).await
    }

    async fn create_parameter_set(
        &self,
        experiment_id: ExperimentId,
        schema: &str,
        parameters: Vec<Parameter>,
    ) -> Result<ParameterSetId> {
        self.record(Call::Create(experiment_id));
        self.inner.create_parameter_set(experiment_id, schema, parameters).await
    }

    async fn replace_parameters(&self, id: ParameterSetId, parameters: Vec<Parameter>) -> Result<()> {
        self.record(Call::Replace(id));
        self.inner.replace_parameters(id, parameters).await
    }

    async fn delete_parameter_set(&self, id: ParameterSetId) -> Result<()> {
        self.record(Call::Delete(id));
        self.inner.delete_parameter_set(id).await
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

const PUBLIC: ExperimentId = 1;
const PRIVATE: ExperimentId = 2;

fn config() -> Config {
    Config {
        auth: AuthConfig {
            user_header: "x-remote-user".to_string(),
            experiments: vec![
                ExperimentAcl {
                    id: PUBLIC,
                    public: true,
                    owners: vec!["alice".to_string()],
                    ..Default::default()
                },
                ExperimentAcl {
                    id: PRIVATE,
                    writers: vec!["carol".to_string()],
                    readers: vec!["bob".to_string()],
                    ..Default::default()
                },
            ],
        },
        ..Default::default()
    }
}

fn app() -> (Router, Arc<RecordingStore>) {
    let config = config();
    let store = Arc::new(RecordingStore::default());
    let authz = Arc::new(AclAuthorizer::from_config(&config.auth));
    let state = AppState::new(config, store.clone(), authz).unwrap();
    (build_router(state), store)
}

fn handler(store: &Arc<RecordingStore>, experiment_id: ExperimentId) -> RelatedInfoHandler {
    RelatedInfoHandler::new(store.clone(), SchemaNamespaces::default(), experiment_id)
}

fn sample_uri() -> UriFormData {
    UriFormData {
        uri: "https://data.example.org/frames".to_string(),
        title: "Diffraction frames".to_string(),
        notes: "reprocessed twice".to_string(),
    }
}

fn sample_publication() -> PublicationFormData {
    PublicationFormData {
        title: "Structure of a kinase".to_string(),
        authors: "Smith J, Jones K".to_string(),
        year: "2011".to_string(),
        doi: "10.1107/S0907444911001314".to_string(),
        ..Default::default()
    }
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-remote-user", user);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, user: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(user) = user {
        builder = builder.header("x-remote-user", user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

// ── Authorization ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rejected_readers_never_reach_the_store() {
    let (app, store) = app();

    let (status, _, _) = send(&app, get("/experiment/2/related-info/", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, get("/experiment/2/related-info/", Some("mallory"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(&app, get("/experiment/99/related-info/", Some("alice"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(store.take_calls(), vec![]);
}

#[tokio::test]
async fn test_readers_cannot_write() {
    let (app, store) = app();
    let id = handler(&store, PRIVATE).add_uri(&sample_uri()).await.unwrap();
    store.take_calls();

    let (status, _, _) = send(&app, get("/experiment/2/related-info/uri/add/", Some("bob"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let delete = format!("/experiment/2/related-info/uri/{}/delete/", id);
    let (status, _, _) = send(&app, post_form(&delete, Some("bob"), "")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(&app, post_form("/experiment/1/related-info/uri/add/", None, "uri=https%3A%2F%2Fx.org")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(store.take_calls(), vec![]);
}

#[tokio::test]
async fn test_non_numeric_experiment_id_is_bad_request() {
    let (app, store) = app();
    let (status, _, _) = send(&app, get("/experiment/abc/related-info/", Some("alice"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.take_calls(), vec![]);
}

// ── Index ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_index_for_anonymous_reader_hides_write_controls() {
    let (app, store) = app();
    handler(&store, PUBLIC).add_uri(&sample_uri()).await.unwrap();

    let (status, headers, body) = send(&app, get("/experiment/1/related-info/", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Diffraction frames"));
    assert!(!body.contains("add-uri"));
    assert!(!body.contains("edit-link"));
    assert!(!body.contains("delete-form"));
    let cache = headers.get(header::CACHE_CONTROL).unwrap().to_str().unwrap();
    assert!(cache.contains("no-cache"));
}

#[tokio::test]
async fn test_index_for_owner_lists_everything() {
    let (app, store) = app();
    handler(&store, PUBLIC).add_uri(&sample_uri()).await.unwrap();
    handler(&store, PUBLIC).add_publication(&sample_publication()).await.unwrap();
    store
        .create_parameter_set(PUBLIC, &SchemaNamespaces::default().auxiliary, vec![
            Parameter::new("beamline", "MX2"),
        ])
        .await
        .unwrap();
    // Another experiment's record must not leak in.
    handler(&store, PRIVATE)
        .add_uri(&UriFormData { title: "Private frames".to_string(), ..sample_uri() })
        .await
        .unwrap();

    let (status, _, body) = send(&app, get("/experiment/1/related-info/", Some("alice"))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("add-uri"));
    assert!(body.contains("add-publication"));
    assert!(body.contains("delete-form"));
    assert!(body.contains("fetch(form.action"));
    assert!(body.contains("Diffraction frames"));
    assert!(body.contains("Structure of a kinase"));
    assert!(body.contains("beamline"));
    assert!(body.contains("MX2"));
    assert!(!body.contains("Private frames"));
}

#[tokio::test]
async fn test_index_for_empty_experiment() {
    let (app, _store) = app();
    let (status, _, body) = send(&app, get("/experiment/2/related-info/", Some("bob"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No related URIs."));
    assert!(body.contains("No related publications."));
    assert!(!body.contains("other-info"));
}

// ── Add ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_uri_form_is_empty_on_get() {
    let (app, store) = app();
    let (status, _, body) = send(&app, get("/experiment/1/related-info/uri/add/", Some("alice"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"name="uri""#));
    assert!(!body.contains("field-error"));
    assert_eq!(store.take_calls(), vec![]);
}

#[tokio::test]
async fn test_add_uri_redirects_to_experiment_view() {
    let (app, store) = app();
    let body = "uri=https%3A%2F%2Fdata.example.org%2Fframes&title=Frames&notes=";

    let (status, headers, _) = send(&app, post_form("/experiment/1/related-info/uri/add/", Some("alice"), body)).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/experiment/view/1/");
    assert_eq!(store.take_calls(), vec![Call::Create(PUBLIC)]);

    let uris = handler(&store, PUBLIC).uris().await.unwrap();
    assert_eq!(uris.len(), 1);
    assert_eq!(uris[0].uri, "https://data.example.org/frames");
    assert_eq!(uris[0].title, "Frames");
}

#[tokio::test]
async fn test_invalid_uri_submission_redisplays_form() {
    let (app, store) = app();

    let (status, _, body) = send(
        &app,
        post_form("/experiment/1/related-info/uri/add/", Some("alice"), "title=Only+a+title"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This field is required."));
    assert!(body.contains(r#"value="Only a title""#));
    assert_eq!(store.take_calls(), vec![]);
}

#[tokio::test]
async fn test_empty_post_shows_blank_form() {
    let (app, store) = app();
    let (status, _, body) = send(&app, post_form("/experiment/1/related-info/uri/add/", Some("alice"), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("field-error"));
    assert_eq!(store.take_calls(), vec![]);
}

#[tokio::test]
async fn test_add_publication() {
    let (app, store) = app();
    let body = "title=A+paper&authors=Smith+J&year=2012&doi=10.1000%2Fxyz123&url=&notes=";

    let (status, headers, _) =
        send(&app, post_form("/experiment/2/related-info/publication/add/", Some("carol"), body)).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/experiment/view/2/");
    let publications = handler(&store, PRIVATE).publications().await.unwrap();
    assert_eq!(publications.len(), 1);
    assert_eq!(publications[0].doi, "10.1000/xyz123");
}

#[tokio::test]
async fn test_invalid_publication_is_not_created() {
    let (app, store) = app();
    let body = "title=A+paper&doi=not-a-doi";

    let (status, _, body) =
        send(&app, post_form("/experiment/2/related-info/publication/add/", Some("carol"), body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Enter a valid DOI"));
    assert_eq!(store.take_calls(), vec![]);
}

// ── Edit ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_edit_uri_form_is_prefilled_from_form_data() {
    let (app, store) = app();
    let rih = handler(&store, PUBLIC);
    let id = rih.add_uri(&sample_uri()).await.unwrap();
    let expected = rih.uri_form_data(id).await.unwrap();

    let url = format!("/experiment/1/related-info/uri/{}/edit/", id);
    let (status, _, body) = send(&app, get(&url, Some("alice"))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!(r#"value="{}""#, expected.title)));
    assert!(body.contains(&format!(">{}</textarea>", expected.notes)));
}

#[tokio::test]
async fn test_edit_publication_form_is_prefilled_from_form_data() {
    let (app, store) = app();
    let rih = handler(&store, PUBLIC);
    let id = rih.add_publication(&sample_publication()).await.unwrap();
    let expected = rih.publication_form_data(id).await.unwrap();

    let url = format!("/experiment/1/related-info/publication/{}/edit/", id);
    let (status, _, body) = send(&app, get(&url, Some("alice"))).await;

    assert_eq!(status, StatusCode::OK);
    for value in [&expected.title, &expected.authors, &expected.year] {
        assert!(body.contains(&format!(r#"value="{}""#, value)), "missing {}", value);
    }
}

#[tokio::test]
async fn test_edit_uri_updates_record() {
    let (app, store) = app();
    let id = handler(&store, PUBLIC).add_uri(&sample_uri()).await.unwrap();
    store.take_calls();

    let url = format!("/experiment/1/related-info/uri/{}/edit/", id);
    let body = "uri=https%3A%2F%2Fdata.example.org%2Fv2&title=Version+2&notes=";
    let (status, headers, _) = send(&app, post_form(&url, Some("alice"), body)).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/experiment/view/1/");
    assert!(store.take_calls().contains(&Call::Replace(id)));
    let data = handler(&store, PUBLIC).uri_form_data(id).await.unwrap();
    assert_eq!(data.title, "Version 2");
    assert!(data.notes.is_empty());
}

#[tokio::test]
async fn test_edit_publication_updates_record() {
    let (app, store) = app();
    let id = handler(&store, PRIVATE).add_publication(&sample_publication()).await.unwrap();
    store.take_calls();

    let url = format!("/experiment/2/related-info/publication/{}/edit/", id);
    let body = "title=Structure+of+a+kinase%2C+revised&authors=Smith+J&year=2013\
                &doi=10.1000%2Fabc&url=https%3A%2F%2Fjournal.example.org%2Fp%2F7&notes=";
    let (status, headers, _) = send(&app, post_form(&url, Some("carol"), body)).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/experiment/view/2/");
    let calls = store.take_calls();
    assert!(calls.contains(&Call::Replace(id)));
    assert!(!calls.iter().any(|c| matches!(c, Call::Create(_))));

    let data = handler(&store, PRIVATE).publication_form_data(id).await.unwrap();
    assert_eq!(
        data,
        PublicationFormData {
            title: "Structure of a kinase, revised".to_string(),
            authors: "Smith J".to_string(),
            year: "2013".to_string(),
            doi: "10.1000/abc".to_string(),
            url: "https://journal.example.org/p/7".to_string(),
            notes: String::new(),
        }
    );
}

#[tokio::test]
async fn test_invalid_edit_does_not_update() {
    let (app, store) = app();
    let id = handler(&store, PUBLIC).add_publication(&sample_publication()).await.unwrap();
    store.take_calls();

    let url = format!("/experiment/1/related-info/publication/{}/edit/", id);
    let (status, _, body) = send(&app, post_form(&url, Some("alice"), "title=&year=2012")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This field is required."));
    assert!(!store.take_calls().iter().any(|c| matches!(c, Call::Replace(_))));
}

#[tokio::test]
async fn test_edit_of_foreign_record_is_not_found() {
    let (app, store) = app();
    let id = handler(&store, PRIVATE).add_uri(&sample_uri()).await.unwrap();

    let url = format!("/experiment/1/related-info/uri/{}/edit/", id);
    let (status, _, _) = send(&app, get(&url, Some("alice"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_requires_post() {
    let (app, store) = app();
    let id = handler(&store, PUBLIC).add_uri(&sample_uri()).await.unwrap();
    store.take_calls();

    let url = format!("/experiment/1/related-info/uri/{}/delete/", id);
    let (status, _, _) = send(&app, get(&url, Some("alice"))).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(!store.take_calls().iter().any(|c| matches!(c, Call::Delete(_))));
    assert_eq!(handler(&store, PUBLIC).uris().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_get_is_refused_before_access_check() {
    let (app, store) = app();
    let id = handler(&store, PRIVATE).add_publication(&sample_publication()).await.unwrap();
    store.take_calls();

    let url = format!("/experiment/2/related-info/publication/{}/delete/", id);
    for user in [None, Some("mallory"), Some("bob")] {
        let (status, headers, _) = send(&app, get(&url, user)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "user {:?}", user);
        assert_eq!(headers.get(header::ALLOW).unwrap(), "POST");
    }

    assert_eq!(store.take_calls(), vec![]);
    assert_eq!(handler(&store, PRIVATE).publications().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_uri_acknowledges_with_literal_body() {
    let (app, store) = app();
    let id = handler(&store, PUBLIC).add_uri(&sample_uri()).await.unwrap();
    store.take_calls();

    let url = format!("/experiment/1/related-info/uri/{}/delete/", id);
    let (status, headers, body) = send(&app, post_form(&url, Some("alice"), "")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success": true}"#);
    assert_eq!(body, DELETE_ACK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    let deletes: Vec<Call> = store
        .take_calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Delete(_)))
        .collect();
    assert_eq!(deletes, vec![Call::Delete(id)]);
}

#[tokio::test]
async fn test_delete_publication_by_writer() {
    let (app, store) = app();
    let id = handler(&store, PRIVATE).add_publication(&sample_publication()).await.unwrap();

    let url = format!("/experiment/2/related-info/publication/{}/delete/", id);
    let (status, _, body) = send(&app, post_form(&url, Some("carol"), "")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, DELETE_ACK);
    assert!(handler(&store, PRIVATE).publications().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_of_missing_record_reports_failure() {
    let (app, store) = app();

    let (status, _, body) =
        send(&app, post_form("/experiment/1/related-info/uri/404/delete/", Some("alice"), "")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], false);
    assert!(!store.take_calls().iter().any(|c| matches!(c, Call::Delete(_))));
}

#[tokio::test]
async fn test_delete_of_foreign_publication_is_not_found() {
    let (app, store) = app();
    let id = handler(&store, PRIVATE).add_publication(&sample_publication()).await.unwrap();
    store.take_calls();

    let url = format!("/experiment/1/related-info/publication/{}/delete/", id);
    let (status, _, body) = send(&app, post_form(&url, Some("alice"), "")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], false);
    assert!(!store.take_calls().iter().any(|c| matches!(c, Call::Delete(_))));
    assert_eq!(handler(&store, PRIVATE).publications().await.unwrap().len(), 1);
}

// ── System ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let (app, _store) = app();
    let (status, _, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "relinfo-web");
}
