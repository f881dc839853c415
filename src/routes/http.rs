//! HTTP endpoint handlers. These are thin wrappers that forward to the editor.
//! Each handler is instrumented; mutations answer with the fresh editor snapshot.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::contest::ContestService;
use crate::domain::{ProblemField, TestCaseField};
use crate::error::EditorError;
use crate::protocol::*;
use crate::state::AppState;

type ApiResult<T> = Result<T, EditorError>;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info")]
pub async fn http_languages() -> impl IntoResponse { Json(LanguagesOut::default()) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_problems<S: ContestService + Send + Sync + 'static>(
  State(state): State<Arc<AppState<S>>>,
) -> Json<EditorSnapshot> {
  let ed = state.editor.read().await;
  Json(EditorSnapshot::of(&ed))
}

#[instrument(level = "info", skip(state))]
pub async fn http_add_problem<S: ContestService + Send + Sync + 'static>(
  State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<EditorSnapshot>) {
  let mut ed = state.editor.write().await;
  let index = ed.add_problem();
  info!(target: "contest", index, "HTTP problem added");
  (StatusCode::CREATED, Json(EditorSnapshot::of(&ed)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_remove_problem<S: ContestService + Send + Sync + 'static>(
  State(state): State<Arc<AppState<S>>>,
  Path(index): Path<usize>,
) -> ApiResult<Json<EditorSnapshot>> {
  let mut ed = state.editor.write().await;
  ed.remove_problem(index)?;
  Ok(Json(EditorSnapshot::of(&ed)))
}

#[instrument(level = "info", skip(state, body), fields(field = %body.field))]
pub async fn http_update_problem<S: ContestService + Send + Sync + 'static>(
  State(state): State<Arc<AppState<S>>>,
  Path(index): Path<usize>,
  Json(body): Json<FieldUpdateIn>,
) -> ApiResult<Json<EditorSnapshot>> {
  let field: ProblemField = body.field.parse().map_err(EditorError::UnknownField)?;
  let mut ed = state.editor.write().await;
  ed.update_problem_field(index, field, body.value)?;
  Ok(Json(EditorSnapshot::of(&ed)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_add_test_case<S: ContestService + Send + Sync + 'static>(
  State(state): State<Arc<AppState<S>>>,
  Path(index): Path<usize>,
) -> ApiResult<(StatusCode, Json<EditorSnapshot>)> {
  let mut ed = state.editor.write().await;
  let order = ed.add_test_case(index)?;
  info!(target: "contest", problem = index, order, "HTTP test case added");
  Ok((StatusCode::CREATED, Json(EditorSnapshot::of(&ed))))
}

#[instrument(level = "info", skip(state))]
pub async fn http_remove_test_case<S: ContestService + Send + Sync + 'static>(
  State(state): State<Arc<AppState<S>>>,
  Path((index, tc)): Path<(usize, usize)>,
) -> ApiResult<Json<EditorSnapshot>> {
  let mut ed = state.editor.write().await;
  ed.remove_test_case(index, tc)?;
  Ok(Json(EditorSnapshot::of(&ed)))
}

#[instrument(level = "info", skip(state, body), fields(field = %body.field))]
pub async fn http_update_test_case<S: ContestService + Send + Sync + 'static>(
  State(state): State<Arc<AppState<S>>>,
  Path((index, tc)): Path<(usize, usize)>,
  Json(body): Json<FieldUpdateIn>,
) -> ApiResult<Json<EditorSnapshot>> {
  let field: TestCaseField = body.field.parse().map_err(EditorError::UnknownField)?;
  let mut ed = state.editor.write().await;
  ed.update_test_case_field(index, tc, field, body.value)?;
  Ok(Json(EditorSnapshot::of(&ed)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_issues<S: ContestService + Send + Sync + 'static>(
  State(state): State<Arc<AppState<S>>>,
) -> Json<IssuesOut> {
  let issues = state.editor.read().await.validate();
  Json(IssuesOut { valid: issues.is_empty(), issues })
}

#[instrument(level = "info", skip(state))]
pub async fn http_commit<S>(
  State(state): State<Arc<AppState<S>>>,
  Path(contest_id): Path<u64>,
) -> ApiResult<(StatusCode, Json<CommitOut>)>
where
  S: ContestService + Send + Sync + 'static,
{
  let receipt = state.commit(contest_id).await?;
  info!(target: "contest", contest_id, created = receipt.created, "HTTP commit succeeded");
  Ok((StatusCode::CREATED, Json(CommitOut { message: COMMIT_SUCCESS_MESSAGE, receipt })))
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
  };
  use serde_json::{json, Value};
  use tower::ServiceExt;

  use crate::contest::CreatedProblems;
  use crate::domain::Problem;
  use crate::editor::{CommitReceipt, ProblemSetEditor};
  use crate::error::ContestError;
  use crate::routes::build_router;
  use crate::state::CompletionHook;

  use super::*;

  struct FakeService {
    detail: Option<&'static str>,
  }

  impl ContestService for FakeService {
    async fn create_problems(&self, _contest_id: u64, problems: &[Problem]) -> Result<CreatedProblems, ContestError> {
      match self.detail {
        None => Ok(CreatedProblems { message: None, problems: vec![Value::Null; problems.len()] }),
        Some(d) => Err(ContestError::Rejected { status: 403, detail: Some(d.to_string()) }),
      }
    }
  }

  fn app(detail: Option<&'static str>) -> (Router, Arc<AppState<FakeService>>, Arc<AtomicUsize>) {
    let hooked = Arc::new(AtomicUsize::new(0));
    let counter = hooked.clone();
    let hook: CompletionHook = Arc::new(move |_: &CommitReceipt| {
      counter.fetch_add(1, Ordering::SeqCst);
    });
    let state = Arc::new(AppState::new(ProblemSetEditor::default(), FakeService { detail }, hook));
    (build_router(state.clone()), state, hooked)
  }

  async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(b) => builder
        .header("content-type", "application/json")
        .body(Body::from(b.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
  }

  async fn fill_first_problem(app: &Router) {
    call(app, Method::PATCH, "/api/v1/problems/0", Some(json!({ "field": "title", "value": "Sum" }))).await;
    call(app, Method::PATCH, "/api/v1/problems/0", Some(json!({ "field": "statement", "value": "a+b" }))).await;
  }

  #[tokio::test]
  async fn health_and_languages() {
    let (app, _, _) = app(None);
    let (status, body) = call(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (_, body) = call(&app, Method::GET, "/api/v1/languages", None).await;
    assert_eq!(body["languages"].as_array().map(Vec::len), Some(10));
    assert_eq!(body["languages"][0]["id"], 71);
  }

  #[tokio::test]
  async fn snapshot_shows_memory_in_kb() {
    let (app, _, _) = app(None);
    let (status, body) = call(&app, Method::PATCH, "/api/v1/problems/0", Some(json!({ "field": "memoryLimitKb", "value": "256" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problems"][0]["memory_limit"], 256_000);
    assert_eq!(body["problems"][0]["memory_limit_kb"], 256);
    assert_eq!(body["committing"], false);
  }

  #[tokio::test]
  async fn problem_and_test_case_editing() {
    let (app, state, _) = app(None);
    let (status, body) = call(&app, Method::POST, "/api/v1/problems", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["problems"].as_array().map(Vec::len), Some(2));

    let (status, _) = call(&app, Method::POST, "/api/v1/problems/1/test-cases", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = call(&app, Method::PATCH, "/api/v1/problems/1/test-cases/1", Some(json!({ "field": "is_public", "value": true }))).await;
    assert_eq!(body["problems"][1]["test_cases"][1]["is_public"], true);
    assert_eq!(body["problems"][1]["test_cases"][1]["name"], "Test Case 2");

    let (status, _) = call(&app, Method::DELETE, "/api/v1/problems/1/test-cases/0", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::DELETE, "/api/v1/problems/1/test-cases/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "LAST_ENTRY");

    let (status, _) = call(&app, Method::DELETE, "/api/v1/problems/0", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, "/api/v1/problems/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ed = state.editor.read().await;
    assert_eq!(ed.len(), 1);
    assert_eq!(ed.problems()[0].test_cases.orders(), vec![2]);
  }

  #[tokio::test]
  async fn bad_edits_are_reported() {
    let (app, _, _) = app(None);
    let (status, body) = call(&app, Method::PATCH, "/api/v1/problems/0", Some(json!({ "field": "colour", "value": "red" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNKNOWN_FIELD");

    let (status, body) = call(&app, Method::PATCH, "/api/v1/problems/4", Some(json!({ "field": "points", "value": "1" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = call(&app, Method::PATCH, "/api/v1/problems/0", Some(json!({ "field": "points", "value": "abc" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problems"][0]["points"], 0);
  }

  #[tokio::test]
  async fn issues_then_successful_commit() {
    let (app, state, hooked) = app(None);
    let (_, body) = call(&app, Method::GET, "/api/v1/issues", None).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["issues"].as_array().map(Vec::len), Some(2));

    let (status, body) = call(&app, Method::POST, "/api/v1/contests/5/problems", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["issues"][0]["field"], "title");

    fill_first_problem(&app).await;
    call(&app, Method::POST, "/api/v1/problems/0/test-cases", None).await;
    let (status, body) = call(&app, Method::POST, "/api/v1/contests/5/problems", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Problems added successfully!");
    assert_eq!(body["contest_id"], 5);
    assert_eq!(body["created"], 1);
    assert_eq!(hooked.load(Ordering::SeqCst), 1);

    let ed = state.editor.read().await;
    assert_eq!(ed.len(), 1);
    assert_eq!(ed.problems()[0].title, "");
    assert_eq!(ed.problems()[0].test_cases.len(), 1);
    assert!(!ed.is_committing());
  }

  #[tokio::test]
  async fn failed_commit_keeps_drafts() {
    let (app, state, hooked) = app(Some("You are not the creator of this contest"));
    fill_first_problem(&app).await;
    let (status, body) = call(&app, Method::POST, "/api/v1/contests/5/problems", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "COMMIT_FAILED");
    assert_eq!(body["message"], "You are not the creator of this contest");
    assert_eq!(hooked.load(Ordering::SeqCst), 0);

    let ed = state.editor.read().await;
    assert_eq!(ed.problems()[0].title, "Sum");
    assert!(!ed.is_committing());
  }

  #[tokio::test]
  async fn commit_while_in_flight_conflicts() {
    let (app, state, _) = app(None);
    fill_first_problem(&app).await;
    let pending = state.editor.write().await.begin_commit(5).unwrap();

    let (status, body) = call(&app, Method::POST, "/api/v1/contests/5/problems", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "COMMIT_IN_PROGRESS");

    let (_, body) = call(&app, Method::GET, "/api/v1/problems", None).await;
    assert_eq!(body["committing"], true);

    // The batch never reached the service; releasing it keeps the drafts and reopens commits.
    drop(pending);
    state.editor.write().await.abandon_commit();
    let (_, body) = call(&app, Method::GET, "/api/v1/problems", None).await;
    assert_eq!(body["committing"], false);
    assert_eq!(body["problems"][0]["title"], "Sum");
  }
}
