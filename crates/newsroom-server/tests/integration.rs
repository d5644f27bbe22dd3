use axum::http::StatusCode;
use http_body_util::BodyExt;
use newsroom_core::article::{Article, NewArticle, StatusUpdate};
use newsroom_core::config::Config;
use newsroom_core::store::{ArticleStore, MemoryStore, UpdateOutcome};
use newsroom_core::types::ArticleStatus;
use newsroom_server::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const AUTHOR: (&str, &str) = ("u-ana", "staff");
const SECTION_HEAD: (&str, &str) = ("u-sam", "section-head");
const EIC: (&str, &str) = ("u-eve", "editor-in-chief");

/// Bootstrap a minimal newsroom inside the given temp directory.
fn init_newsroom(dir: &TempDir) -> axum::Router {
    newsroom_core::io::ensure_dir(&newsroom_core::paths::articles_dir(dir.path())).unwrap();
    Config::new("The Gazette").save_if_missing(dir.path()).unwrap();
    newsroom_server::build_router(dir.path().to_path_buf()).unwrap()
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    actor: Option<(&str, &str)>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut req = axum::http::Request::builder().method(method).uri(uri);
    if let Some((id, role)) = actor {
        req = req.header("x-actor-id", id).header("x-actor-role", role);
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => req.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, None).await
}

async fn post_as(
    app: &axum::Router,
    uri: &str,
    actor: (&str, &str),
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(actor), Some(body)).await
}

async fn create(app: &axum::Router, id: &str) {
    let (status, _) = post_as(
        app,
        "/api/articles",
        AUTHOR,
        serde_json::json!({ "id": id, "title": format!("Story {id}"), "content": "<p>Council votes.</p>" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn review(
    app: &axum::Router,
    id: &str,
    actor: (&str, &str),
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_as(app, &format!("/api/articles/{id}/review-action"), actor, body).await
}

async fn submitted(app: &axum::Router, id: &str) {
    create(app, id).await;
    let (status, _) = review(app, id, AUTHOR, serde_json::json!({ "action": "submit" })).await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_fetch_article() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    create(&app, "council-budget").await;

    let (status, json) = get(&app, "/api/articles/council-budget").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "draft");
    assert_eq!(json["author_id"], "u-ana");

    let (status, json) = get(&app, "/api/articles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["word_count"], 2);
}

#[tokio::test]
async fn duplicate_article_is_conflict() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    create(&app, "council-budget").await;
    let (status, json) = post_as(
        &app,
        "/api/articles",
        AUTHOR,
        serde_json::json!({ "id": "council-budget", "title": "Again" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["kind"], "conflict");
}

#[tokio::test]
async fn missing_actor_headers_rejected() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    let (status, json) = send(
        &app,
        "POST",
        "/api/articles",
        None,
        Some(serde_json::json!({ "title": "No author" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation");

    let (status, _) = post_as(
        &app,
        "/api/articles",
        ("u-x", "intern"),
        serde_json::json!({ "title": "Bad role" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_article_is_404() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    let (status, json) = get(&app, "/api/articles/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["kind"], "not_found");
}

// ---------------------------------------------------------------------------
// Review actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approve_then_replay_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    submitted(&app, "transit").await;

    let (status, json) = review(
        &app,
        "transit",
        SECTION_HEAD,
        serde_json::json!({ "action": "approve-to-eic" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "approved");
    assert_eq!(json["article"]["reviewer_id"], "u-sam");

    let (status, json) = review(
        &app,
        "transit",
        SECTION_HEAD,
        serde_json::json!({ "action": "approve-to-eic" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "invalid_transition");
}

#[tokio::test]
async fn undefined_action_without_feedback_is_invalid_transition() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    create(&app, "transit").await;

    let (status, json) = review(
        &app,
        "transit",
        SECTION_HEAD,
        serde_json::json!({ "action": "request-revision" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "invalid_transition");

    let (_, json) = get(&app, "/api/articles/transit").await;
    assert_eq!(json["status"], "draft");
}

#[tokio::test]
async fn short_feedback_is_400_and_article_unchanged() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    submitted(&app, "transit").await;

    let (status, json) = review(
        &app,
        "transit",
        SECTION_HEAD,
        serde_json::json!({ "action": "request-revision", "feedback": "fix" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation");

    let (_, json) = get(&app, "/api/articles/transit").await;
    assert_eq!(json["status"], "in-review");
}

#[tokio::test]
async fn wrong_role_is_403() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    submitted(&app, "transit").await;

    let (status, json) = review(
        &app,
        "transit",
        AUTHOR,
        serde_json::json!({ "action": "approve-to-eic" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["kind"], "permission");
}

#[tokio::test]
async fn unknown_action_is_400() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    create(&app, "transit").await;
    let (status, _) = review(&app, "transit", EIC, serde_json::json!({ "action": "spike" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn revision_loop_and_actions_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    submitted(&app, "transit").await;

    let (status, json) = review(
        &app,
        "transit",
        SECTION_HEAD,
        serde_json::json!({ "action": "request-revision", "feedback": "Please add a source citation here" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "needs-revision");

    let (status, json) = send(&app, "GET", "/api/articles/transit/actions", Some(AUTHOR), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["actions"], serde_json::json!(["resubmit"]));

    let (status, _) = review(&app, "transit", EIC, serde_json::json!({ "action": "resubmit" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = review(&app, "transit", AUTHOR, serde_json::json!({ "action": "resubmit" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "in-review");
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_partial_failure() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    submitted(&app, "a").await;
    create(&app, "b").await;
    submitted(&app, "c").await;

    let (status, json) = post_as(
        &app,
        "/api/articles/bulk-action",
        SECTION_HEAD,
        serde_json::json!({ "ids": ["a", "b", "c"], "action": "approve-to-eic" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
    assert_eq!(json["successful"], 2);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["items"][1]["id"], "b");
    assert_eq!(json["items"][1]["success"], false);
}

#[tokio::test]
async fn bulk_bad_feedback_rejected_up_front() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    submitted(&app, "a").await;

    let (status, _) = post_as(
        &app,
        "/api/articles/bulk-action",
        SECTION_HEAD,
        serde_json::json!({ "ids": ["a"], "action": "request-revision", "feedback": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, json) = get(&app, "/api/articles/a").await;
    assert_eq!(json["status"], "in-review");
}

/// Delays writes so a batch outlives its wait budget.
struct SlowStore(MemoryStore);

impl ArticleStore for SlowStore {
    fn get(&self, id: &str) -> newsroom_core::Result<Article> {
        self.0.get(id)
    }
    fn list(&self) -> newsroom_core::Result<Vec<Article>> {
        self.0.list()
    }
    fn insert(&self, article: &Article) -> newsroom_core::Result<()> {
        self.0.insert(article)
    }
    fn conditional_update(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> newsroom_core::Result<UpdateOutcome> {
        std::thread::sleep(Duration::from_millis(300));
        self.0.conditional_update(id, update)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bulk_timeout_returns_202_and_finishes_in_background() {
    let mut article = Article::draft(
        NewArticle {
            id: Some("slow".into()),
            title: "Slow story".into(),
            ..Default::default()
        },
        "u-ana",
    )
    .unwrap();
    article.status = ArticleStatus::InReview;
    let store = Arc::new(SlowStore(MemoryStore::with_articles([article])));
    let state = AppState::with_store(".".into(), Config::new("The Gazette"), store.clone());
    let app = newsroom_server::router(state);

    let (status, json) = post_as(
        &app,
        "/api/articles/bulk-action",
        SECTION_HEAD,
        serde_json::json!({ "ids": ["slow"], "action": "approve-to-eic", "timeout_secs": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["status"], "pending");
    assert_eq!(json["total"], 1);

    let mut landed = false;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if store.get("slow").unwrap().status == ArticleStatus::Approved {
            landed = true;
            break;
        }
    }
    assert!(landed, "background batch should finish");
}

// ---------------------------------------------------------------------------
// Queues / config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn review_queues() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    submitted(&app, "a").await;
    submitted(&app, "b").await;
    create(&app, "draft-only").await;
    review(&app, "b", SECTION_HEAD, serde_json::json!({ "action": "approve-to-eic" })).await;

    let (status, json) = get(&app, "/api/review-queue/section-head").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["articles"][0]["id"], "a");

    let (status, json) = get(&app, "/api/review-queue/eic?status=approved").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["articles"][0]["id"], "b");

    let (status, json) = get(&app, "/api/review-queue/admin?search=story%20b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);

    let (status, json) = get(&app, "/api/review-queue/eic?search=story%20a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);

    let (status, _) = get(&app, "/api/review-queue/copy-desk").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn config_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = init_newsroom(&dir);
    let (status, json) = get(&app, "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["publication"]["name"], "The Gazette");
    assert_eq!(json["workflow"]["min_feedback_chars"], 10);
    assert_eq!(json["warnings"], serde_json::json!([]));
}

#[test]
fn uninitialized_root_fails_to_build() {
    let dir = TempDir::new().unwrap();
    assert!(newsroom_server::build_router(dir.path().to_path_buf()).is_err());
}
