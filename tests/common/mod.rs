//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use crud_api_skeleton::api::create_router;
use crud_api_skeleton::config::Config;
use crud_api_skeleton::domain::{Bot, PasswordHasher, Record};
use crud_api_skeleton::errors::{AppError, AppResult};
use crud_api_skeleton::infra::{LogMailer, Persistence, Store};
use crud_api_skeleton::query::{Predicate, SortOrder};
use crud_api_skeleton::services::notifications::{
    ErrorReporter, NotificationError, NotificationManager, NotificationProvider,
};
use crud_api_skeleton::services::Services;
use crud_api_skeleton::AppState;

pub const SECRET: &str = "integration-test-secret-with-enough-length-42";
pub const PASSWORD: &str = "correct-horse-battery";

pub fn config() -> Config {
    Config::new(SECRET).unwrap()
}

/// Fast reversible "hash" so the tests do not pay for Argon2
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, plain_text: &str) -> AppResult<String> {
        Ok(format!("plain:{}", plain_text))
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        hash == format!("plain:{}", plain_text)
    }
}

pub fn services(persistence: Persistence) -> Services {
    Services::with_components(
        persistence,
        Arc::new(PlainHasher),
        Arc::new(LogMailer),
        &config(),
    )
}

// =============================================================================
// Notification capture
// =============================================================================

/// Provider forwarding every message into a channel
pub struct ChannelProvider {
    sender: mpsc::UnboundedSender<(String, String)>,
}

#[async_trait]
impl NotificationProvider for ChannelProvider {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotificationError> {
        self.sender
            .send((recipient.to_string(), message.to_string()))
            .map_err(|e| NotificationError::Send(e.to_string()))
    }
}

pub fn capturing_reporter() -> (ErrorReporter, mpsc::UnboundedReceiver<(String, String)>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let mut manager = NotificationManager::new();
    manager.register("capture", Arc::new(ChannelProvider { sender }));

    let reporter = ErrorReporter::new(manager, "capture", Some("ops-chat".to_string()), "test");
    (reporter, receiver)
}

// =============================================================================
// Broken stores
// =============================================================================

/// Store whose every operation fails like a lost database connection
pub struct OfflineStore;

fn offline<T>() -> AppResult<T> {
    Err(AppError::internal("connection refused"))
}

#[async_trait]
impl<T: Record> Store<T> for OfflineStore {
    async fn find_one(&self, _predicate: &Predicate) -> AppResult<Option<T>> {
        offline()
    }

    async fn find_many(
        &self,
        _predicate: Option<&Predicate>,
        _order: SortOrder,
        _offset: u64,
        _limit: u64,
    ) -> AppResult<Vec<T>> {
        offline()
    }

    async fn count(&self, _predicate: Option<&Predicate>) -> AppResult<u64> {
        offline()
    }

    async fn insert(&self, _new: T::New) -> AppResult<T> {
        offline()
    }

    async fn insert_many(&self, _news: Vec<T::New>) -> AppResult<Vec<T>> {
        offline()
    }

    async fn update(&self, _id: i32, _patch: T::Patch) -> AppResult<T> {
        offline()
    }

    async fn update_many(&self, _patches: Vec<(i32, T::Patch)>) -> AppResult<Vec<T>> {
        offline()
    }

    async fn delete(&self, _id: i32) -> AppResult<()> {
        offline()
    }

    async fn delete_where(&self, _predicate: &Predicate) -> AppResult<Vec<T>> {
        offline()
    }
}

/// In-memory persistence whose bot store is offline
pub fn persistence_with_offline_bots() -> Persistence {
    Persistence {
        bots: Arc::new(OfflineStore) as Arc<dyn Store<Bot>>,
        ..Persistence::memory()
    }
}

// =============================================================================
// HTTP helpers
// =============================================================================

pub fn app(persistence: Persistence, reporter: ErrorReporter) -> Router {
    create_router(AppState::new(&services(persistence), reporter, None))
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
