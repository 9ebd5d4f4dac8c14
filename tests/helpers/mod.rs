//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use libhub_api::{AppState, build_app};
use libhub_auth::JwtEncoder;
use libhub_core::config::{AppConfig, DatabaseBackend};
use libhub_core::traits::ManualClock;
use libhub_database::{BookStore, LibraryStore, MemoryStore};
use libhub_entity::book::{Book, BookStatus};
use libhub_entity::user::{User, UserRole};
use libhub_service::LoggingNotifier;
use libhub_storage::LocalBlobStorage;

/// 2025-03-03 10:00 in the library's default +05:30 offset.
pub fn opening_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 4, 30, 0).unwrap()
}

/// Test application wrapper
pub struct TestApp {
    /// Axum router for making requests
    pub router: Router,
    /// Backing store, for seeding and direct inspection
    pub store: MemoryStore,
    /// Clock every handler reads `now` from
    pub clock: Arc<ManualClock>,
    /// Seeded admin
    pub admin: User,
    /// Seeded student
    pub student: User,
    encoder: JwtEncoder,
    _resources_dir: TempDir,
}

impl TestApp {
    /// Create a new test application with default settings
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default config
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let resources_dir = TempDir::new().expect("Failed to create resources dir");

        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.storage.resources_root = resources_dir.path().to_string_lossy().into_owned();
        adjust(&mut config);

        let store = MemoryStore::new();
        let admin = user("Librarian", UserRole::Admin, None);
        let student = user("Asha Rao", UserRole::Student, Some("21CSE042"));
        store.insert_user(admin.clone()).await;
        store.insert_user(student.clone()).await;
        for id in ["B1", "B2", "B3", "B4", "B5"] {
            store.insert_book(book(id, 2)).await;
        }

        let storage = LocalBlobStorage::new(&config.storage.resources_root)
            .await
            .expect("Failed to create blob storage");
        let clock = Arc::new(ManualClock::new(opening_time()));
        let encoder = JwtEncoder::new(&config.auth);

        let state = AppState::new(
            config,
            LibraryStore::memory(store.clone()),
            Arc::new(storage),
            clock.clone(),
            Arc::new(LoggingNotifier),
        )
        .expect("Failed to build app state");

        Self {
            router: build_app(state),
            store,
            clock,
            admin,
            student,
            encoder,
            _resources_dir: resources_dir,
        }
    }

    /// Seed another student
    pub async fn add_student(&self, name: &str, roll_number: &str) -> User {
        let student = user(name, UserRole::Student, Some(roll_number));
        self.store.insert_user(student.clone()).await;
        student
    }

    /// Seed another book
    pub async fn add_book(&self, catalog_id: &str, copies: i32, status: BookStatus) -> Book {
        let book = Book {
            status,
            ..book(catalog_id, copies)
        };
        self.store.insert_book(book.clone()).await;
        book
    }

    /// Sign an access token for `user`
    pub fn token_for(&self, user: &User) -> String {
        self.encoder
            .encode(
                user.id,
                user.role,
                &user.name,
                user.roll_number.as_deref(),
                Duration::hours(1),
            )
            .expect("Failed to sign token")
    }

    pub fn admin_token(&self) -> String {
        self.token_for(&self.admin)
    }

    pub fn student_token(&self) -> String {
        self.token_for(&self.student)
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        self.send(method, path, "application/json", body_str.into_bytes(), token)
            .await
    }

    /// Make an HTTP request with a raw body
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, content_type);

        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 10 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            bytes: bytes.to_vec(),
        }
    }

    /// Borrow `book_id` for the seeded student, asserting success
    pub async fn borrow(&self, book_id: &str, due_date: &str) -> Value {
        let body = serde_json::json!({
            "studentId": self.student.id,
            "bookId": book_id,
            "dueDate": due_date,
        });
        let response = self
            .request(
                "POST",
                "/borrow-records/borrow",
                Some(body),
                Some(&self.admin_token()),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Borrow failed: {:?}",
            response.body
        );
        response.body
    }

    /// Current availability of a seeded book
    pub async fn available(&self, catalog_id: &str) -> i32 {
        BookStore::find_by_catalog_id(&self.store, catalog_id)
            .await
            .expect("Failed to read book")
            .expect("Book not seeded")
            .available
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: axum::http::HeaderMap,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Raw body
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// The `message` field of an error body
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

fn user(name: &str, role: UserRole, roll_number: Option<&str>) -> User {
    User {
        id: Uuid::now_v7(),
        name: name.to_string(),
        role,
        roll_number: roll_number.map(str::to_string),
        branch: roll_number.map(|_| "CSE".to_string()),
        email: None,
        created_at: opening_time(),
    }
}

fn book(catalog_id: &str, copies: i32) -> Book {
    Book {
        catalog_id: catalog_id.to_string(),
        title: format!("Title {catalog_id}"),
        isbn: None,
        categories: vec!["Computing".to_string()],
        rack: Some("A1".to_string()),
        book_type: None,
        total_copies: copies,
        available: copies,
        status: BookStatus::Available,
        times_loaned: 0,
        last_borrowed: None,
        created_at: opening_time(),
        updated_at: opening_time(),
    }
}
