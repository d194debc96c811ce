#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        let config = sethiarworks::config::jwt::JwtConfig::from_env().unwrap();
        let _ = sethiarworks::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        sethiarworks::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    cleanup_tables(&db).await;

    let email_service = sethiarworks::services::email::EmailService::from_env();
    let meeting_service = sethiarworks::services::meeting::MeetingService::from_env();

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(sethiarworks::routes::create_routes())
        .layer(axum::middleware::from_fn(
            sethiarworks::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(email_service))
        .layer(axum::extract::Extension(meeting_service));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let addr_str = format!("http://{}", addr);
    let client = Client::new();

    TestApp {
        addr: addr_str,
        db,
        client,
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    // Reverse dependency order.
    let tables = [
        "comment_likes",
        "replies",
        "comments",
        "subjects",
        "chat_requests",
        "devis_requests",
        "anonymous_visits",
        "admins",
        "users",
    ];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Register a user and return (user_id, token).
pub async fn create_test_user(app: &TestApp, username_prefix: &str) -> (i32, String) {
    static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let unique_username = format!("{}_{}", username_prefix, counter);

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": unique_username,
            "email": format!("{}@test.com", unique_username),
            "password": "test_password_123",
            "date_of_birth": "1990-05-15"
        }))
        .send()
        .await
        .expect("Failed to register user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_else(|e| {
        panic!(
            "Failed to parse register response for user '{}': status={}, error={}",
            unique_username, status, e
        );
    });

    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to register user '{}': status={}, body={}",
            unique_username, status, body
        );
    }

    let user_id = body["data"]["id"].as_i64().unwrap_or_else(|| {
        panic!("Response missing id for user '{}': {:?}", unique_username, body)
    }) as i32;
    let token = body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| {
            panic!(
                "Response missing token for user '{}': {:?}",
                unique_username, body
            )
        })
        .to_string();
    (user_id, token)
}

/// Insert an admin account directly and log it in. Returns (admin_id, token).
pub async fn create_test_admin(app: &TestApp) -> (i32, String) {
    static ADMIN_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = ADMIN_COUNTER.fetch_add(1, Ordering::SeqCst);
    let username = format!("admin_{}", counter);

    let password_hash =
        sethiarworks::utils::hash_password("admin_password_123").expect("Failed to hash password");

    let admin = sethiarworks::models::admin::ActiveModel {
        username: sea_orm::ActiveValue::Set(username.clone()),
        email: sea_orm::ActiveValue::Set(Some(format!("{}@test.com", username))),
        role: sea_orm::ActiveValue::Set("admin".to_string()),
        password_hash: sea_orm::ActiveValue::Set(password_hash),
        profile_photo: sea_orm::ActiveValue::Set(None),
        ..Default::default()
    };
    let admin = admin.insert(&app.db).await.expect("Failed to insert admin");

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "username": username,
            "password": "admin_password_123"
        }))
        .send()
        .await
        .expect("Failed to log in admin");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse admin login");
    let token = body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("Admin login missing token: {:?}", body))
        .to_string();

    (admin.id, token)
}

/// Create a forum subject and return its id.
pub async fn create_test_subject(app: &TestApp, token: &str, title: &str) -> i32 {
    let resp = app
        .client
        .post(app.url("/forum/subjects"))
        .bearer_auth(token)
        .json(&serde_json::json!({ "title": title }))
        .send()
        .await
        .expect("Failed to create subject");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create subject: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("Subject missing id") as i32
}

/// Submit a chat request for the given user token and return its id.
pub async fn create_test_chat_request(app: &TestApp, token: &str) -> i32 {
    let resp = app
        .client
        .post(app.url("/chat/requests"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "content": "I would like to discuss a project",
            "requested_date": "2030-06-01",
            "requested_time": "14:00:00"
        }))
        .send()
        .await
        .expect("Failed to create chat request");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to create chat request: status={}, body={}",
            status, body
        );
    }

    body["data"]["id"].as_i64().expect("Request missing id") as i32
}
