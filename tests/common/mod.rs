#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement, Value};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Once,
};
use tokio::sync::{Mutex, MutexGuard};
use worktrack::config::status_policy::StatusPolicy;
use worktrack::services::action_log::ActionLogger;
use worktrack::services::creator::CreatorKind;
use worktrack::services::upload::UploadConfig;

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);
/// Tests in one binary share the database; each holds this for its lifetime.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        let config = worktrack::config::jwt::JwtConfig::from_env().unwrap();
        let _ = worktrack::utils::jwt::init_jwt_config(config);
    });
}

fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
    pub upload_dir: std::path::PathBuf,
    _guard: MutexGuard<'static, ()>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.addr, path)
    }

    pub async fn exec(&self, sql: &str, values: Vec<Value>) {
        self.db
            .execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                sql,
                values,
            ))
            .await
            .unwrap();
    }

    /// Runs a statement returning one `id` column.
    pub async fn query_id(&self, sql: &str, values: Vec<Value>) -> i32 {
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                sql,
                values,
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "id").unwrap()
    }

    pub async fn count(&self, sql: &str) -> i64 {
        let row = self
            .db
            .query_one(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql.to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get_by_index(0).unwrap()
    }
}

/// Starts the router on an ephemeral port against a clean database.
/// Returns `None` when no database is configured so the suite can be skipped.
pub async fn spawn_app() -> Option<TestApp> {
    init_env();

    let Some(database_url) = database_url() else {
        eprintln!("skipping integration test: TEST_DATABASE_URL / DATABASE_URL not set");
        return None;
    };

    let guard = DB_LOCK.lock().await;

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        worktrack::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    cleanup_tables(&db).await;

    let upload_dir = std::env::temp_dir().join(format!("worktrack-test-{}", uuid::Uuid::new_v4()));
    let upload_config = UploadConfig {
        upload_dir: upload_dir.to_string_lossy().to_string(),
    };

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(worktrack::routes::create_routes())
        .layer(axum::extract::Extension(ActionLogger::new(db.clone())))
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(upload_config))
        .layer(axum::extract::Extension(StatusPolicy::Free));

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

    Some(TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
        upload_dir,
        _guard: guard,
    })
}

async fn cleanup_tables(db: &DatabaseConnection) {
    // status keeps its seeded rows
    let tables = [
        "action_logs",
        "work_request_media",
        "request_assign_smagent",
        "work_requests",
        "complaints",
        "complaint_subtypes",
        "complaint_types",
        "subtown",
        "town",
        "users",
        "agents",
        "socialmediaperson",
    ];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Bearer token for an identity.
pub fn token_for(actor: CreatorKind, id: i32, role: &str) -> String {
    worktrack::utils::jwt::encode_access_token(actor, id, role).unwrap()
}

pub async fn create_user(app: &TestApp, name: &str) -> i32 {
    app.query_id(
        "INSERT INTO users (name, role) VALUES ($1, 'user') RETURNING id",
        vec![name.into()],
    )
    .await
}

pub async fn create_agent(app: &TestApp, name: &str, role: &str) -> i32 {
    app.query_id(
        "INSERT INTO agents (name, role) VALUES ($1, $2) RETURNING id",
        vec![name.into(), role.into()],
    )
    .await
}

pub async fn create_sm_agent(app: &TestApp, name: &str, role: &str) -> i32 {
    app.query_id(
        "INSERT INTO socialmediaperson (name, role) VALUES ($1, $2) RETURNING id",
        vec![name.into(), role.into()],
    )
    .await
}

pub struct Lookups {
    pub town_id: i32,
    pub subtown_id: i32,
    pub other_town_id: i32,
    pub complaint_type_id: i32,
    pub complaint_subtype_id: i32,
}

pub async fn seed_lookups(app: &TestApp) -> Lookups {
    let town_id = app
        .query_id(
            "INSERT INTO town (name) VALUES ('Gulshan') RETURNING id",
            vec![],
        )
        .await;
    let other_town_id = app
        .query_id(
            "INSERT INTO town (name) VALUES ('Saddar') RETURNING id",
            vec![],
        )
        .await;
    let subtown_id = app
        .query_id(
            "INSERT INTO subtown (town_id, name) VALUES ($1, 'Block 13') RETURNING id",
            vec![town_id.into()],
        )
        .await;
    let complaint_type_id = app
        .query_id(
            "INSERT INTO complaint_types (type_name) VALUES ('Water Supply') RETURNING id",
            vec![],
        )
        .await;
    let complaint_subtype_id = app
        .query_id(
            "INSERT INTO complaint_subtypes (complaint_type_id, subtype_name) \
             VALUES ($1, 'Pipe Burst') RETURNING id",
            vec![complaint_type_id.into()],
        )
        .await;

    Lookups {
        town_id,
        subtown_id,
        other_town_id,
        complaint_type_id,
        complaint_subtype_id,
    }
}

pub async fn status_id(app: &TestApp, name: &str) -> i32 {
    app.query_id("SELECT id FROM status WHERE name = $1", vec![name.into()])
        .await
}

pub fn request_body(lookups: &Lookups, creator_type: &str, creator_id: i32) -> serde_json::Value {
    json!({
        "town_id": lookups.town_id,
        "subtown_id": lookups.subtown_id,
        "complaint_type_id": lookups.complaint_type_id,
        "complaint_subtype_id": lookups.complaint_subtype_id,
        "contact_number": "03001234567",
        "address": "House 12, Street 4",
        "description": "Main line leaking",
        "creator_id": creator_id,
        "creator_type": creator_type,
    })
}

/// Creates a request through the API and returns its id.
pub async fn create_request(app: &TestApp, token: &str, body: serde_json::Value) -> i32 {
    let resp = app
        .client
        .post(app.url("/requests"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(status, 201, "create failed: {}", body);
    body["id"].as_i64().unwrap() as i32
}

pub async fn get_detail(app: &TestApp, token: &str, id: i32) -> serde_json::Value {
    let resp = app
        .client
        .get(app.url(&format!("/requests?id={}", id)))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}
