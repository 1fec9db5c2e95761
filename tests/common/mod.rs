use std::sync::{Arc, Mutex};

use alumni_portal::config::{init_db, run_migrations, DbPool};
use alumni_portal::modules::auth::interface::AccountRepository;
use alumni_portal::modules::profile::interface::BiodataRepository;
use alumni_portal::services::jwt::JwtService;
use alumni_portal::services::mailer::{MailError, Mailer, OutgoingMail};
use alumni_portal::store::{MemoryStore, MySqlStore};
use alumni_portal::AppState;
use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Keeps every mail the app sends so tests can pull reset links out of them.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

#[allow(dead_code)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Raw token from the reset link in the most recent mail.
    pub fn last_token(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let mail = sent.last().expect("no mail was sent");
        let (_, rest) = mail.text_body.split_once("token=").expect("mail has no reset link");
        rest.split_whitespace().next().unwrap().to_string()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

#[allow(dead_code)]
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: OutgoingMail) -> Result<(), MailError> {
        Err(MailError::NotConfigured("relay unreachable"))
    }
}

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let server = build_server(store.clone(), store.clone(), mailer.clone(), true).await;

        Self { server, store, mailer }
    }

    pub async fn register_user(&self) -> (String, String, i64) {
        register_user(&self.server).await
    }
}

/// Same app wired to MySQL. Only available when `TEST_DATABASE_URL` is set;
/// accounts are keyed by unique emails and removed again in `cleanup`.
#[allow(dead_code)]
pub struct MySqlTestContext {
    pub server: TestServer,
    pub store: Arc<MySqlStore>,
    pub db: DbPool,
    pub mailer: Arc<RecordingMailer>,
}

#[allow(dead_code)]
impl MySqlTestContext {
    pub async fn connect() -> Option<Self> {
        dotenvy::dotenv().ok();

        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping MySQL test");
            return None;
        };

        let db = init_db(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        // Run migrations
        run_migrations(&db).await.expect("Failed to run migrations");

        let store = Arc::new(MySqlStore::new(db.clone()));
        let mailer = Arc::new(RecordingMailer::default());
        let server = build_server(store.clone(), store.clone(), mailer.clone(), true).await;

        Some(Self {
            server,
            store,
            db,
            mailer,
        })
    }

    pub async fn register_user(&self) -> (String, String, i64) {
        register_user(&self.server).await
    }

    /// Removes the accounts; their biodata goes with them.
    pub async fn cleanup(&self, emails: &[&str]) {
        for email in emails {
            sqlx::query("DELETE FROM accounts WHERE email = ?")
                .bind(email)
                .execute(&self.db)
                .await
                .ok();
        }
    }
}

/// Registers a fresh account and returns (email, session token, user id).
#[allow(dead_code)]
pub async fn register_user(server: &TestServer) -> (String, String, i64) {
    let email = test_email();
    let response = server
        .post("/auth/register")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await;
    let body: Value = response.json();

    (
        email,
        body["token"].as_str().unwrap().to_string(),
        body["userId"].as_i64().unwrap(),
    )
}

#[allow(dead_code)]
pub async fn build_server(
    accounts: Arc<dyn AccountRepository>,
    biodata: Arc<dyn BiodataRepository>,
    mailer: Arc<dyn Mailer>,
    expose_error_details: bool,
) -> TestServer {
    let state = AppState {
        accounts,
        biodata,
        jwt_service: JwtService::new(TEST_JWT_SECRET.to_string()),
        mailer,
        public_url: "http://localhost:3000".to_string(),
        expose_error_details,
    };

    let app = alumni_portal::create_app(state).await;
    TestServer::new(app).expect("Failed to create test server")
}

// Helper to generate unique test email
#[allow(dead_code)]
pub fn test_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

// Helper to generate test password
#[allow(dead_code)]
pub fn test_password() -> &'static str {
    "TestPassword123!"
}

#[allow(dead_code)]
pub fn complete_biodata() -> Value {
    json!({
        "surname": "Doe",
        "middle_name": "Q",
        "second_name": "Jane",
        "age": 30,
        "marital_status": "Single",
        "gender": "Female",
        "telephone": "555-0100",
        "address": "1 Main St",
        "next_of_kin": "John Doe",
        "email": "jane@x.org"
    })
}
