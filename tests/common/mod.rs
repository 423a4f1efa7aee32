#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use chrono::{TimeZone, Utc};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use ranque::modules::auth::service::AuthService;
use ranque::router::init_router;
use ranque::state::AppState;
use ranque_config::{CorsConfig, JwtConfig};
use ranque_core::{AppError, ManualClock};
use ranque_db::{MemoryStore, RoleStore, UserStore};
use ranque_models::{Credentials, NewUser, RegisterRequest, SessionState, User};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-key-32-bytes-min";
pub const TEST_PASSWORD: &str = "Str0ng!pass";

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET).unwrap()
}

/// Fixed start instant so expiry arithmetic is reproducible.
pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
    ))
}

pub struct TestContext {
    pub service: Arc<AuthService>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn setup() -> TestContext {
    let store = Arc::new(MemoryStore::with_roles([
        "Administrator",
        "Manager",
        "Participant",
    ]));
    let clock = test_clock();
    let service = AuthService::with_clock(store.clone(), store.clone(), jwt_config(), clock.clone())
        .unwrap();

    TestContext {
        service: Arc::new(service),
        store,
        clock,
    }
}

pub fn setup_test_app(ctx: &TestContext) -> Router {
    let state = AppState {
        auth: ctx.service.clone(),
        cors_config: CorsConfig::parse("http://localhost:5173"),
        metrics: None,
    };
    init_router(state)
}

pub fn generate_unique_user_name() -> String {
    format!(
        "{}_{}",
        FirstName()
            .fake::<String>()
            .to_lowercase()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>(),
        &Uuid::new_v4().simple().to_string()[..8]
    )
}

pub fn register_request(user_name: &str) -> RegisterRequest {
    RegisterRequest {
        first_name: Some(FirstName().fake()),
        last_name: Some(LastName().fake()),
        user_name: user_name.to_string(),
        email: format!("{}@example.com", user_name),
        password: TEST_PASSWORD.to_string(),
        roles: vec!["Participant".to_string()],
    }
}

pub async fn create_test_user(ctx: &TestContext, user_name: &str) -> User {
    ctx.service
        .register_user(register_request(user_name))
        .await
        .unwrap()
}

pub fn credentials(user_name: &str, password: &str) -> Credentials {
    Credentials {
        user_name: user_name.to_string(),
        password: password.to_string(),
    }
}

/// Credential store whose session writes can be made to fail.
pub struct FlakyStore {
    pub inner: Arc<MemoryStore>,
    pub fail_session_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fail_session_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_session_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for FlakyStore {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        self.inner.find_by_name(user_name).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        self.inner.create(user).await
    }

    async fn update_session(&self, user_id: Uuid, session: &SessionState) -> Result<(), AppError> {
        if self.fail_session_writes.load(Ordering::SeqCst) {
            return Err(AppError::persistence(anyhow::anyhow!(
                "connection reset by peer"
            )));
        }
        self.inner.update_session(user_id, session).await
    }
}

pub struct FlakyContext {
    pub service: AuthService,
    pub store: Arc<FlakyStore>,
    pub clock: Arc<ManualClock>,
}

pub fn setup_flaky() -> FlakyContext {
    let memory = Arc::new(MemoryStore::with_roles(["Participant"]));
    let store = Arc::new(FlakyStore::new(memory.clone()));
    let roles: Arc<dyn RoleStore> = memory;
    let clock = test_clock();
    let service = AuthService::with_clock(store.clone(), roles, jwt_config(), clock.clone()).unwrap();

    FlakyContext {
        service,
        store,
        clock,
    }
}
