//! PostgreSQL store.
//!
//! Queries are checked at runtime (`query_as` with [`FromRow`](sqlx::FromRow))
//! so the crate builds without a live database. The schema lives in
//! `migrations/` and is applied with [`PgStore::migrate`].

use async_trait::async_trait;
use ranque_core::AppError;
use ranque_models::{NewUser, SessionState, User};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::store::{RoleStore, UserStore, duplicate_user_name, normalize_name};

const USER_COLUMNS: &str = "id, user_name, email, first_name, last_name, password_hash, \
     refresh_token, refresh_token_expiry_time, created_at";

fn db_error(err: sqlx::Error) -> AppError {
    AppError::persistence(err)
}

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(AppError::persistence)
    }
}

#[async_trait]
impl UserStore for PgStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE normalized_user_name = $1",
            USER_COLUMNS
        ))
        .bind(normalize_name(user_name))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    #[instrument(skip_all, fields(user_name = %user.user_name))]
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, user_name, normalized_user_name, email, first_name, last_name, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.user_name)
        .bind(normalize_name(&user.user_name))
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            let duplicate = err
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if duplicate {
                duplicate_user_name(&user.user_name)
            } else {
                db_error(err)
            }
        })
    }

    #[instrument(skip(self, session))]
    async fn update_session(&self, user_id: Uuid, session: &SessionState) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $2, refresh_token_expiry_time = $3 WHERE id = $1",
        )
        .bind(user_id)
        .bind(&session.refresh_token)
        .bind(session.refresh_token_expiry_time)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::persistence(anyhow::anyhow!(
                "user {} does not exist",
                user_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for PgStore {
    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn roles_of(&self, user: &User) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM roles r \
             INNER JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 \
             ORDER BY r.name",
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    #[instrument(skip(self))]
    async fn role_exists(&self, role: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM roles WHERE normalized_name = $1)",
        )
        .bind(normalize_name(role))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn add_to_roles(&self, user: &User, roles: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for role in roles {
            let inserted = sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) \
                 SELECT $1, id FROM roles WHERE normalized_name = $2 \
                 ON CONFLICT DO NOTHING",
            )
            .bind(user.id)
            .bind(normalize_name(role))
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

            if inserted.rows_affected() == 0 && !self.role_exists(role).await? {
                return Err(AppError::not_found(format!("Role '{}' does not exist.", role)));
            }
        }

        tx.commit().await.map_err(db_error)
    }
}
