//! In-memory store used by tests and by the server when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use ranque_core::AppError;
use ranque_models::{NewUser, SessionState, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{RoleStore, UserStore, duplicate_user_name, normalize_name};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    /// normalised user name -> id
    names: HashMap<String, Uuid>,
    roles: Vec<String>,
    memberships: HashMap<Uuid, Vec<String>>,
}

/// Credential and role store backed by process memory.
///
/// Every write takes the single lock, so an `update_session` call is atomic
/// with respect to concurrent readers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given roles defined.
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inner = Inner {
            roles: roles.into_iter().map(Into::into).collect(),
            ..Inner::default()
        };
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .names
            .get(&normalize_name(user_name))
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        let normalized = normalize_name(&user.user_name);
        if inner.names.contains_key(&normalized) {
            return Err(duplicate_user_name(&user.user_name));
        }

        let created = User {
            id: Uuid::new_v4(),
            user_name: user.user_name,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            session: SessionState::default(),
            created_at: Utc::now(),
        };
        inner.names.insert(normalized, created.id);
        inner.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update_session(&self, user_id: Uuid, session: &SessionState) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&user_id).ok_or_else(|| {
            AppError::persistence(anyhow::anyhow!("user {} does not exist", user_id))
        })?;
        user.session = session.clone();
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn roles_of(&self, user: &User) -> Result<Vec<String>, AppError> {
        Ok(self
            .inner
            .read()
            .await
            .memberships
            .get(&user.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn role_exists(&self, role: &str) -> Result<bool, AppError> {
        let normalized = normalize_name(role);
        Ok(self
            .inner
            .read()
            .await
            .roles
            .iter()
            .any(|r| normalize_name(r) == normalized))
    }

    async fn add_to_roles(&self, user: &User, roles: &[String]) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;

        let mut resolved = Vec::with_capacity(roles.len());
        for role in roles {
            let normalized = normalize_name(role);
            let canonical = inner
                .roles
                .iter()
                .find(|r| normalize_name(r) == normalized)
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("Role '{}' does not exist.", role)))?;
            resolved.push(canonical);
        }

        let memberships = inner.memberships.entry(user.id).or_default();
        for role in resolved {
            if !memberships.contains(&role) {
                memberships.push(role);
            }
        }
        Ok(())
    }
}
