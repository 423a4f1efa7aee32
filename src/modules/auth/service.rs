//! Authentication service: registration, credential validation, token
//! issuing and refresh-token rotation.
//!
//! Login path: [`AuthService::validate_user`] → [`build_claims`] →
//! [`AuthService::create_token`].
//!
//! Refresh path: [`AuthService::refresh_token`] validates the presented
//! access token with the expiry check suppressed, resolves the subject
//! name, checks the stored session, then reissues through
//! [`AuthService::create_token`] without extending the refresh window.

use std::fmt;
use std::sync::{Arc, LazyLock};

use ranque_auth::{
    AccessTokenClaims, ExpiryCheck, SigningCredentials, build_claims, create_access_token,
    generate_refresh_token, signing_credentials, validate_access_token,
};
use ranque_config::JwtConfig;
use ranque_core::{AppError, Clock, FieldError, SystemClock, hash_password, verify_password};
use ranque_db::{RoleStore, UserStore};
use ranque_models::{
    Credentials, NewUser, RegisterRequest, SessionRejection, TokenPair, User, UserProfile,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::policy;
use crate::metrics;

/// Verified against when the user name is unknown, so both failure
/// outcomes cost one bcrypt verification.
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("ranque-dummy-password").ok());

/// Internal reason a refresh attempt was rejected. Logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshRejection {
    InvalidAccessToken,
    MissingSubject,
    UnknownUser,
    Session(SessionRejection),
}

impl RefreshRejection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidAccessToken => "invalid_access_token",
            Self::MissingSubject => "missing_subject",
            Self::UnknownUser => "unknown_user",
            Self::Session(rejection) => rejection.as_str(),
        }
    }

    fn into_error(self) -> AppError {
        warn!(reason = self.as_str(), "refresh_token: request rejected");
        metrics::track_refresh_rejected(self.as_str());
        match self {
            Self::InvalidAccessToken => AppError::InvalidToken,
            _ => AppError::RefreshTokenInvalid,
        }
    }
}

/// Which grant produced a token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grant {
    Password,
    Refresh,
}

impl Grant {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Refresh => "refresh_token",
        }
    }

    /// Only a password login opens a new refresh window.
    fn populates_refresh_expiry(&self) -> bool {
        matches!(self, Self::Password)
    }
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    config: JwtConfig,
    credentials: SigningCredentials,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Builds the service on the system clock.
    ///
    /// # Errors
    ///
    /// [`AppError::Configuration`] if the signing secret is unusable.
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        config: JwtConfig,
    ) -> Result<Self, AppError> {
        Self::with_clock(users, roles, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        config: JwtConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let credentials = signing_credentials(&config)?;
        Ok(Self {
            users,
            roles,
            config,
            credentials,
            clock,
        })
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn signing_credentials(&self) -> &SigningCredentials {
        &self.credentials
    }

    /// Registers a user and assigns the requested roles.
    ///
    /// All rule violations are collected and returned together as
    /// [`AppError::Registration`].
    #[instrument(skip_all, fields(user_name = %request.user_name))]
    pub async fn register_user(&self, request: RegisterRequest) -> Result<User, AppError> {
        let mut errors: Vec<FieldError> = Vec::new();

        errors.extend(policy::check_user_name(&request.user_name));
        errors.extend(policy::check_password(&request.password));

        for role in &request.roles {
            if !self.roles.role_exists(role).await? {
                errors.push(FieldError::new(
                    "InvalidRoleName",
                    format!("Role '{}' does not exist.", role),
                ));
            }
        }

        if self.users.find_by_name(&request.user_name).await?.is_some() {
            errors.push(FieldError::new(
                "DuplicateUserName",
                format!("Username '{}' is already taken.", request.user_name),
            ));
        }

        if !errors.is_empty() {
            warn!(failures = errors.len(), "register_user: registration rejected");
            return Err(AppError::Registration(errors));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                user_name: request.user_name,
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password_hash,
            })
            .await?;

        if !request.roles.is_empty() {
            self.roles.add_to_roles(&user, &request.roles).await?;
        }

        info!(user_id = %user.id, "user registered");
        metrics::track_user_registered();

        Ok(user)
    }

    /// Checks credentials against the store.
    ///
    /// Returns the resolved user on success and `None` for an unknown user
    /// name or a wrong password alike. Only store failures are errors.
    #[instrument(skip_all)]
    pub async fn validate_user(&self, credentials: &Credentials) -> Result<Option<User>, AppError> {
        let user = self.users.find_by_name(&credentials.user_name).await?;

        let verified = match &user {
            Some(user) => self
                .users
                .check_password(user, &credentials.password)
                .await
                .unwrap_or_else(|e| {
                    error!(error = %e, "validate_user: stored password hash is unusable");
                    false
                }),
            None => {
                if let Some(dummy) = DUMMY_PASSWORD_HASH.as_deref() {
                    let _ = verify_password(&credentials.password, dummy);
                }
                false
            }
        };

        if !verified {
            warn!("validate_user: authentication failed, wrong user name or password");
            metrics::track_login_failure();
            return Ok(None);
        }

        Ok(user)
    }

    /// Password login: validates credentials and issues a pair that opens a
    /// new refresh window.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: Credentials) -> Result<TokenPair, AppError> {
        let user = self
            .validate_user(&credentials)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        drop(credentials);

        let pair = self.issue(user, Grant::Password).await?;
        metrics::track_login_success();
        Ok(pair)
    }

    /// Issues a new access/refresh pair for `user` and persists the new
    /// refresh token, overwriting the previous one.
    ///
    /// When `populate_exp` is true the refresh window is reset to
    /// now + the configured refresh lifetime; otherwise the stored expiry is kept.
    ///
    /// # Errors
    ///
    /// [`AppError::Persistence`] if the session cannot be stored. No token is
    /// returned in that case.
    pub async fn create_token(&self, user: User, populate_exp: bool) -> Result<TokenPair, AppError> {
        let grant = if populate_exp {
            Grant::Password
        } else {
            Grant::Refresh
        };
        self.issue(user, grant).await
    }

    #[instrument(skip_all, fields(user_id = %user.id, grant = grant.as_str()))]
    async fn issue(&self, mut user: User, grant: Grant) -> Result<TokenPair, AppError> {
        let roles = self.roles.roles_of(&user).await?;
        let claims = build_claims(&user, &roles);
        let now = self.clock.now();

        let access_token = create_access_token(&claims, &self.credentials, &self.config, now)?;
        let refresh_token = generate_refresh_token();

        let expiry = if grant.populates_refresh_expiry() {
            let expiry = now
                .checked_add_signed(self.config.refresh_token_lifetime())
                .ok_or_else(|| {
                    AppError::internal(anyhow::anyhow!("Refresh token expiry overflowed"))
                })?;
            Some(expiry)
        } else {
            None
        };
        user.session.rotate(refresh_token.clone(), expiry);
        self.users.update_session(user.id, &user.session).await?;

        info!("token pair issued");
        metrics::track_token_issued(grant.as_str());

        Ok(TokenPair {
            access_token,
            refresh_token,
            user_name: user.user_name,
        })
    }

    /// Exchanges an (expired) access token and its refresh token for a new pair.
    ///
    /// The presented refresh token is consumed: after success it no longer
    /// matches the stored session. Rejections leave the session untouched.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidToken`] if the access token fails signature,
    ///   algorithm, issuer or audience checks
    /// - [`AppError::RefreshTokenInvalid`] if the subject is missing or
    ///   unknown, the refresh token does not match, or the window has closed
    /// - [`AppError::Persistence`] if the store fails
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, pair: TokenPair) -> Result<TokenPair, AppError> {
        let now = self.clock.now();

        let payload = validate_access_token(
            &pair.access_token,
            &self.credentials,
            &self.config,
            now,
            ExpiryCheck::Skip,
        )
        .map_err(|_| RefreshRejection::InvalidAccessToken.into_error())?;

        let user_name = payload.claims.name.as_str();
        if user_name.is_empty() {
            return Err(RefreshRejection::MissingSubject.into_error());
        }

        let user = self
            .users
            .find_by_name(user_name)
            .await?
            .ok_or_else(|| RefreshRejection::UnknownUser.into_error())?;

        user.session
            .check(&pair.refresh_token, now)
            .map_err(|rejection| RefreshRejection::Session(rejection).into_error())?;

        self.issue(user, Grant::Refresh).await
    }

    /// Validates an access token for a resource request, expiry included.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, AppError> {
        validate_access_token(
            token,
            &self.credentials,
            &self.config,
            self.clock.now(),
            ExpiryCheck::Enforce,
        )
    }

    #[instrument(skip(self))]
    pub async fn get_authenticated_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn user_profile(&self, user: &User) -> Result<UserProfile, AppError> {
        let roles = self.roles.roles_of(user).await?;
        Ok(UserProfile::new(user, roles))
    }
}
