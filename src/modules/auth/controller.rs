use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use ranque_core::AppError;
use ranque_models::{Credentials, RegisterRequest, TokenPair, UserProfile};
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Registration failures grouped by code, e.g. `{"errors": {"DuplicateUserName": ["..."]}}`
#[derive(ToSchema)]
pub struct RegistrationErrorResponse {
    #[schema(value_type = Object)]
    pub errors: serde_json::Value,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserProfile),
        (status = 400, description = "Registration rejected", body = RegistrationErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let user = state.auth.register_user(dto).await?;
    let profile = state.auth.user_profile(&user).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Log in with user name and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = TokenPair),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = state.auth.login(credentials).await?;
    Ok(Json(pair))
}

/// Exchange an expired access token and its refresh token for a new pair
#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = TokenPair,
    responses(
        (status = 200, description = "New token pair issued", body = TokenPair),
        (status = 400, description = "Refresh token does not match or has expired", body = ErrorResponse),
        (status = 401, description = "Access token is invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Token"
)]
#[instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(pair): ValidatedJson<TokenPair>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = state.auth.refresh_token(pair).await?;
    Ok(Json(pair))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Missing, invalid or expired access token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(user_name = %auth_user.user_name()))]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .auth
        .get_authenticated_user(auth_user.user_id()?)
        .await?;
    let profile = state.auth.user_profile(&user).await?;
    Ok(Json(profile))
}
