use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use ranque_auth::AccessTokenClaims;
use ranque_core::AppError;
use uuid::Uuid;

use crate::state::AppState;

/// Extractor that validates the bearer access token, expiry included, and
/// provides its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessTokenClaims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.claims.sub).map_err(|_| AppError::InvalidToken)
    }

    pub fn user_name(&self) -> &str {
        &self.0.claims.name
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("Missing or malformed authorization header"))?;

        let claims = state.auth.verify_access_token(bearer.token())?;

        Ok(AuthUser(claims))
    }
}
