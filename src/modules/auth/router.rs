use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_current_user, login_user, refresh_token, register_user};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/login", post(login_user))
        .route("/me", get(get_current_user))
}

pub fn init_token_router() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh_token))
}
