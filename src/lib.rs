//! # Ranque
//!
//! Credential and token lifecycle service. Users log in with a user name
//! and password and receive a short-lived signed access token plus an
//! opaque refresh token. The pair can be exchanged for a new one after the
//! access token expires; each exchange consumes the presented refresh token.
//!
//! The token primitives live in `ranque-auth`, the stores in `ranque-db`.
//! This crate wires them into [`AuthService`](modules::auth::service::AuthService)
//! and the axum HTTP boundary.

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use ranque_auth;
pub use ranque_config;
pub use ranque_core;
pub use ranque_db;
pub use ranque_models;
