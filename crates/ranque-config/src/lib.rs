//! # Ranque Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: signing secret, issuer/audience and token lifetimes
//! - [`cors`]: CORS origins for the authentication endpoints
//! - [`server`]: listener address and storage selection
//!
//! # Example
//!
//! ```ignore
//! use ranque_config::{CorsConfig, JwtConfig, ServerConfig};
//!
//! // Fails fast when RANQUE_SECRET is missing
//! let jwt_config = JwtConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
