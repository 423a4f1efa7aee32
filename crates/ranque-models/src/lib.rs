//! # Ranque Models
//!
//! Domain models and DTOs shared between the stores, the token core and
//! the HTTP boundary.
//!
//! - [`users`]: the [`User`] identity record and its public [`UserProfile`]
//! - [`session`]: the mutable refresh-token fields anchoring rotation
//! - [`auth`]: login, registration and token-pair payloads

pub mod auth;
pub mod session;
pub mod users;

// Re-export commonly used types at crate root
pub use auth::{Credentials, RegisterRequest, TokenPair};
pub use session::{SessionRejection, SessionState};
pub use users::{NewUser, User, UserProfile};
