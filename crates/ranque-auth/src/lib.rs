//! # Ranque Auth
//!
//! Token primitives for the Ranque API.
//!
//! This crate provides:
//!
//! - [`signing`]: signing credentials derived from the process-wide secret
//! - [`claims`]: the claim set built for a user at issue time
//! - [`jwt`]: access token creation and the single validation routine
//! - [`refresh`]: opaque refresh token generation
//!
//! # Token Types
//!
//! - **Access token**: short-lived signed JWT carrying identity and role claims
//! - **Refresh token**: 256-bit random bearer secret with no embedded
//!   structure, matched against the user's stored session state
//!
//! # Example
//!
//! ```ignore
//! use ranque_auth::{ExpiryCheck, build_claims, create_access_token, signing_credentials, validate_access_token};
//! use ranque_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let credentials = signing_credentials(&config)?;
//!
//! let token = create_access_token(&build_claims(&user, &roles), &credentials, &config, now)?;
//!
//! // Refresh path: everything but exp is checked
//! let payload = validate_access_token(&token, &credentials, &config, now, ExpiryCheck::Skip)?;
//! println!("subject: {}", payload.claims.name);
//! ```

pub mod claims;
pub mod jwt;
pub mod refresh;
pub mod signing;

// Re-export commonly used types at crate root
pub use claims::{AccessTokenClaims, ClaimType, Claims, build_claims};
pub use jwt::{
    ExpiryCheck, create_access_token, validate_access_token, verify_expired_token, verify_token,
};
pub use refresh::generate_refresh_token;
pub use signing::{SIGNING_ALGORITHM, SigningCredentials, signing_credentials};
