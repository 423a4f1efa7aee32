//! # Ranque Core
//!
//! Foundational types shared by every Ranque crate:
//!
//! - [`errors`]: the [`AppError`] taxonomy and its HTTP response mapping
//! - [`password`]: bcrypt password hashing and verification
//! - [`clock`]: injectable time source used for token and session expiry
//!
//! # Example
//!
//! ```ignore
//! use ranque_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("Sup3r$ecret")?;
//! assert!(verify_password("Sup3r$ecret", &hash)?);
//! ```

pub mod clock;
pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{AppError, FieldError};
pub use password::{hash_password, verify_password};
