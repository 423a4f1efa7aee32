//! Opaque refresh token generation.
//!
//! A refresh token has no structure: 256 bits from the operating system
//! CSPRNG, base64 encoded. It is only ever compared against the value in
//! the user's session state. Collisions are left to entropy.

use data_encoding::BASE64;
use rand::RngCore;
use rand::rngs::OsRng;

pub const REFRESH_TOKEN_BYTES: usize = 32;

pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    BASE64.encode(&bytes)
}
