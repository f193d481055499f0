//! Token and password implementations.

mod jwt;
mod password;

pub use jwt::{DEFAULT_ISSUER, JwtConfig, JwtTokenService, MAX_EXPIRATION_HOURS};
pub use password::Argon2PasswordService;
