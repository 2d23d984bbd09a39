//! Bearer-token authentication, per-user authorization and password hashing.

mod claims;
pub mod extractors;
pub mod jwt;
pub mod password;

pub use extractors::{AuthorizedUser, JsonBody};
pub use jwt::{JwtKeys, TokenError};
