//! Authentication: bearer token validation and the authenticated-user extractor.

pub mod jwt;
pub mod models;

pub use jwt::{Authenticator, JwtAuthenticator};
pub use models::{AuthUser, JwtClaims};
