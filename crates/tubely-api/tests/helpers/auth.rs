use tubely_api::auth::JwtAuthenticator;
use uuid::Uuid;

/// Signing secret shared by the test app and the token helpers.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Issue a valid access token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    JwtAuthenticator::new(TEST_JWT_SECRET)
        .issue(user_id, chrono::Duration::hours(1))
        .expect("issue token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
