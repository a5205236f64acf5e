pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::Deserialize;

// Re-export necessary items
pub use extractors::AuthSession;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Payload for a login request.
///
/// Deliberately unvalidated: a malformed email fails the credential lookup the
/// same way a wrong password does, so the response never hints at which part
/// was bad.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
