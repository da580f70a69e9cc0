//! Authentication
//!
//! JWT token service, the auth/admin middleware layers and the
//! [`CurrentUser`] request extractor.

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};

use crate::db::models::{Role, User};

/// Authenticated caller, resolved fresh from the user store on every
/// protected request - a token whose subject was deleted never gets through.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User record id ("user:...")
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
