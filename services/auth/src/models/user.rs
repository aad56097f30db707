//! User model and related functionality

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Role;

/// Identity decoded from the token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    /// Subject, the login email on this backend
    pub sub: String,
    pub role: Role,
    /// Backend user id, used for client-scoped calls
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Remaining claims (exp, iat, ...) kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserClaims {
    /// Name to show in headers and menus
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.sub)
    }
}

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Response of the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// New account registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Profile update payload; a blank password leaves it unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfileUpdate {
    pub fn new(name: String, email: String, password: Option<String>) -> Self {
        Self {
            name,
            email,
            password: password.filter(|p| !p.is_empty()),
        }
    }
}
