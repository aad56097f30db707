//! Session layer for the salon booking client
//!
//! Holds the bearer token and the identity decoded from it, guards views by
//! access level and role, and validates the account forms before they reach
//! the backend.

pub mod error;
pub mod guard;
pub mod jwt;
pub mod models;
pub mod navigation;
pub mod session;
pub mod validation;

pub use error::{SessionError, SessionResult};
pub use guard::{Access, Decision, View};
pub use models::{Role, UserClaims};
pub use session::{Session, SessionStore};
