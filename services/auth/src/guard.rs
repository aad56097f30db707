//! Route guard deciding whether a view is rendered or redirected

use std::fmt;

use tracing::debug;

use crate::models::Role;
use crate::session::Session;

/// Access level a view requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

/// Views of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Dashboard,
    Book,
    BookingDetails(i64),
    Calendar,
    Profile,
    Settings,
    ServiceManager,
    Reports,
}

impl View {
    pub fn access(&self) -> Access {
        match self {
            View::Login | View::Register => Access::Public,
            View::Dashboard
            | View::Book
            | View::BookingDetails(_)
            | View::Calendar
            | View::Profile
            | View::Settings => Access::Authenticated,
            View::ServiceManager | View::Reports => Access::Admin,
        }
    }

    pub fn path(&self) -> String {
        match self {
            View::Login => "/login".to_string(),
            View::Register => "/register".to_string(),
            View::Dashboard => "/dashboard".to_string(),
            View::Book => "/book".to_string(),
            View::BookingDetails(id) => format!("/bookings/{}", id),
            View::Calendar => "/calendar".to_string(),
            View::Profile => "/profile".to_string(),
            View::Settings => "/settings".to_string(),
            View::ServiceManager => "/admin/services".to_string(),
            View::Reports => "/admin/reports".to_string(),
        }
    }

    /// Match a path against the route table
    pub fn from_path(path: &str) -> Option<View> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["login"] => Some(View::Login),
            ["register"] => Some(View::Register),
            ["dashboard"] => Some(View::Dashboard),
            ["book"] => Some(View::Book),
            ["bookings", id] => id.parse().ok().map(View::BookingDetails),
            ["calendar"] => Some(View::Calendar),
            ["profile"] => Some(View::Profile),
            ["settings"] => Some(View::Settings),
            ["admin", "services"] => Some(View::ServiceManager),
            ["admin", "reports"] => Some(View::Reports),
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of guarding a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render(View),
    RedirectToLogin,
    RedirectToDashboard,
}

impl Decision {
    /// View that ends up on screen
    pub fn target(&self) -> View {
        match self {
            Decision::Render(view) => *view,
            Decision::RedirectToLogin => View::Login,
            Decision::RedirectToDashboard => View::Dashboard,
        }
    }
}

/// Decide access for `view` given the token presence and role
///
/// A missing admin role redirects to the dashboard, never to login, even
/// when there is no token at all.
pub fn authorize(view: View, token_present: bool, role: Option<Role>) -> Decision {
    match view.access() {
        Access::Public => Decision::Render(view),
        Access::Authenticated if token_present => Decision::Render(view),
        Access::Authenticated => Decision::RedirectToLogin,
        Access::Admin if token_present && role == Some(Role::Admin) => Decision::Render(view),
        Access::Admin => Decision::RedirectToDashboard,
    }
}

/// Guard a path against the current session; unmatched paths redirect to
/// the dashboard
pub fn resolve(session: &Session, path: &str) -> Decision {
    let decision = match View::from_path(path) {
        Some(view) => authorize(view, session.is_authenticated(), session.role()),
        None => Decision::RedirectToDashboard,
    };
    debug!("Route {} resolved to {:?}", path, decision);
    decision
}

/// Follow redirects until a view renders
///
/// A redirect to the dashboard is itself guarded, so an anonymous request
/// for an admin view lands on login.
pub fn settle(session: &Session, path: &str) -> View {
    let mut decision = resolve(session, path);
    for _ in 0..3 {
        match decision {
            Decision::Render(view) => return view,
            redirect => decision = resolve(session, &redirect.target().path()),
        }
    }
    decision.target()
}
