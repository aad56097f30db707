//! Role-dependent navigation menu

use crate::guard::View;
use crate::session::Session;

/// Entry of the navigation menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Go { label: &'static str, view: View },
    Logout,
}

impl MenuEntry {
    pub fn label(&self) -> &'static str {
        match self {
            MenuEntry::Go { label, .. } => label,
            MenuEntry::Logout => "Logout",
        }
    }
}

/// Menu entries for the current session; empty when logged out
pub fn menu_for(session: &Session) -> Vec<MenuEntry> {
    let Some(user) = session.user() else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    if user.role.is_admin() {
        entries.push(MenuEntry::Go {
            label: "Dashboard",
            view: View::Dashboard,
        });
        entries.push(MenuEntry::Go {
            label: "Reports",
            view: View::Reports,
        });
        entries.push(MenuEntry::Go {
            label: "Services",
            view: View::ServiceManager,
        });
    } else {
        entries.push(MenuEntry::Go {
            label: "New Booking",
            view: View::Book,
        });
    }

    entries.push(MenuEntry::Go {
        label: "Profile",
        view: View::Profile,
    });
    entries.push(MenuEntry::Go {
        label: "Settings",
        view: View::Settings,
    });
    entries.push(MenuEntry::Logout);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn session(role: &str) -> Session {
        let token = encode(
            &Header::default(),
            &json!({"sub": "x@salon.com", "role": role}),
            &EncodingKey::from_secret(b"k"),
        )
        .unwrap();
        Session::from_token(&token).unwrap()
    }

    #[test]
    fn test_anonymous_menu_is_empty() {
        assert!(menu_for(&Session::anonymous()).is_empty());
    }

    #[test]
    fn test_menu_depends_on_role() {
        let admin: Vec<_> = menu_for(&session("ADMIN")).iter().map(|e| e.label()).collect();
        assert_eq!(
            admin,
            ["Dashboard", "Reports", "Services", "Profile", "Settings", "Logout"]
        );

        let user: Vec<_> = menu_for(&session("USER")).iter().map(|e| e.label()).collect();
        assert_eq!(user, ["New Booking", "Profile", "Settings", "Logout"]);
    }
}
