//! Role gating for the dashboard views.
//!
//! The decision is made from the stored role alone, before any dashboard
//! data is read.

use serde::Serialize;

use crate::models::Role;

/// The role-specific dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    User,
    Admin,
    Superadmin,
}

impl DashboardView {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            DashboardView::User => role == Role::User,
            DashboardView::Admin => role.is_admin(),
            DashboardView::Superadmin => role.is_superadmin(),
        }
    }
}

/// Outcome of the gate: render the view or send the caller elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAccess {
    Granted,
    Redirect(&'static str),
}

/// Decides whether `role` may open `view`. A refused caller is sent to their
/// own dashboard; for the admin view that is always the user dashboard.
pub fn check_dashboard_access(view: DashboardView, role: Role) -> DashboardAccess {
    if view.allows(role) {
        DashboardAccess::Granted
    } else {
        DashboardAccess::Redirect(role.dashboard_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_view() {
        assert_eq!(
            check_dashboard_access(DashboardView::User, Role::User),
            DashboardAccess::Granted
        );
        assert_eq!(
            check_dashboard_access(DashboardView::User, Role::Admin),
            DashboardAccess::Redirect("/api/v1/dashboards/admin")
        );
        assert_eq!(
            check_dashboard_access(DashboardView::User, Role::Superadmin),
            DashboardAccess::Redirect("/api/v1/dashboards/superadmin")
        );
    }

    #[test]
    fn test_admin_view_admits_superadmin() {
        assert_eq!(
            check_dashboard_access(DashboardView::Admin, Role::Admin),
            DashboardAccess::Granted
        );
        assert_eq!(
            check_dashboard_access(DashboardView::Admin, Role::Superadmin),
            DashboardAccess::Granted
        );
    }

    #[test]
    fn test_admin_view_redirects_user_to_user_dashboard() {
        assert_eq!(
            check_dashboard_access(DashboardView::Admin, Role::User),
            DashboardAccess::Redirect("/api/v1/dashboards/user")
        );
    }

    #[test]
    fn test_superadmin_view() {
        assert_eq!(
            check_dashboard_access(DashboardView::Superadmin, Role::Superadmin),
            DashboardAccess::Granted
        );
        assert_eq!(
            check_dashboard_access(DashboardView::Superadmin, Role::Admin),
            DashboardAccess::Redirect("/api/v1/dashboards/admin")
        );
        assert_eq!(
            check_dashboard_access(DashboardView::Superadmin, Role::User),
            DashboardAccess::Redirect("/api/v1/dashboards/user")
        );
    }

    #[test]
    fn test_every_role_can_open_its_own_dashboard() {
        for role in Role::all() {
            let view = match role {
                Role::User => DashboardView::User,
                Role::Admin => DashboardView::Admin,
                Role::Superadmin => DashboardView::Superadmin,
            };
            assert_eq!(check_dashboard_access(view, *role), DashboardAccess::Granted);
        }
    }
}
