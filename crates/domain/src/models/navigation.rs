//! Sidebar navigation.

use serde::Serialize;

use super::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub label: &'static str,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub role: Role,
    pub sections: Vec<NavSection>,
}

const MAIN_MENU: &[(&str, &str)] = &[
    ("Dashboard", "/dashboard"),
    ("Browse Drones", "/drones"),
    ("My Requests", "/requests"),
    ("New Request", "/request"),
];

const ADMINISTRATION: &[(&str, &str)] = &[
    ("Manage Requests", "/admin/requests"),
    ("Manage Drones", "/admin/drones"),
    ("Users", "/admin/users"),
];

const SUPER_ADMIN: &[(&str, &str)] = &[
    ("Analytics", "/admin/analytics"),
    ("System Logs", "/admin/logs"),
    ("Settings", "/admin/settings"),
];

fn section(label: &'static str, items: &[(&'static str, &'static str)]) -> NavSection {
    NavSection {
        label,
        items: items
            .iter()
            .map(|&(title, url)| NavItem { title, url })
            .collect(),
    }
}

/// Sections visible to `role`, in display order.
pub fn sections_for(role: Role) -> Vec<NavSection> {
    let mut sections = vec![section("Main Menu", MAIN_MENU)];
    if role.is_admin() {
        sections.push(section("Administration", ADMINISTRATION));
    }
    if role.is_superadmin() {
        sections.push(section("Super Admin", SUPER_ADMIN));
    }
    sections
}

impl NavigationResponse {
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            sections: sections_for(role),
        }
    }
}
