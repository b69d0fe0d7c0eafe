use std::collections::HashMap;

use poolcare::auth::session::{Permissions, Roles};
use poolcare::models::nav;
use poolcare::models::role::Role;

// ============================================================================
// Role enumeration
// ============================================================================

#[test]
fn test_role_parse_exact_match_only() {
    assert_eq!(Role::parse("admin"), Some(Role::Admin));
    assert_eq!(Role::parse("technician"), Some(Role::Technician));
    assert_eq!(Role::parse("salesperson"), Some(Role::Salesperson));

    // Case variants and unknown names are outside the closed enumeration.
    assert_eq!(Role::parse("Admin"), None);
    assert_eq!(Role::parse("ADMIN"), None);
    assert_eq!(Role::parse(" admin"), None);
    assert_eq!(Role::parse("superuser"), None);
    assert_eq!(Role::parse(""), None);
}

#[test]
fn test_role_round_trip() {
    for role in Role::ALL {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
}

#[test]
fn test_roles_has_requires_membership() {
    let roles = Roles(vec![Role::Technician]);
    assert!(roles.has(Role::Technician));
    assert!(!roles.has(Role::Admin));
    assert!(roles.has_any(&[Role::Admin, Role::Technician]));
    assert!(!roles.has_any(&[Role::Admin, Role::Finance]));
    assert!(!roles.has_any(&[]));
}

#[test]
fn test_roles_csv_drops_unknown_entries() {
    let roles = Roles::from_csv("technician, finance, Superhero, ADMIN,");
    assert_eq!(roles.0, vec![Role::Technician, Role::Finance]);
    assert_eq!(roles.to_csv(), "technician,finance");
}

// ============================================================================
// Permission set
// ============================================================================

#[test]
fn test_permissions_exact_name_match() {
    let perms = Permissions(vec![
        "appointments.view".to_string(),
        "appointments.edit".to_string(),
    ]);
    assert!(perms.has("appointments.view"));
    assert!(!perms.has("appointments"));
    assert!(!perms.has("Appointments.view"));
    assert!(!perms.has("appointments.view "));
    assert!(!perms.has("financial.view"));
}

#[test]
fn test_permissions_csv_round_trip() {
    let perms = Permissions::from_csv("a.view, b.edit ,, c.create");
    assert_eq!(perms.0, vec!["a.view", "b.edit", "c.create"]);
    assert_eq!(perms.to_csv(), "a.view,b.edit,c.create");

    let empty = Permissions::from_csv("");
    assert!(empty.0.is_empty());
    assert!(!empty.has("a.view"));
}

/// The effective set is the union over all held roles: `has(p)` is true
/// iff p is granted to at least one of them.
#[test]
fn test_effective_set_is_union_over_roles() {
    let mut mapping: HashMap<Role, Vec<&str>> = HashMap::new();
    mapping.insert(Role::Technician, vec!["appointments.view", "appointments.edit"]);
    mapping.insert(Role::Finance, vec!["financial.view", "appointments.view"]);
    mapping.insert(Role::Salesperson, vec!["customers.view"]);

    let held = [Role::Technician, Role::Finance];
    let mut union: Vec<String> = held
        .iter()
        .flat_map(|r| mapping.get(r).cloned().unwrap_or_default())
        .map(String::from)
        .collect();
    union.sort();
    union.dedup();
    let effective = Permissions(union);

    for grants in mapping.values() {
        for grant in grants {
            let expected = held
                .iter()
                .any(|h| mapping.get(h).map(|g| g.contains(grant)).unwrap_or(false));
            assert_eq!(effective.has(grant), expected, "{grant}");
        }
    }

    // Overlapping grants appear once.
    assert_eq!(
        effective.0.iter().filter(|p| *p == "appointments.view").count(),
        1
    );
    // Grants from roles not held stay out.
    assert!(!effective.has("customers.view"));
}

#[test]
fn test_technician_scenario() {
    // role set = {technician}; mapping = {technician: ["view_own_tasks"]}
    let effective = Permissions(vec!["view_own_tasks".to_string()]);
    assert!(effective.has("view_own_tasks"));
    assert!(!effective.has("view_audit_logs"));
}

/// Fail-closed degradation: an empty set answers "no" to everything.
#[test]
fn test_empty_set_denies_everything() {
    let perms = Permissions::default();
    for name in ["dashboard.view", "audit.view", "users.manage"] {
        assert!(!perms.has(name));
    }
    let roles = Roles::default();
    for role in Role::ALL {
        assert!(!roles.has(role));
    }
}

// ============================================================================
// Navigation gating (the "hide entirely" arm)
// ============================================================================

#[test]
fn test_nav_hides_unpermitted_modules() {
    let perms = Permissions(vec![
        "dashboard.view".to_string(),
        "appointments.view".to_string(),
    ]);
    let items = nav::build(&perms, "/appointments");

    let labels: Vec<&str> = items.iter().map(|i| i.label).collect();
    assert_eq!(labels, vec!["Dashboard", "Appointments"]);

    let active: Vec<&str> = items.iter().filter(|i| i.is_active).map(|i| i.label).collect();
    assert_eq!(active, vec!["Appointments"]);
}

#[test]
fn test_nav_empty_permissions_shows_nothing() {
    let items = nav::build(&Permissions::default(), "/dashboard");
    assert!(items.is_empty());
}

#[test]
fn test_nav_active_matches_subpaths() {
    let perms = Permissions(vec!["appointments.view".to_string()]);
    let items = nav::build(&perms, "/appointments/42");
    assert!(items[0].is_active);

    // Prefix similarity is not a match.
    let perms = Permissions(vec!["audit.view".to_string()]);
    let items = nav::build(&perms, "/auditorium");
    assert!(!items[0].is_active);
}
