//! Route Gate Decision
//!
//! The gate's stateless state machine: every request is classified fresh
//! from the resolved session, the allow-list, and trusted-device validity.
//! `classify` is pure so the whole decision table is unit-testable without
//! any HTTP plumbing.

use crate::domain::allow_list::AdminAllowList;
use crate::domain::session::ResolvedSession;

/// Route classes inside the admin namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRoute {
    /// `/admin/login` - reachable without auth, bounces verified admins away
    Login,
    /// `/admin/mfa-enroll` - requires an authenticated admin, nothing more
    MfaEnroll,
    /// `/admin/mfa-verify` - requires an authenticated admin, nothing more
    MfaVerify,
    /// `/api/admin/**` - session refresh relay only, handlers authorize
    Api,
    /// Any other `/admin/**` page - the full decision procedure applies
    Protected,
}

impl AdminRoute {
    /// Classify a request path, `None` when it is outside the admin namespace
    pub fn from_path(path: &str) -> Option<Self> {
        if path == "/api/admin" || path.starts_with("/api/admin/") {
            return Some(AdminRoute::Api);
        }

        if path != "/admin" && !path.starts_with("/admin/") {
            return None;
        }

        match path {
            "/admin/login" => Some(AdminRoute::Login),
            "/admin/mfa-enroll" => Some(AdminRoute::MfaEnroll),
            "/admin/mfa-verify" => Some(AdminRoute::MfaVerify),
            _ => Some(AdminRoute::Protected),
        }
    }
}

/// Outcome of the gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the original request proceed
    Serve,
    RedirectLogin,
    RedirectMfaEnroll,
    RedirectMfaVerify,
    RedirectDashboard,
}

/// Decide what to do with a request targeting the admin namespace
///
/// `device_trusted` is the validated trusted-device cookie result for the
/// session user (always false when there is no user).
///
/// An unauthorized-but-authenticated user gets the same answer as an
/// unauthenticated one so the response never leaks which emails are admins.
pub fn classify(
    route: AdminRoute,
    session: &ResolvedSession,
    allow_list: &AdminAllowList,
    device_trusted: bool,
) -> GateDecision {
    let is_admin = session
        .user
        .as_ref()
        .is_some_and(|user| allow_list.permits(user));

    match route {
        AdminRoute::Api => GateDecision::Serve,

        AdminRoute::Login => {
            if !is_admin {
                return GateDecision::Serve;
            }
            // A fully verified admin has no business on the login form.
            // A missing assurance signal counts as verified here, matching
            // the fail-open carve-out below.
            let satisfied = session.assurance.is_none_or(|a| a.satisfied());
            if satisfied || device_trusted {
                GateDecision::RedirectDashboard
            } else {
                GateDecision::Serve
            }
        }

        AdminRoute::MfaEnroll | AdminRoute::MfaVerify => {
            if is_admin {
                GateDecision::Serve
            } else {
                GateDecision::RedirectLogin
            }
        }

        AdminRoute::Protected => {
            if !is_admin {
                return GateDecision::RedirectLogin;
            }

            match session.assurance {
                // Assurance signal unavailable: deliberately fail open on
                // this one axis so a degraded backend does not lock out
                // every admin at once. Do not "fix" this to fail closed.
                None => GateDecision::Serve,
                Some(assurance) if assurance.mfa_pending() => {
                    if device_trusted {
                        GateDecision::Serve
                    } else {
                        GateDecision::RedirectMfaVerify
                    }
                }
                Some(assurance) if assurance.mfa_unenrolled() => GateDecision::RedirectMfaEnroll,
                Some(_) => GateDecision::Serve,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{Assurance, AssuranceLevel, AuthUser};

    fn allow_list() -> AdminAllowList {
        AdminAllowList::from_csv("admin@example.com")
    }

    fn admin() -> AuthUser {
        AuthUser {
            id: "admin-1".to_string(),
            email: Some("Admin@Example.com".to_string()),
            factors: vec![],
        }
    }

    fn session(user: Option<AuthUser>, assurance: Option<Assurance>) -> ResolvedSession {
        ResolvedSession {
            user,
            assurance,
            response_cookies: vec![],
        }
    }

    fn assurance(current: AssuranceLevel, next: AssuranceLevel) -> Option<Assurance> {
        Some(Assurance { current, next })
    }

    #[test]
    fn test_route_classification() {
        assert_eq!(AdminRoute::from_path("/admin/login"), Some(AdminRoute::Login));
        assert_eq!(
            AdminRoute::from_path("/admin/mfa-enroll"),
            Some(AdminRoute::MfaEnroll)
        );
        assert_eq!(
            AdminRoute::from_path("/admin/mfa-verify"),
            Some(AdminRoute::MfaVerify)
        );
        assert_eq!(AdminRoute::from_path("/admin"), Some(AdminRoute::Protected));
        assert_eq!(
            AdminRoute::from_path("/admin/users"),
            Some(AdminRoute::Protected)
        );
        assert_eq!(
            AdminRoute::from_path("/api/admin/users"),
            Some(AdminRoute::Api)
        );
        assert_eq!(AdminRoute::from_path("/"), None);
        assert_eq!(AdminRoute::from_path("/es"), None);
        // Prefix match is on path segments, not raw strings
        assert_eq!(AdminRoute::from_path("/administrator"), None);
    }

    #[test]
    fn test_protected_without_session_redirects_to_login() {
        let decision = classify(
            AdminRoute::Protected,
            &session(None, None),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::RedirectLogin);
    }

    #[test]
    fn test_protected_non_admin_is_indistinguishable_from_unauthenticated() {
        let outsider = AuthUser {
            id: "u9".to_string(),
            email: Some("visitor@example.com".to_string()),
            factors: vec![],
        };
        // Even with full MFA, a non-admin gets the login redirect
        let decision = classify(
            AdminRoute::Protected,
            &session(
                Some(outsider),
                assurance(AssuranceLevel::Aal2, AssuranceLevel::Aal2),
            ),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::RedirectLogin);

        let no_email = AuthUser {
            id: "u10".to_string(),
            email: None,
            factors: vec![],
        };
        let decision = classify(
            AdminRoute::Protected,
            &session(Some(no_email), None),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::RedirectLogin);
    }

    #[test]
    fn test_protected_mfa_satisfied_serves() {
        let decision = classify(
            AdminRoute::Protected,
            &session(
                Some(admin()),
                assurance(AssuranceLevel::Aal2, AssuranceLevel::Aal2),
            ),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::Serve);
    }

    #[test]
    fn test_protected_mfa_pending_requires_trusted_device() {
        let pending = assurance(AssuranceLevel::Aal1, AssuranceLevel::Aal2);

        let decision = classify(
            AdminRoute::Protected,
            &session(Some(admin()), pending),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::RedirectMfaVerify);

        let decision = classify(
            AdminRoute::Protected,
            &session(Some(admin()), pending),
            &allow_list(),
            true,
        );
        assert_eq!(decision, GateDecision::Serve);
    }

    #[test]
    fn test_protected_mfa_unenrolled_redirects_to_enroll() {
        let decision = classify(
            AdminRoute::Protected,
            &session(
                Some(admin()),
                assurance(AssuranceLevel::Aal1, AssuranceLevel::Aal1),
            ),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::RedirectMfaEnroll);
    }

    #[test]
    fn test_protected_degraded_assurance_fails_open() {
        // Missing assurance signal is the one deliberate fail-open axis
        let decision = classify(
            AdminRoute::Protected,
            &session(Some(admin()), None),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::Serve);
    }

    #[test]
    fn test_login_page_bounces_verified_admin_to_dashboard() {
        let decision = classify(
            AdminRoute::Login,
            &session(
                Some(admin()),
                assurance(AssuranceLevel::Aal2, AssuranceLevel::Aal2),
            ),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::RedirectDashboard);

        // Trusted device is as good as a verified session here
        let decision = classify(
            AdminRoute::Login,
            &session(
                Some(admin()),
                assurance(AssuranceLevel::Aal1, AssuranceLevel::Aal2),
            ),
            &allow_list(),
            true,
        );
        assert_eq!(decision, GateDecision::RedirectDashboard);
    }

    #[test]
    fn test_login_page_serves_everyone_else() {
        // No session: show the form
        let decision = classify(AdminRoute::Login, &session(None, None), &allow_list(), false);
        assert_eq!(decision, GateDecision::Serve);

        // Admin mid-MFA without a trusted device: show the form
        let decision = classify(
            AdminRoute::Login,
            &session(
                Some(admin()),
                assurance(AssuranceLevel::Aal1, AssuranceLevel::Aal2),
            ),
            &allow_list(),
            false,
        );
        assert_eq!(decision, GateDecision::Serve);
    }

    #[test]
    fn test_mfa_pages_require_admin_but_skip_assurance_redirects() {
        for route in [AdminRoute::MfaEnroll, AdminRoute::MfaVerify] {
            let decision = classify(route, &session(None, None), &allow_list(), false);
            assert_eq!(decision, GateDecision::RedirectLogin);

            // An admin mid-MFA must be able to reach these pages, otherwise
            // they would redirect to themselves
            let decision = classify(
                route,
                &session(
                    Some(admin()),
                    assurance(AssuranceLevel::Aal1, AssuranceLevel::Aal2),
                ),
                &allow_list(),
                false,
            );
            assert_eq!(decision, GateDecision::Serve);
        }
    }

    #[test]
    fn test_api_routes_always_pass_through() {
        let decision = classify(AdminRoute::Api, &session(None, None), &allow_list(), false);
        assert_eq!(decision, GateDecision::Serve);
    }
}
