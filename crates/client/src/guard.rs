//! Role-gated access decisions.
//!
//! A pure, synchronous state machine: feed it a [`SessionSnapshot`] and a
//! [`RolePredicate`], get back a [`GuardDecision`]. No I/O, no session
//! mutation, no knowledge of how the caller renders or navigates. The
//! navigation effect is data; executing it is the caller's job.
//!
//! A guarded area never shows its content to an unauthorized viewer, not
//! even for a single decision: denial renders nothing and carries the
//! redirect in the same decision.

use gatherlove_core::Role;

use crate::session::SessionSnapshot;

/// Default route for unauthenticated viewers.
pub const DEFAULT_LOGIN_ROUTE: &str = "/auth/login";

/// Default route for authenticated viewers lacking the required role.
pub const DEFAULT_FALLBACK_ROUTE: &str = "/";

/// What the guarded area requires of the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePredicate {
    /// Any logged-in user.
    Authenticated,
    /// A logged-in user holding this role.
    HasRole(Role),
    /// A logged-in user holding at least one of these roles.
    AnyOf(Vec<Role>),
}

impl RolePredicate {
    /// Evaluate the predicate against a role set.
    #[must_use]
    pub fn holds_for(&self, roles: &[Role]) -> bool {
        match self {
            Self::Authenticated => true,
            Self::HasRole(role) => roles.contains(role),
            Self::AnyOf(any) => any.iter().any(|role| roles.contains(role)),
        }
    }
}

/// What the caller should render for this decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAction {
    /// Session state is still resolving; show a loading affordance.
    Loading,
    /// Show nothing (the decision carries a redirect).
    Nothing,
    /// Access granted; show the guarded content.
    Content,
}

/// Side effect the caller should execute, separate from what it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEffect {
    /// Navigate to this route.
    Redirect(String),
}

/// The outcome of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardDecision {
    /// What to render.
    pub render: RenderAction,
    /// Navigation to perform, if any.
    pub effect: Option<NavigationEffect>,
}

impl GuardDecision {
    /// Whether the guarded content is visible.
    #[must_use]
    pub fn grants_access(&self) -> bool {
        self.render == RenderAction::Content
    }
}

/// Guard configuration: the predicate plus where denials route.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    predicate: RolePredicate,
    login_route: String,
    fallback_route: String,
}

impl AccessGuard {
    /// Guard with the default login and fallback routes.
    #[must_use]
    pub fn new(predicate: RolePredicate) -> Self {
        Self {
            predicate,
            login_route: DEFAULT_LOGIN_ROUTE.to_owned(),
            fallback_route: DEFAULT_FALLBACK_ROUTE.to_owned(),
        }
    }

    /// Override the route unauthenticated viewers are sent to.
    #[must_use]
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Override the route under-privileged viewers are sent to.
    #[must_use]
    pub fn with_fallback_route(mut self, route: impl Into<String>) -> Self {
        self.fallback_route = route.into();
        self
    }

    /// Evaluate the guard for one session snapshot.
    ///
    /// `return_path` is the route the viewer was trying to reach; it is
    /// carried on the login redirect so a successful login can come back.
    #[must_use]
    pub fn evaluate(&self, session: &SessionSnapshot, return_path: &str) -> GuardDecision {
        // No decisions while session state is unresolved.
        if session.is_loading {
            return GuardDecision {
                render: RenderAction::Loading,
                effect: None,
            };
        }

        let Some(user) = session.user.as_ref().filter(|_| session.has_token) else {
            return GuardDecision {
                render: RenderAction::Nothing,
                effect: Some(NavigationEffect::Redirect(login_redirect(
                    &self.login_route,
                    return_path,
                ))),
            };
        };

        if !self.predicate.holds_for(&user.roles) {
            return GuardDecision {
                render: RenderAction::Nothing,
                effect: Some(NavigationEffect::Redirect(self.fallback_route.clone())),
            };
        }

        GuardDecision {
            render: RenderAction::Content,
            effect: None,
        }
    }
}

/// Login route carrying the attempted route as a return-path parameter.
fn login_redirect(login_route: &str, return_path: &str) -> String {
    let separator = if login_route.contains('?') { '&' } else { '?' };
    format!(
        "{login_route}{separator}redirect={}",
        urlencoding::encode(return_path)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use gatherlove_core::Email;

    fn user_with_roles(roles: Vec<Role>) -> UserProfile {
        UserProfile {
            id: "user-1".into(),
            name: "Test".to_owned(),
            email: Email::parse("t@example.com").unwrap(),
            roles,
            phone_number: None,
            bio: None,
            profile_picture_url: None,
            wallet_id: None,
            active: Some(true),
        }
    }

    fn snapshot(
        is_loading: bool,
        user: Option<UserProfile>,
        has_token: bool,
    ) -> SessionSnapshot {
        SessionSnapshot {
            is_loading,
            user,
            has_token,
        }
    }

    #[test]
    fn test_loading_renders_loading_without_effect() {
        let guard = AccessGuard::new(RolePredicate::Authenticated);
        let decision = guard.evaluate(&snapshot(true, None, false), "/wallet");

        assert_eq!(decision.render, RenderAction::Loading);
        assert!(decision.effect.is_none());
        assert!(!decision.grants_access());
    }

    #[test]
    fn test_unauthenticated_redirects_to_login_with_return_path() {
        let guard = AccessGuard::new(RolePredicate::Authenticated);
        let decision = guard.evaluate(&snapshot(false, None, false), "/wallet");

        assert_eq!(decision.render, RenderAction::Nothing);
        assert_eq!(
            decision.effect,
            Some(NavigationEffect::Redirect(
                "/auth/login?redirect=%2Fwallet".to_owned()
            ))
        );
    }

    #[test]
    fn test_return_path_query_is_encoded() {
        let guard = AccessGuard::new(RolePredicate::Authenticated);
        let decision = guard.evaluate(&snapshot(false, None, false), "/campaigns?page=2");

        assert_eq!(
            decision.effect,
            Some(NavigationEffect::Redirect(
                "/auth/login?redirect=%2Fcampaigns%3Fpage%3D2".to_owned()
            ))
        );
    }

    #[test]
    fn test_wrong_role_redirects_to_fallback_and_renders_nothing() {
        let guard = AccessGuard::new(RolePredicate::HasRole(Role::Admin));
        let session = snapshot(false, Some(user_with_roles(vec![Role::Donor])), true);
        let decision = guard.evaluate(&session, "/admin");

        assert_eq!(decision.render, RenderAction::Nothing);
        assert_eq!(
            decision.effect,
            Some(NavigationEffect::Redirect("/".to_owned()))
        );
    }

    #[test]
    fn test_matching_role_grants_access() {
        let guard = AccessGuard::new(RolePredicate::HasRole(Role::Admin));
        let session = snapshot(false, Some(user_with_roles(vec![Role::Admin])), true);
        let decision = guard.evaluate(&session, "/admin");

        assert!(decision.grants_access());
        assert!(decision.effect.is_none());
    }

    #[test]
    fn test_any_of_accepts_any_listed_role() {
        let guard = AccessGuard::new(RolePredicate::AnyOf(vec![Role::Admin, Role::Fundraiser]));
        let session = snapshot(
            false,
            Some(user_with_roles(vec![Role::Donor, Role::Fundraiser])),
            true,
        );

        assert!(guard.evaluate(&session, "/my-campaigns").grants_access());
    }

    #[test]
    fn test_user_without_token_counts_as_unauthenticated() {
        // Partial state must never grant access.
        let guard = AccessGuard::new(RolePredicate::Authenticated);
        let session = snapshot(false, Some(user_with_roles(vec![Role::Donor])), false);
        let decision = guard.evaluate(&session, "/wallet");

        assert_eq!(decision.render, RenderAction::Nothing);
        assert!(matches!(
            decision.effect,
            Some(NavigationEffect::Redirect(route)) if route.starts_with("/auth/login")
        ));
    }

    #[test]
    fn test_custom_routes() {
        let guard = AccessGuard::new(RolePredicate::HasRole(Role::Fundraiser))
            .with_login_route("/auth/login?expired=true")
            .with_fallback_route("/home");

        let unauthenticated = guard.evaluate(&snapshot(false, None, false), "/x");
        assert_eq!(
            unauthenticated.effect,
            Some(NavigationEffect::Redirect(
                "/auth/login?expired=true&redirect=%2Fx".to_owned()
            ))
        );

        let wrong_role = guard.evaluate(
            &snapshot(false, Some(user_with_roles(vec![Role::Donor])), true),
            "/x",
        );
        assert_eq!(
            wrong_role.effect,
            Some(NavigationEffect::Redirect("/home".to_owned()))
        );
    }
}
