use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    access::accessible,
    auth::Credentials,
    error::Denial,
    organization::AccessState,
    routes::{Destination, LOGIN_ROUTE, ORGANIZATION_LANDING_ROUTE, ORGANIZATION_PARAM},
};

/// RedirectTarget
///
/// A named route plus the values of its dynamic segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectTarget {
    pub name: &'static str,
    pub params: BTreeMap<String, String>,
}

impl RedirectTarget {
    pub fn login() -> Self {
        Self {
            name: LOGIN_ROUTE,
            params: BTreeMap::new(),
        }
    }

    pub fn organization_landing(organization_id: &str) -> Self {
        Self {
            name: ORGANIZATION_LANDING_ROUTE,
            params: BTreeMap::from([(
                ORGANIZATION_PARAM.to_string(),
                organization_id.to_string(),
            )]),
        }
    }
}

/// Navigation
///
/// The single terminal outcome of one transition attempt.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(RedirectTarget),
}

impl Denial {
    /// Where a principal refused for this reason is sent instead.
    ///
    /// Only an under-privileged principal stays inside the organization; every
    /// other denial means the session itself is unusable, so it goes to login.
    pub fn redirect_target(&self) -> RedirectTarget {
        match self {
            Denial::InsufficientPrivilege {
                organization_id, ..
            } => RedirectTarget::organization_landing(organization_id),
            Denial::Unauthenticated
            | Denial::MissingOrganizationContext
            | Denial::AccessFetchFailure(_) => RedirectTarget::login(),
        }
    }
}

/// NavigationGuard
///
/// Intercepts every transition to a console view. Stateless across attempts:
/// the only thing it holds is the injected organization access source, and the
/// access it fetches is used for one decision and dropped.
#[derive(Clone)]
pub struct NavigationGuard {
    access: AccessState,
}

impl NavigationGuard {
    pub fn new(access: AccessState) -> Self {
        Self { access }
    }

    /// authorize
    ///
    /// Runs the transition state machine against `to`:
    /// 1. Public destination: allowed, nothing else is consulted.
    /// 2. No token: `Unauthenticated`.
    /// 3. No required role: allowed (authentication was enough).
    /// 4. No `oid` segment: `MissingOrganizationContext`.
    /// 5. Access fetch fails: `AccessFetchFailure`. Never retried.
    /// 6. Held role below the required one: `InsufficientPrivilege`.
    pub async fn authorize(
        &self,
        to: &Destination,
        credentials: &dyn Credentials,
    ) -> Result<(), Denial> {
        if to.requirement.is_public {
            return Ok(());
        }

        let token = credentials.get_token().ok_or(Denial::Unauthenticated)?;

        let Some(required) = to.requirement.required_role else {
            return Ok(());
        };

        let organization_id = to
            .organization_id()
            .ok_or(Denial::MissingOrganizationContext)?;

        let access = self
            .access
            .fetch_organization_access(organization_id, &token)
            .await
            .map_err(Denial::AccessFetchFailure)?;

        if accessible(Some(required), access.access_role) {
            Ok(())
        } else {
            Err(Denial::InsufficientPrivilege {
                organization_id: access.organization_id,
                required,
                held: access.access_role,
            })
        }
    }

    /// before_each
    ///
    /// Resolves a transition into exactly one `Navigation`. Denials are logged and
    /// turned into redirects here; nothing propagates past the guard.
    pub async fn before_each(&self, to: &Destination, credentials: &dyn Credentials) -> Navigation {
        match self.authorize(to, credentials).await {
            Ok(()) => {
                tracing::debug!(route = to.name, "navigation allowed");
                Navigation::Allow
            }
            Err(denial) => {
                let target = denial.redirect_target();
                match &denial {
                    Denial::AccessFetchFailure(e) => {
                        tracing::warn!(route = to.name, redirect = target.name, error = %e, "organization access lookup failed");
                    }
                    _ => {
                        tracing::info!(route = to.name, redirect = target.name, "navigation denied: {}", denial);
                    }
                }
                Navigation::Redirect(target)
            }
        }
    }
}
