use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

use crate::{auth::Token, error::AccessError, roles::Role};

/// OrganizationAccess
///
/// The principal's role within one organization, as reported by the console API
/// at the moment of the navigation. `access_role` is `None` when the API reported
/// a role this client does not know; such a principal passes no role gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationAccess {
    pub organization_id: String,
    pub access_role: Option<Role>,
}

// 1. OrganizationAccessSource Contract
/// OrganizationAccessSource
///
/// Capability the navigation guard is constructed with. It answers "what role
/// does the holder of this token have in this organization?". Implementations
/// must not cache across calls: access may change between two navigations and
/// every navigation has to see the current state.
#[async_trait]
pub trait OrganizationAccessSource: Send + Sync {
    async fn fetch_organization_access(
        &self,
        organization_id: &str,
        token: &Token,
    ) -> Result<OrganizationAccess, AccessError>;
}

/// AccessState
///
/// The concrete type used to share the access source across the application state.
pub type AccessState = Arc<dyn OrganizationAccessSource>;

// 2. Membership Model
/// Organization
///
/// Membership lists of one organization, keyed by user id. The three lists
/// overlap: every operator and administrator is expected to also be a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub administrators: Vec<String>,
    #[serde(default)]
    pub operators: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
}

impl Organization {
    /// access_for
    ///
    /// Highest role the user holds in this organization. Administrator wins
    /// over operator, operator over plain membership. Non-members get `None`.
    pub fn access_for(&self, user_id: &str) -> Option<Role> {
        let listed = |members: &[String]| members.iter().any(|member| member == user_id);

        if listed(&self.administrators) {
            Some(Role::Administrator)
        } else if listed(&self.operators) {
            Some(Role::Operator)
        } else if listed(&self.users) {
            Some(Role::Developer)
        } else {
            None
        }
    }
}

// 3. The In-Memory Implementation
/// MemoryAccessSource
///
/// Resolves access from organizations and token sessions held in memory. Used
/// for local development without a console API and as the test double for the
/// guard.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessSource {
    organizations: HashMap<String, Organization>,
    // token -> user id
    sessions: HashMap<String, String>,
    /// When true, every lookup fails as if the API were unreachable.
    pub should_fail: bool,
}

impl MemoryAccessSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organizations
            .insert(organization.id.clone(), organization);
        self
    }

    pub fn with_session(mut self, token: &str, user_id: &str) -> Self {
        self.sessions.insert(token.to_string(), user_id.to_string());
        self
    }
}

#[async_trait]
impl OrganizationAccessSource for MemoryAccessSource {
    async fn fetch_organization_access(
        &self,
        organization_id: &str,
        token: &Token,
    ) -> Result<OrganizationAccess, AccessError> {
        if self.should_fail {
            return Err(AccessError::Unavailable(
                "memory access source set to fail".to_string(),
            ));
        }

        let user_id = self
            .sessions
            .get(token.as_str())
            .ok_or_else(|| AccessError::Status(401))?;

        let organization = self
            .organizations
            .get(organization_id)
            .ok_or_else(|| AccessError::NotFound(organization_id.to_string()))?;

        // Non-members are refused outright, the same as the console API does.
        let access_role = organization
            .access_for(user_id)
            .ok_or_else(|| AccessError::NoAccess(organization_id.to_string()))?;

        Ok(OrganizationAccess {
            organization_id: organization.id.clone(),
            access_role: Some(access_role),
        })
    }
}
