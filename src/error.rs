use thiserror::Error;

use crate::roles::Role;

/// Raised when a role name outside the closed enumeration is parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("unknown role: {0:?}")]
    UnknownRole(String),
}

/// AccessError
///
/// Every way fetching an organization's access level can fail. The guard does
/// not distinguish between them: any of these denies the transition.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("console api responded with status {0}")]
    Status(u16),

    #[error("graphql error: {message}")]
    GraphQl {
        message: String,
        code: Option<String>,
    },

    #[error("organization not found: {0}")]
    NotFound(String),

    #[error("no access to organization {0}")]
    NoAccess(String),

    #[error("access source unavailable: {0}")]
    Unavailable(String),
}

/// Denial
///
/// The reasons a navigation is refused. All of them are resolved into a silent
/// redirect at the guard boundary; none reach the view layer.
#[derive(Error, Debug)]
pub enum Denial {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("route requires a role but carries no organization id")]
    MissingOrganizationContext,

    #[error("failed to fetch organization access: {0}")]
    AccessFetchFailure(#[source] AccessError),

    #[error("insufficient privilege in organization {organization_id}: requires {required}")]
    InsufficientPrivilege {
        organization_id: String,
        required: Role,
        held: Option<Role>,
    },
}
