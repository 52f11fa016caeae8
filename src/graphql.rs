use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::{
    auth::Token,
    error::AccessError,
    organization::{OrganizationAccess, OrganizationAccessSource},
    roles::Role,
};

const ORGANIZATION_ACCESS_QUERY: &str =
    "query Organization($id: ID!) { organization(id: $id) { id access } }";

/// GraphQlError
///
/// One entry of the `errors` array of a GraphQL response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

impl GraphQlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.code.as_deref()
    }
}

/// True when any of the errors carries `extensions.code == code`.
pub fn has_error_code(errors: &[GraphQlError], code: &str) -> bool {
    errors.iter().any(|error| error.code() == Some(code))
}

/// All error messages joined into one line, for logs and flash messages.
pub fn error_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct OrganizationData {
    organization: Option<OrganizationNode>,
}

#[derive(Deserialize)]
struct OrganizationNode {
    id: String,
    access: String,
}

/// GraphqlAccessClient
///
/// Fetches organization access from the console GraphQL API on behalf of the
/// token holder. One POST per call, no caching, no retries; the only timeout is
/// the one configured on the underlying HTTP client.
#[derive(Clone)]
pub struct GraphqlAccessClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlAccessClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, AccessError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OrganizationAccessSource for GraphqlAccessClient {
    async fn fetch_organization_access(
        &self,
        organization_id: &str,
        token: &Token,
    ) -> Result<OrganizationAccess, AccessError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", token.as_str()))
            .json(&json!({
                "query": ORGANIZATION_ACCESS_QUERY,
                "variables": { "id": organization_id },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AccessError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_organization_access(&body, organization_id)
    }
}

/// parse_organization_access
///
/// Interprets a raw GraphQL response body for the organization access query.
/// GraphQL errors win over any partial data; a null organization is not-found.
pub fn parse_organization_access(
    body: &str,
    organization_id: &str,
) -> Result<OrganizationAccess, AccessError> {
    let body: GraphQlResponse<OrganizationData> =
        serde_json::from_str(body).map_err(|e| AccessError::GraphQl {
            message: format!("malformed response: {}", e),
            code: None,
        })?;

    if !body.errors.is_empty() {
        return Err(AccessError::GraphQl {
            message: error_messages(&body.errors),
            code: body.errors.iter().find_map(|e| e.code().map(str::to_string)),
        });
    }

    let node = body
        .data
        .and_then(|data| data.organization)
        .ok_or_else(|| AccessError::NotFound(organization_id.to_string()))?;

    let access_role = match node.access.parse::<Role>() {
        Ok(role) => Some(role),
        Err(e) => {
            tracing::warn!(organization_id = %node.id, "console api reported {}", e);
            None
        }
    };

    Ok(OrganizationAccess {
        organization_id: node.id,
        access_role,
    })
}
