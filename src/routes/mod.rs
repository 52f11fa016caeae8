//! Route Table Module Index
//!
//! Holds the declarative table of console views and the requirement attached to
//! each of them. The navigation guard consumes this table; it never decides on
//! its own which views are public or which role a view needs.
//!
//! The table is split the same way access is: public views anyone may open,
//! and organization views gated by the principal's role in that organization.
use std::collections::BTreeMap;

use crate::roles::Role;

/// Views reachable without a token (home, login).
pub mod public;

/// Views scoped to an organization (`/organizations/:oid/...`), each gated by a role.
pub mod organization;

/// Fallback for unauthenticated principals and failed access lookups.
pub const LOGIN_ROUTE: &str = "login";

/// Fallback for principals whose role in the organization is too low.
pub const ORGANIZATION_LANDING_ROUTE: &str = "organization/racks";

/// Dynamic segment carrying the organization id.
pub const ORGANIZATION_PARAM: &str = "oid";

/// RouteRequirement
///
/// What a principal needs to enter a route. `required_role: None` on a
/// non-public route means authentication alone is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteRequirement {
    pub is_public: bool,
    pub required_role: Option<Role>,
}

impl RouteRequirement {
    pub const fn public() -> Self {
        Self {
            is_public: true,
            required_role: None,
        }
    }

    pub const fn authenticated() -> Self {
        Self {
            is_public: false,
            required_role: None,
        }
    }

    pub const fn role(role: Role) -> Self {
        Self {
            is_public: false,
            required_role: Some(role),
        }
    }
}

/// RouteDefinition
///
/// One navigable view. `path` uses `:name` segments for dynamic params, e.g.
/// `/organizations/:oid/racks/:rid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    pub path: &'static str,
    pub name: &'static str,
    pub requirement: RouteRequirement,
}

impl RouteDefinition {
    pub const fn new(path: &'static str, name: &'static str, requirement: RouteRequirement) -> Self {
        Self {
            path,
            name,
            requirement,
        }
    }

    /// Names of the dynamic segments, in path order.
    pub fn dynamic_params(&self) -> impl Iterator<Item = &'static str> {
        segments(self.path).filter_map(|segment| segment.strip_prefix(':'))
    }

    /// Captured params are percent-decoded; a segment that does not decode to
    /// UTF-8 matches nothing.
    fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let mut pattern = segments(self.path);
        let mut concrete = segments(path);
        let mut params = BTreeMap::new();

        loop {
            match (pattern.next(), concrete.next()) {
                (None, None) => return Some(params),
                (Some(expected), Some(actual)) => match expected.strip_prefix(':') {
                    Some(param) => {
                        let value = urlencoding::decode(actual).ok()?;
                        params.insert(param.to_string(), value.into_owned());
                    }
                    None if expected == actual => {}
                    None => return None,
                },
                _ => return None,
            }
        }
    }
}

/// Destination
///
/// A concrete path resolved against the table: which route it is, the values of
/// its dynamic segments, and what entering it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub name: &'static str,
    pub params: BTreeMap<String, String>,
    pub requirement: RouteRequirement,
}

impl Destination {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The organization this destination is scoped to, if any.
    pub fn organization_id(&self) -> Option<&str> {
        self.param(ORGANIZATION_PARAM)
    }
}

/// RouteTable
///
/// Ordered set of route definitions. Resolution picks the first definition
/// that matches, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDefinition>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// resolve
    ///
    /// Matches a request path (query string and fragment ignored, trailing
    /// slashes tolerated) against the table.
    pub fn resolve(&self, path: &str) -> Option<Destination> {
        let path = strip_query(path);

        self.routes.iter().find_map(|route| {
            route.matches(path).map(|params| Destination {
                name: route.name,
                params,
                requirement: route.requirement,
            })
        })
    }

    /// href
    ///
    /// Reverses a named route into a concrete path, percent-encoding each param
    /// so it stays a single segment. Returns `None` when the name is unknown or
    /// a dynamic segment has no value in `params`.
    pub fn href(&self, name: &str, params: &BTreeMap<String, String>) -> Option<String> {
        let route = self.get(name)?;
        let mut path = String::new();

        for segment in segments(route.path) {
            path.push('/');
            match segment.strip_prefix(':') {
                Some(param) => path.push_str(&urlencoding::encode(params.get(param)?)),
                None => path.push_str(segment),
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Some(path)
    }
}

/// console_routes
///
/// The full table of console views.
pub fn console_routes() -> RouteTable {
    let mut routes = public::public_routes();
    routes.extend(organization::organization_routes());
    RouteTable::new(routes)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}
