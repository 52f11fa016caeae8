use super::{RouteDefinition, RouteRequirement};

/// Public Route Definitions
///
/// Views that are **unauthenticated** and reachable by anyone. The guard lets
/// these through before it ever looks at the token, so they must not expose any
/// organization data.
pub fn public_routes() -> Vec<RouteDefinition> {
    vec![
        // GET /
        // Landing page of the console.
        RouteDefinition::new("/", "home", RouteRequirement::public()),
        // GET /login
        // Token entry. Every denied navigation that is not an under-privileged
        // principal ends up here.
        RouteDefinition::new("/login", "login", RouteRequirement::public()),
    ]
}
