use super::{RouteDefinition, RouteRequirement};
use crate::roles::Role::{Administrator, Developer, Operator};

/// Organization Route Definitions
///
/// Views nested under `/organizations/:oid`. Apart from the organization root,
/// each one names the minimum role the principal must hold *in that
/// organization*; the guard fetches that role on every navigation.
pub fn organization_routes() -> Vec<RouteDefinition> {
    vec![
        // Organization shell. Only needs a signed-in principal.
        RouteDefinition::new(
            "/organizations/:oid",
            "organization",
            RouteRequirement::authenticated(),
        ),
        // --- Organization administration ---
        RouteDefinition::new(
            "/organizations/:oid/audits",
            "organization/audits",
            RouteRequirement::role(Operator),
        ),
        RouteDefinition::new(
            "/organizations/:oid/billing",
            "organization/billing",
            RouteRequirement::role(Administrator),
        ),
        RouteDefinition::new(
            "/organizations/:oid/integrations",
            "organization/integrations",
            RouteRequirement::role(Operator),
        ),
        RouteDefinition::new(
            "/organizations/:oid/jobs",
            "organization/jobs",
            RouteRequirement::role(Developer),
        ),
        // The landing route. It must stay reachable by the lowest role, otherwise
        // an under-privileged redirect would loop.
        RouteDefinition::new(
            "/organizations/:oid/racks",
            "organization/racks",
            RouteRequirement::role(Developer),
        ),
        // --- Rack views ---
        RouteDefinition::new(
            "/organizations/:oid/racks/:rid",
            "organization/rack",
            RouteRequirement::role(Developer),
        ),
        RouteDefinition::new(
            "/organizations/:oid/racks/:rid/apps",
            "organization/rack/apps",
            RouteRequirement::role(Developer),
        ),
        RouteDefinition::new(
            "/organizations/:oid/racks/:rid/instances",
            "organization/rack/instances",
            RouteRequirement::role(Developer),
        ),
        RouteDefinition::new(
            "/organizations/:oid/racks/:rid/logs",
            "organization/rack/logs",
            RouteRequirement::role(Developer),
        ),
        RouteDefinition::new(
            "/organizations/:oid/racks/:rid/processes",
            "organization/rack/processes",
            RouteRequirement::role(Developer),
        ),
        RouteDefinition::new(
            "/organizations/:oid/racks/:rid/resources",
            "organization/rack/resources",
            RouteRequirement::role(Developer),
        ),
        RouteDefinition::new(
            "/organizations/:oid/racks/:rid/settings",
            "organization/rack/settings",
            RouteRequirement::role(Developer),
        ),
        RouteDefinition::new(
            "/organizations/:oid/racks/:rid/updates",
            "organization/rack/updates",
            RouteRequirement::role(Developer),
        ),
        // --- Organization settings and membership ---
        RouteDefinition::new(
            "/organizations/:oid/settings",
            "organization/settings",
            RouteRequirement::role(Administrator),
        ),
        RouteDefinition::new(
            "/organizations/:oid/support",
            "organization/support",
            RouteRequirement::role(Developer),
        ),
        RouteDefinition::new(
            "/organizations/:oid/users",
            "organization/users",
            RouteRequirement::role(Administrator),
        ),
        RouteDefinition::new(
            "/organizations/:oid/workflows",
            "organization/workflows",
            RouteRequirement::role(Operator),
        ),
    ]
}
