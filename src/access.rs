use crate::roles::Role;

/// accessible
///
/// Decides whether a held role satisfies a route's required role.
///
/// * No requirement: always accessible.
/// * Requirement but no (or unrecognized) held role: denied.
/// * Otherwise the held rank must be at least the required rank, so equal roles
///   pass and privilege is inclusive upward.
pub fn accessible(required: Option<Role>, held: Option<Role>) -> bool {
    match (required, held) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(required), Some(held)) => held.rank() >= required.rank(),
    }
}
