use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::RoleError;

/// Role
///
/// The access level a principal holds within an organization. The set is closed
/// and totally ordered by privilege: `Developer < Operator < Administrator`.
/// The derived `Ord` follows declaration order, which matches `rank()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    Operator,
    Administrator,
}

impl Role {
    /// Every role, lowest privilege first.
    pub const ALL: [Role; 3] = [Role::Developer, Role::Operator, Role::Administrator];

    /// rank
    ///
    /// Maps the role onto its privilege rank. Strictly increasing with privilege.
    pub const fn rank(self) -> u8 {
        match self {
            Role::Developer => 0,
            Role::Operator => 1,
            Role::Administrator => 2,
        }
    }

    /// The wire name used by the console API and the route table.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::Operator => "operator",
            Role::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    /// Accepts exactly the three lowercase role names. Anything else is rejected
    /// instead of being coerced into some rank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "developer" => Ok(Role::Developer),
            "operator" => Ok(Role::Operator),
            "administrator" => Ok(Role::Administrator),
            other => Err(RoleError::UnknownRole(other.to_string())),
        }
    }
}
