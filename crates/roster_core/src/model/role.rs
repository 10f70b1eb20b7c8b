//! Staff role catalogue.
//!
//! # Responsibility
//! - Define the closed set of roles a person can hold.
//! - Provide cosmetic metadata (display name, icon, colour) for renderers.
//!
//! # Invariants
//! - Wire ids are stable; renaming a variant must not change `as_str()`.
//! - Only `Manager` and `Cleaner` carry rule semantics (see `placement`).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Staff role governing zone access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Receptionist,
    ItTechnician,
    SecurityAgent,
    /// Privileged role: bypasses role restrictions, never capacity.
    Manager,
    /// Excluded from the archives regardless of zone configuration.
    Cleaner,
    Developer,
    Hr,
}

impl Role {
    /// All roles in catalogue order.
    pub const ALL: [Role; 7] = [
        Role::Receptionist,
        Role::ItTechnician,
        Role::SecurityAgent,
        Role::Manager,
        Role::Cleaner,
        Role::Developer,
        Role::Hr,
    ];

    /// Stable string id used in persisted JSON and CLI input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Receptionist => "receptionist",
            Self::ItTechnician => "it_technician",
            Self::SecurityAgent => "security_agent",
            Self::Manager => "manager",
            Self::Cleaner => "cleaner",
            Self::Developer => "developer",
            Self::Hr => "hr",
        }
    }

    /// Human-facing label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Receptionist => "Receptionist",
            Self::ItTechnician => "IT Technician",
            Self::SecurityAgent => "Security Agent",
            Self::Manager => "Manager",
            Self::Cleaner => "Cleaner",
            Self::Developer => "Developer",
            Self::Hr => "HR",
        }
    }

    /// Font Awesome icon class for role badges.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Receptionist => "fa-bell-concierge",
            Self::ItTechnician => "fa-server",
            Self::SecurityAgent => "fa-shield-halved",
            Self::Manager => "fa-user-tie",
            Self::Cleaner => "fa-broom",
            Self::Developer => "fa-code",
            Self::Hr => "fa-users",
        }
    }

    /// Hex colour for role badges and borders.
    pub fn color(self) -> &'static str {
        match self {
            Self::Receptionist => "#a2845e",
            Self::ItTechnician => "#8e8e93",
            Self::SecurityAgent => "#636366",
            Self::Manager => "#32d74b",
            Self::Cleaner => "#64d2ff",
            Self::Developer => "#0a84ff",
            Self::Hr => "#bf5af2",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.display_name())
    }
}

/// Parses a role from its wire id or display name (case-insensitive).
pub fn parse_role(value: &str) -> Result<Role, RoleParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(RoleParseError::Empty);
    }

    Role::ALL
        .into_iter()
        .find(|role| {
            role.as_str().eq_ignore_ascii_case(normalized)
                || role.display_name().eq_ignore_ascii_case(normalized)
        })
        .ok_or_else(|| RoleParseError::Unknown(normalized.to_string()))
}

/// Role parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    Empty,
    Unknown(String),
}

impl Display for RoleParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "role value must not be empty"),
            Self::Unknown(value) => write!(f, "unknown role: {value}"),
        }
    }
}

impl Error for RoleParseError {}
