//! Placement validation rules.
//!
//! # Responsibility
//! - Decide whether a person may occupy a target location.
//! - Produce a user-facing reason for every rejection.
//!
//! # Invariants
//! - Pure: reads the roster and registry, never mutates or logs.
//! - Rule order: unassigned, person lookup, zone lookup, capacity,
//!   privilege, archives exclusion, role list.
//! - Capacity is checked before the privileged-role bypass.

use crate::model::person::PersonId;
use crate::model::role::Role;
use crate::model::roster::Roster;
use crate::model::zone::{Location, ZoneId, ZoneRegistry, ARCHIVES_ZONE_ID};
use std::fmt::{Display, Formatter};

/// Role that bypasses zone role lists.
pub const PRIVILEGED_ROLE: Role = Role::Manager;
/// Role that may never enter the archives.
pub const ARCHIVES_EXCLUDED_ROLE: Role = Role::Cleaner;

/// Why a placement was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementDenial {
    PersonNotFound(PersonId),
    UnknownZone(ZoneId),
    ZoneFull { zone_name: String, capacity: u32 },
    AccessDenied { zone_name: String },
    RoleNotAuthorized { role: Role, zone_name: String },
}

impl Display for PlacementDenial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::UnknownZone(id) => write!(f, "unknown zone: {id}"),
            Self::ZoneFull {
                zone_name,
                capacity,
            } => write!(f, "zone {zone_name} is full (max {capacity})"),
            Self::AccessDenied { zone_name } => write!(f, "access denied: {zone_name}"),
            Self::RoleNotAuthorized { role, zone_name } => {
                write!(f, "role {role} is not authorized for {zone_name}")
            }
        }
    }
}

/// Outcome of a placement check. `reason` is set iff `allowed` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementCheck {
    pub allowed: bool,
    pub reason: Option<PlacementDenial>,
}

impl PlacementCheck {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: PlacementDenial) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    /// Converts into a `Result` for `?`-style callers.
    pub fn into_result(self) -> Result<(), PlacementDenial> {
        match self.reason {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

/// Checks whether `person_id` may be placed at `target`.
pub fn validate_placement(
    roster: &Roster,
    registry: &ZoneRegistry,
    person_id: PersonId,
    target: &Location,
) -> PlacementCheck {
    let zone_id = match target {
        Location::Unassigned => return PlacementCheck::allow(),
        Location::Zone(zone_id) => zone_id,
    };

    let Some(person) = roster.get(person_id) else {
        return PlacementCheck::deny(PlacementDenial::PersonNotFound(person_id));
    };
    let Some(zone) = registry.get(zone_id) else {
        return PlacementCheck::deny(PlacementDenial::UnknownZone(zone_id.clone()));
    };

    let already_there = person.location.zone_id() == Some(zone_id);
    if !already_there && roster.occupancy(zone_id) >= zone.capacity as usize {
        return PlacementCheck::deny(PlacementDenial::ZoneFull {
            zone_name: zone.display_name.clone(),
            capacity: zone.capacity,
        });
    }

    if person.role == PRIVILEGED_ROLE {
        return PlacementCheck::allow();
    }

    if zone_id.as_str() == ARCHIVES_ZONE_ID && person.role == ARCHIVES_EXCLUDED_ROLE {
        return PlacementCheck::deny(PlacementDenial::AccessDenied {
            zone_name: zone.display_name.clone(),
        });
    }

    if !zone.admits(person.role) {
        return PlacementCheck::deny(PlacementDenial::RoleNotAuthorized {
            role: person.role,
            zone_name: zone.display_name.clone(),
        });
    }

    PlacementCheck::allow()
}
