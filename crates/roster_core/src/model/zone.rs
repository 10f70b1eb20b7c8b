//! Zone registry: capacity-limited work zones and their access lists.
//!
//! # Responsibility
//! - Define zone identity (`ZoneId`) and person placement (`Location`).
//! - Hold the immutable zone layout shared by validation and placement.
//! - Load alternative layouts from JSON configuration.
//!
//! # Invariants
//! - Zone ids are unique and never equal to the `unassigned` sentinel.
//! - Every zone has `capacity >= 1`.
//! - Priority, open and monitored lists only reference defined zones.

use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sentinel location value for persons not placed in any zone.
pub const UNASSIGNED: &str = "unassigned";
/// Sensitive zone the excluded role may never enter.
pub const ARCHIVES_ZONE_ID: &str = "archives";

/// Stable zone identifier (registry key).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ZoneId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Where a person currently is.
///
/// Serialized as a bare string: either `unassigned` or a zone id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Location {
    Unassigned,
    Zone(ZoneId),
}

impl Location {
    pub fn zone(id: impl Into<String>) -> Self {
        Self::from(id.into())
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, Self::Unassigned)
    }

    /// Returns the zone id when placed.
    pub fn zone_id(&self) -> Option<&ZoneId> {
        match self {
            Self::Unassigned => None,
            Self::Zone(id) => Some(id),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unassigned => UNASSIGNED,
            Self::Zone(id) => id.as_str(),
        }
    }
}

impl From<String> for Location {
    fn from(value: String) -> Self {
        if value == UNASSIGNED {
            Self::Unassigned
        } else {
            Self::Zone(ZoneId(value))
        }
    }
}

impl From<Location> for String {
    fn from(value: Location) -> Self {
        match value {
            Location::Unassigned => UNASSIGNED.to_string(),
            Location::Zone(id) => id.0,
        }
    }
}

impl From<ZoneId> for Location {
    fn from(value: ZoneId) -> Self {
        Self::Zone(value)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zone definition. Immutable at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub display_name: String,
    pub capacity: u32,
    /// Empty set means the zone is open to every role.
    #[serde(default)]
    pub allowed_roles: BTreeSet<Role>,
}

impl Zone {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        capacity: u32,
        allowed_roles: &[Role],
    ) -> Self {
        Self {
            id: ZoneId::new(id),
            display_name: display_name.into(),
            capacity,
            allowed_roles: allowed_roles.iter().copied().collect(),
        }
    }

    pub fn is_restricted(&self) -> bool {
        !self.allowed_roles.is_empty()
    }

    /// Returns whether the configured role list admits `role`.
    pub fn admits(&self, role: Role) -> bool {
        !self.is_restricted() || self.allowed_roles.contains(&role)
    }
}

/// Serialized zone layout, as read from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub zones: Vec<Zone>,
    /// Mandatory zones, in auto-placement priority order.
    #[serde(default)]
    pub priority_zones: Vec<ZoneId>,
    /// Fallback pool sampled uniformly by auto-placement.
    #[serde(default)]
    pub open_zones: Vec<ZoneId>,
    /// Zones that raise an alert while empty.
    #[serde(default)]
    pub monitored_zones: Vec<ZoneId>,
}

/// Read-only zone configuration shared by every engine component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRegistry {
    zones: BTreeMap<ZoneId, Zone>,
    priority_zones: Vec<ZoneId>,
    open_zones: Vec<ZoneId>,
    monitored_zones: Vec<ZoneId>,
}

impl ZoneRegistry {
    /// Builds a registry from a layout, enforcing registry invariants.
    pub fn from_layout(layout: ZoneLayout) -> Result<Self, ZoneConfigError> {
        let mut zones = BTreeMap::new();
        for zone in layout.zones {
            if zone.id.as_str().trim().is_empty() {
                return Err(ZoneConfigError::EmptyZoneId);
            }
            if zone.id.as_str() == UNASSIGNED {
                return Err(ZoneConfigError::ReservedZoneId);
            }
            if zone.capacity == 0 {
                return Err(ZoneConfigError::ZeroCapacity(zone.id));
            }
            if zones.contains_key(&zone.id) {
                return Err(ZoneConfigError::DuplicateZone(zone.id));
            }
            zones.insert(zone.id.clone(), zone);
        }

        for id in layout
            .priority_zones
            .iter()
            .chain(&layout.open_zones)
            .chain(&layout.monitored_zones)
        {
            if !zones.contains_key(id) {
                return Err(ZoneConfigError::UndefinedZone(id.clone()));
            }
        }

        Ok(Self {
            zones,
            priority_zones: layout.priority_zones,
            open_zones: layout.open_zones,
            monitored_zones: layout.monitored_zones,
        })
    }

    /// Parses and validates a JSON layout document.
    pub fn from_json_str(json: &str) -> Result<Self, ZoneConfigError> {
        let layout: ZoneLayout = serde_json::from_str(json)
            .map_err(|err| ZoneConfigError::Parse(err.to_string()))?;
        Self::from_layout(layout)
    }

    /// Built-in office layout.
    pub fn default_layout() -> ZoneLayout {
        use Role::*;

        ZoneLayout {
            zones: vec![
                Zone::new("conference", "Conference", 10, &[]),
                Zone::new("reception", "Reception", 2, &[Receptionist, Manager, Cleaner]),
                Zone::new("servers", "Server Room", 2, &[ItTechnician, Manager, Cleaner]),
                Zone::new("security", "Security", 2, &[SecurityAgent, Manager, Cleaner]),
                Zone::new("staff", "Staff Room", 15, &[]),
                Zone::new(
                    ARCHIVES_ZONE_ID,
                    "Archives",
                    2,
                    &[Receptionist, ItTechnician, SecurityAgent, Manager, Developer, Hr],
                ),
            ],
            priority_zones: vec!["reception".into(), "servers".into(), "security".into()],
            open_zones: vec!["conference".into(), "staff".into(), ARCHIVES_ZONE_ID.into()],
            monitored_zones: vec!["reception".into(), "security".into()],
        }
    }

    pub fn get(&self, id: &ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    /// Looks a zone up by its raw string id.
    pub fn get_str(&self, id: &str) -> Option<&Zone> {
        self.zones.get(&ZoneId::new(id))
    }

    pub fn contains(&self, id: &ZoneId) -> bool {
        self.zones.contains_key(id)
    }

    /// Returns whether `location` is `unassigned` or a defined zone.
    pub fn is_valid_location(&self, location: &Location) -> bool {
        location.zone_id().map_or(true, |id| self.contains(id))
    }

    /// Zones ordered by id.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn priority_zones(&self) -> &[ZoneId] {
        &self.priority_zones
    }

    pub fn open_zones(&self) -> &[ZoneId] {
        &self.open_zones
    }

    pub fn monitored_zones(&self) -> &[ZoneId] {
        &self.monitored_zones
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        // The built-in layout satisfies every invariant checked by `from_layout`.
        let layout = Self::default_layout();
        Self {
            zones: layout
                .zones
                .into_iter()
                .map(|zone| (zone.id.clone(), zone))
                .collect(),
            priority_zones: layout.priority_zones,
            open_zones: layout.open_zones,
            monitored_zones: layout.monitored_zones,
        }
    }
}

/// Zone layout configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneConfigError {
    Parse(String),
    EmptyZoneId,
    ReservedZoneId,
    ZeroCapacity(ZoneId),
    DuplicateZone(ZoneId),
    UndefinedZone(ZoneId),
}

impl Display for ZoneConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid zone layout: {message}"),
            Self::EmptyZoneId => write!(f, "zone id must not be empty"),
            Self::ReservedZoneId => write!(f, "zone id `{UNASSIGNED}` is reserved"),
            Self::ZeroCapacity(id) => write!(f, "zone `{id}` must have a positive capacity"),
            Self::DuplicateZone(id) => write!(f, "zone `{id}` is defined more than once"),
            Self::UndefinedZone(id) => write!(f, "zone `{id}` is referenced but not defined"),
        }
    }
}

impl Error for ZoneConfigError {}

#[cfg(test)]
mod tests {
    use super::{Location, Zone, ZoneConfigError, ZoneId, ZoneLayout, ZoneRegistry};
    use crate::model::role::Role;

    #[test]
    fn default_registry_matches_validated_layout() {
        let validated = ZoneRegistry::from_layout(ZoneRegistry::default_layout()).unwrap();
        assert_eq!(validated, ZoneRegistry::default());
        assert_eq!(validated.zones().count(), 6);
    }

    #[test]
    fn location_uses_bare_string_on_the_wire() {
        let json = serde_json::to_value(Location::zone("reception")).unwrap();
        assert_eq!(json, "reception");
        let decoded: Location = serde_json::from_str("\"unassigned\"").unwrap();
        assert_eq!(decoded, Location::Unassigned);
    }

    #[test]
    fn layout_rejects_zero_capacity_and_reserved_ids() {
        let layout = ZoneLayout {
            zones: vec![Zone::new("lab", "Lab", 0, &[])],
            priority_zones: vec![],
            open_zones: vec![],
            monitored_zones: vec![],
        };
        assert_eq!(
            ZoneRegistry::from_layout(layout),
            Err(ZoneConfigError::ZeroCapacity(ZoneId::new("lab")))
        );

        let layout = ZoneLayout {
            zones: vec![Zone::new("unassigned", "Nowhere", 3, &[])],
            priority_zones: vec![],
            open_zones: vec![],
            monitored_zones: vec![],
        };
        assert_eq!(
            ZoneRegistry::from_layout(layout),
            Err(ZoneConfigError::ReservedZoneId)
        );
    }

    #[test]
    fn layout_rejects_undefined_references() {
        let layout = ZoneLayout {
            zones: vec![Zone::new("lab", "Lab", 4, &[Role::Developer])],
            priority_zones: vec!["lab".into()],
            open_zones: vec!["garden".into()],
            monitored_zones: vec![],
        };
        assert_eq!(
            ZoneRegistry::from_layout(layout),
            Err(ZoneConfigError::UndefinedZone(ZoneId::new("garden")))
        );
    }

    #[test]
    fn json_layout_defaults_optional_lists() {
        let registry = ZoneRegistry::from_json_str(
            r#"{ "zones": [ { "id": "lab", "display_name": "Lab", "capacity": 3 } ] }"#,
        )
        .unwrap();
        let lab = registry.get_str("lab").unwrap();
        assert!(!lab.is_restricted());
        assert!(lab.admits(Role::Cleaner));
        assert!(registry.priority_zones().is_empty());
    }
}
