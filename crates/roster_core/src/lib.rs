//! Core staff-placement engine.
//! This crate is the single source of truth for roster and zone invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod placement;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{
    Experience, Person, PersonDraft, PersonId, PersonPatch, PersonValidationError,
};
pub use model::role::{parse_role, Role, RoleParseError};
pub use model::roster::Roster;
pub use model::zone::{Location, Zone, ZoneConfigError, ZoneId, ZoneLayout, ZoneRegistry};
pub use placement::auto_place::AutoPlaceReport;
pub use placement::monitor::{ZoneAlert, ZoneOccupancy};
pub use placement::validator::{validate_placement, PlacementCheck, PlacementDenial};
pub use repo::roster_repo::{
    RepoError, RepoResult, RosterRepository, SqliteRosterRepository, ROSTER_STORAGE_KEY,
};
pub use search::filter::RosterMatches;
pub use service::roster_service::{
    QuickAssignError, QuickAssignment, RosterObserver, RosterService, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
