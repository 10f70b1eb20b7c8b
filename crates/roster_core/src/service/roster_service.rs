//! Roster use-case service.
//!
//! # Responsibility
//! - Own the in-memory roster and the zone registry for one session.
//! - Expose every collaborator-facing operation (CRUD, moves, placement).
//! - Persist and emit one refresh signal after each committed mutation.
//!
//! # Invariants
//! - Mutations are all-or-nothing: when persistence fails the in-memory
//!   roster is restored and no refresh signal is emitted.
//! - `move_person` never consults placement rules; `try_move_person` does.
//! - Logged events carry ids and counts only, never contact details.

use crate::model::person::{Person, PersonDraft, PersonId, PersonPatch, PersonValidationError};
use crate::model::roster::Roster;
use crate::model::seed::demo_roster;
use crate::model::zone::{Location, ZoneId, ZoneRegistry};
use crate::placement::auto_place::{auto_place, AutoPlaceReport};
use crate::placement::monitor::{mandatory_zone_alerts, zone_occupancy, ZoneAlert, ZoneOccupancy};
use crate::placement::validator::{validate_placement, PlacementCheck};
use crate::repo::roster_repo::{RepoError, RosterRepository};
use crate::search::filter::{filter_roster, RosterMatches};
use log::{error, info, warn};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for roster use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Person input failed field validation.
    InvalidInput(PersonValidationError),
    /// Target zone is not defined in the registry.
    UnknownZone(ZoneId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::UnknownZone(id) => write!(f, "unknown zone: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::UnknownZone(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PersonValidationError> for ServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

/// Quick-add failure.
#[derive(Debug)]
pub enum QuickAssignError {
    UnknownZone(ZoneId),
    ZoneFull { zone_name: String, capacity: u32 },
    NoEligibleStaff { zone_name: String },
    Service(ServiceError),
}

impl Display for QuickAssignError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownZone(id) => write!(f, "unknown zone: {id}"),
            Self::ZoneFull {
                zone_name,
                capacity,
            } => write!(f, "zone {zone_name} is full (max {capacity})"),
            Self::NoEligibleStaff { zone_name } => {
                write!(f, "no eligible unassigned staff for {zone_name}")
            }
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QuickAssignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for QuickAssignError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// Person placed by a successful quick-add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAssignment {
    pub person_id: PersonId,
    pub person_name: String,
    pub zone_id: ZoneId,
    pub zone_name: String,
}

/// Receives the payload-free "roster changed, re-read it" signal.
pub trait RosterObserver {
    fn roster_changed(&mut self);
}

impl<F: FnMut()> RosterObserver for F {
    fn roster_changed(&mut self) {
        self()
    }
}

/// Use-case service owning one roster session.
pub struct RosterService<R: RosterRepository> {
    repo: R,
    registry: ZoneRegistry,
    roster: Roster,
    observers: Vec<Box<dyn RosterObserver>>,
}

impl<R: RosterRepository> RosterService<R> {
    /// Loads the stored roster, seeding demonstration data when none exists.
    ///
    /// # Errors
    /// - `ServiceError::Repo(RepoError::InvalidData(_))` when stored data is
    ///   malformed. Nothing is overwritten; see `open_with_reset`.
    pub fn open(repo: R, registry: ZoneRegistry) -> ServiceResult<Self> {
        let roster = match repo.load_roster(&registry)? {
            Some(roster) => {
                info!(
                    "event=roster_load module=service status=ok source=stored persons={}",
                    roster.len()
                );
                roster
            }
            None => {
                let roster = seed_roster(&registry);
                repo.save_roster(roster.persons())?;
                info!(
                    "event=roster_load module=service status=ok source=seed persons={}",
                    roster.len()
                );
                roster
            }
        };

        Ok(Self {
            repo,
            registry,
            roster,
            observers: Vec::new(),
        })
    }

    /// Like `open`, but replaces malformed stored data with the seed roster.
    pub fn open_with_reset(repo: R, registry: ZoneRegistry) -> ServiceResult<Self> {
        match repo.load_roster(&registry) {
            Err(RepoError::InvalidData(message)) => {
                warn!(
                    "event=roster_load module=service status=error error_code=invalid_data action=reset error={message}"
                );
                repo.clear_roster()?;
                Self::open(repo, registry)
            }
            Err(err) => Err(err.into()),
            Ok(_) => Self::open(repo, registry),
        }
    }

    /// Registers a refresh listener.
    pub fn subscribe(&mut self, observer: impl RosterObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.roster.get(id)
    }

    /// Creates an unassigned person from validated input.
    pub fn add_person(&mut self, draft: PersonDraft) -> ServiceResult<PersonId> {
        draft.validate()?;
        let person = Person::from_draft(draft);
        let id = person.id;
        self.commit("person_add", |roster| roster.push(person))?;
        info!("event=person_add module=service status=ok person_id={id}");
        Ok(id)
    }

    /// Merges `patch` into an existing person.
    ///
    /// Returns `Ok(false)` without validating or persisting when `id` is
    /// unknown.
    pub fn update_person(&mut self, id: PersonId, patch: PersonPatch) -> ServiceResult<bool> {
        if self.roster.get(id).is_none() {
            return Ok(false);
        }
        patch.validate()?;
        self.commit("person_update", |roster| {
            if let Some(person) = roster.get_mut(id) {
                person.apply(patch);
            }
        })?;
        info!("event=person_update module=service status=ok person_id={id}");
        Ok(true)
    }

    /// Removes a person. Always persists and signals, even when `id` is unknown.
    pub fn delete_person(&mut self, id: PersonId) -> ServiceResult<bool> {
        let removed = self.commit("person_delete", |roster| roster.remove(id).is_some())?;
        info!("event=person_delete module=service status=ok person_id={id} removed={removed}");
        Ok(removed)
    }

    /// Sets a person's location without checking placement rules.
    ///
    /// Callers validate first (see `validate` / `try_move_person`).
    /// Returns `Ok(false)` without persisting when `id` is unknown.
    pub fn move_person(&mut self, id: PersonId, target: Location) -> ServiceResult<bool> {
        if let Some(zone_id) = target.zone_id() {
            if !self.registry.contains(zone_id) {
                return Err(ServiceError::UnknownZone(zone_id.clone()));
            }
        }
        if self.roster.get(id).is_none() {
            return Ok(false);
        }
        let location = target.to_string();
        self.commit("person_move", |roster| roster.set_location(id, target))?;
        info!("event=person_move module=service status=ok person_id={id} location={location}");
        Ok(true)
    }

    /// Moves a person back to `unassigned`.
    pub fn unassign_person(&mut self, id: PersonId) -> ServiceResult<bool> {
        self.move_person(id, Location::Unassigned)
    }

    /// Checks whether `id` may be placed at `target`. Pure.
    pub fn validate(&self, id: PersonId, target: &Location) -> PlacementCheck {
        validate_placement(&self.roster, &self.registry, id, target)
    }

    /// Validates, then moves when allowed. Mirrors a drop onto a zone.
    ///
    /// The returned check tells the caller what to display; a denied check
    /// leaves the roster untouched.
    pub fn try_move_person(
        &mut self,
        id: PersonId,
        target: Location,
    ) -> ServiceResult<PlacementCheck> {
        let check = self.validate(id, &target);
        if check.allowed {
            self.move_person(id, target)?;
        } else if let Some(reason) = &check.reason {
            info!(
                "event=person_move module=service status=denied person_id={id} location={target} reason=\"{reason}\""
            );
        }
        Ok(check)
    }

    /// Reassigns everyone, then persists once and signals once.
    pub fn auto_place<G: Rng + ?Sized>(&mut self, rng: &mut G) -> ServiceResult<AutoPlaceReport> {
        let snapshot = self.roster.clone();
        let report = auto_place(&mut self.roster, &self.registry, rng);
        if let Err(err) = self.repo.save_roster(self.roster.persons()) {
            self.roster = snapshot;
            error!(
                "event=auto_place module=service status=error error_code=persist_failed error={err}"
            );
            return Err(err.into());
        }
        self.notify();
        info!(
            "event=auto_place module=service status=ok placed={} unassigned={}",
            report.placed_total(),
            report.unassigned
        );
        Ok(report)
    }

    /// Places the first eligible unassigned person into `zone_id`.
    pub fn quick_assign(&mut self, zone_id: &ZoneId) -> Result<QuickAssignment, QuickAssignError> {
        let zone = self
            .registry
            .get(zone_id)
            .ok_or_else(|| QuickAssignError::UnknownZone(zone_id.clone()))?;
        let zone_name = zone.display_name.clone();

        if self.roster.occupancy(zone_id) >= zone.capacity as usize {
            return Err(QuickAssignError::ZoneFull {
                zone_name,
                capacity: zone.capacity,
            });
        }

        let target = Location::Zone(zone_id.clone());
        let candidate = self
            .roster
            .unassigned()
            .find(|person| {
                validate_placement(&self.roster, &self.registry, person.id, &target).allowed
            })
            .map(|person| (person.id, person.name.clone()));
        let Some((person_id, person_name)) = candidate else {
            return Err(QuickAssignError::NoEligibleStaff { zone_name });
        };

        self.move_person(person_id, target)?;
        Ok(QuickAssignment {
            person_id,
            person_name,
            zone_id: zone_id.clone(),
            zone_name,
        })
    }

    /// Replaces the stored and in-memory roster with the demonstration roster.
    ///
    /// The seed overwrites the stored document in one save; on failure both
    /// copies keep their previous content.
    pub fn reset_to_defaults(&mut self) -> ServiceResult<()> {
        let seeded = seed_roster(&self.registry);
        self.commit("roster_reset", |roster| *roster = seeded)?;
        info!(
            "event=roster_reset module=service status=ok persons={}",
            self.roster.len()
        );
        Ok(())
    }

    /// Empty-zone alert per monitored zone.
    pub fn mandatory_alerts(&self) -> Vec<ZoneAlert> {
        mandatory_zone_alerts(&self.roster, &self.registry)
    }

    pub fn zone_occupancy(&self) -> Vec<ZoneOccupancy> {
        zone_occupancy(&self.roster, &self.registry)
    }

    /// Filters the roster by name or role.
    pub fn search(&self, query: &str) -> RosterMatches<'_> {
        filter_roster(&self.roster, query)
    }

    fn commit<T>(
        &mut self,
        event: &'static str,
        mutate: impl FnOnce(&mut Roster) -> T,
    ) -> ServiceResult<T> {
        let snapshot = self.roster.clone();
        let output = mutate(&mut self.roster);
        if let Err(err) = self.repo.save_roster(self.roster.persons()) {
            self.roster = snapshot;
            error!(
                "event={event} module=service status=error error_code=persist_failed error={err}"
            );
            return Err(err.into());
        }
        self.notify();
        Ok(output)
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer.roster_changed();
        }
    }
}

/// Demonstration roster adjusted to `registry`: seed locations the
/// registry does not define fall back to `unassigned`.
fn seed_roster(registry: &ZoneRegistry) -> Roster {
    let persons = demo_roster()
        .into_iter()
        .map(|mut person| {
            if !registry.is_valid_location(&person.location) {
                person.location = Location::Unassigned;
            }
            person
        })
        .collect();
    Roster::new(persons)
}
