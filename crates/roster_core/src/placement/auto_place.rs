//! Randomized bulk placement.
//!
//! # Responsibility
//! - Reassign every person in roster order, favouring mandatory zones.
//! - Fall back to a random open zone, then to `unassigned`.
//!
//! # Invariants
//! - Every committed placement passed `validate_placement` against the live
//!   roster, so no zone ends above capacity.
//! - Earlier persons claim scarce mandatory capacity first.
//! - Randomness comes only from the caller-supplied `Rng`.

use crate::model::roster::Roster;
use crate::model::zone::{Location, ZoneId, ZoneRegistry};
use crate::placement::validator::validate_placement;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Chance that an eligible mandatory zone is taken when offered.
pub const MANDATORY_ACCEPT_PROBABILITY: f64 = 0.6;

/// Summary of one auto-placement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoPlaceReport {
    /// Occupancy per zone after the pass; zones left empty are omitted.
    pub placed: BTreeMap<ZoneId, usize>,
    pub unassigned: usize,
}

impl AutoPlaceReport {
    pub fn placed_total(&self) -> usize {
        self.placed.values().sum()
    }
}

/// Reassigns every person's location in place.
pub fn auto_place<R: Rng + ?Sized>(
    roster: &mut Roster,
    registry: &ZoneRegistry,
    rng: &mut R,
) -> AutoPlaceReport {
    for index in 0..roster.len() {
        // No capacity exemption carries over from the previous location.
        roster.persons_mut()[index].location = Location::Unassigned;
        let location = choose_location(roster, registry, index, rng);
        roster.persons_mut()[index].location = location;
    }

    let mut report = AutoPlaceReport::default();
    for person in roster.persons() {
        match person.location.zone_id() {
            Some(zone_id) => *report.placed.entry(zone_id.clone()).or_default() += 1,
            None => report.unassigned += 1,
        }
    }
    report
}

fn choose_location<R: Rng + ?Sized>(
    roster: &Roster,
    registry: &ZoneRegistry,
    index: usize,
    rng: &mut R,
) -> Location {
    let person_id = roster.persons()[index].id;

    for zone_id in registry.priority_zones() {
        let target = Location::Zone(zone_id.clone());
        if !validate_placement(roster, registry, person_id, &target).allowed {
            continue;
        }
        if !rng.gen_bool(MANDATORY_ACCEPT_PROBABILITY) {
            continue;
        }
        let capacity = registry.get(zone_id).map_or(0, |zone| zone.capacity as usize);
        if roster.occupancy(zone_id) < capacity {
            return target;
        }
    }

    let Some(zone_id) = registry.open_zones().choose(rng) else {
        return Location::Unassigned;
    };
    let target = Location::Zone(zone_id.clone());
    if validate_placement(roster, registry, person_id, &target).allowed {
        target
    } else {
        Location::Unassigned
    }
}
