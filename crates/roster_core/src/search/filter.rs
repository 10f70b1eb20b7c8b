//! Roster text filter.
//!
//! # Responsibility
//! - Match persons by name or role label for list views.
//!
//! # Invariants
//! - Matching is case-insensitive substring search.
//! - Results keep roster order.
//! - An empty (or blank) query matches everyone.

use crate::model::person::Person;
use crate::model::roster::Roster;

/// Filtered view over a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterMatches<'a> {
    pub items: Vec<&'a Person>,
    /// How many matches are currently unassigned.
    pub unassigned_count: usize,
}

/// Filters `roster` by `query` against name and role display name.
pub fn filter_roster<'a>(roster: &'a Roster, query: &str) -> RosterMatches<'a> {
    let needle = query.trim().to_lowercase();
    let items: Vec<&Person> = roster
        .persons()
        .iter()
        .filter(|person| needle.is_empty() || matches_person(person, &needle))
        .collect();
    let unassigned_count = items.iter().filter(|person| person.is_unassigned()).count();

    RosterMatches {
        items,
        unassigned_count,
    }
}

fn matches_person(person: &Person, needle: &str) -> bool {
    person.name.to_lowercase().contains(needle)
        || person.role.display_name().to_lowercase().contains(needle)
}
