//! In-memory roster store.
//!
//! # Responsibility
//! - Own the ordered list of persons (single source of truth).
//! - Answer occupancy queries used by placement rules.
//!
//! # Invariants
//! - Roster order is insertion order and is preserved across saves.
//! - Person ids are unique (checked by `check_integrity` on load).

use crate::model::person::{Person, PersonId};
use crate::model::zone::{Location, ZoneId, ZoneRegistry};
use std::collections::HashSet;

/// Ordered collection of persons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    persons: Vec<Person>,
}

impl Roster {
    pub fn new(persons: Vec<Person>) -> Self {
        Self { persons }
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.persons.iter().find(|person| person.id == id)
    }

    pub fn get_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.persons.iter_mut().find(|person| person.id == id)
    }

    pub fn push(&mut self, person: Person) {
        self.persons.push(person);
    }

    /// Removes the person with `id`. Returns the removed record, if any.
    pub fn remove(&mut self, id: PersonId) -> Option<Person> {
        let index = self.persons.iter().position(|person| person.id == id)?;
        Some(self.persons.remove(index))
    }

    /// Sets a person's location without any rule checks.
    pub fn set_location(&mut self, id: PersonId, location: Location) -> bool {
        match self.get_mut(id) {
            Some(person) => {
                person.location = location;
                true
            }
            None => false,
        }
    }

    /// Number of persons currently placed in `zone`.
    pub fn occupancy(&self, zone: &ZoneId) -> usize {
        self.persons
            .iter()
            .filter(|person| person.location.zone_id() == Some(zone))
            .count()
    }

    /// Unassigned persons in roster order.
    pub fn unassigned(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter().filter(|person| person.is_unassigned())
    }

    pub(crate) fn persons_mut(&mut self) -> &mut [Person] {
        &mut self.persons
    }

    pub fn into_persons(self) -> Vec<Person> {
        self.persons
    }

    /// Verifies id uniqueness and that every location is known.
    pub fn check_integrity(&self, registry: &ZoneRegistry) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.persons.len());
        for person in &self.persons {
            if !seen.insert(person.id) {
                return Err(format!("duplicate person id `{}`", person.id));
            }
            if !registry.is_valid_location(&person.location) {
                return Err(format!(
                    "person `{}` is placed in unknown zone `{}`",
                    person.id, person.location
                ));
            }
        }
        Ok(())
    }
}
