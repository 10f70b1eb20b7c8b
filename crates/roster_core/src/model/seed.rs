//! Demonstration dataset written on first launch and on reset.

use crate::model::person::{Person, PersonDraft};
use crate::model::role::Role;
use crate::model::zone::Location;
use uuid::Uuid;

const SEED: &[(u128, &str, Role, &str, &str, &str)] = &[
    (1, "Alice Dupont", Role::Receptionist, "reception", "alice@ws.com", "0601010101"),
    (2, "Bob Martin", Role::ItTechnician, "servers", "bob@ws.com", "0602020202"),
    (3, "Charlie Secur", Role::SecurityAgent, "security", "charlie@ws.com", "0603030303"),
    (4, "Diana Boss", Role::Manager, "conference", "diana@ws.com", "0604040404"),
    (5, "Evan Dev", Role::Developer, "unassigned", "evan@ws.com", "0605050505"),
];

/// Returns the demonstration roster, with fixed ids.
///
/// Locations reference the built-in zone layout.
pub fn demo_roster() -> Vec<Person> {
    SEED.iter()
        .map(|&(seq, name, role, location, email, phone)| {
            let mut person =
                Person::with_id(seed_id(seq), PersonDraft::new(name, role, email, phone));
            person.location = Location::zone(location);
            person
        })
        .collect()
}

fn seed_id(seq: u128) -> Uuid {
    Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0000 | seq)
}
