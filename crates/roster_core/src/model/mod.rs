//! Domain model for staff placement.
//!
//! # Responsibility
//! - Define canonical data structures used by placement rules and storage.
//! - Keep zone configuration immutable and separate from roster state.
//!
//! # Invariants
//! - Every person is identified by a stable `PersonId`.
//! - A location is `unassigned` or a zone defined in the `ZoneRegistry`.

pub mod person;
pub mod role;
pub mod roster;
pub mod seed;
pub mod zone;
