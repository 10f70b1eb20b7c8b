//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the roster persistence contract.
//! - Isolate SQLite details from service orchestration.
//!
//! # Invariants
//! - Loaded rosters satisfy `Roster::check_integrity` for the active registry.

pub mod roster_repo;
