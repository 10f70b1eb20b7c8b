//! Placement engine: rule checks, bulk auto-placement and zone alerts.
//!
//! # Responsibility
//! - Keep placement decisions pure over `(Roster, ZoneRegistry)`.
//! - Leave persistence and refresh signalling to the service layer.

pub mod auto_place;
pub mod monitor;
pub mod validator;
