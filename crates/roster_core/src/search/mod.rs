//! Roster search.
//!
//! # Responsibility
//! - Provide list filtering over the in-memory roster.
//! - Keep filter results as borrowed views; no copies of person records.

pub mod filter;
