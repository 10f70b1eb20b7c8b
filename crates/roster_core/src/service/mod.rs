//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate roster, placement and repository calls into use-case APIs.
//! - Keep UI/CLI layers decoupled from storage details.

pub mod roster_service;
