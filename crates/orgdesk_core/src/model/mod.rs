//! Domain model for organizational records.
//!
//! # Responsibility
//! - Define the canonical department/employee/project records.
//! - Own name validation shared by all write paths.
//!
//! # Invariants
//! - Every record is identified by a surrogate integer id assigned by the
//!   store, never by the caller.
//! - Cross-entity references are plain nullable foreign-key fields.

pub mod org;
