//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the three entity
//!   tables and their relationships.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce name validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateName`) in
//!   addition to DB transport errors.
//! - Multi-row relationship updates happen inside one transaction.

pub mod org_repo;
