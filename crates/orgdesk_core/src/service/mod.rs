//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into command-level workflows.
//! - Keep the terminal layer decoupled from storage and validation details.
//!
//! # Invariants
//! - Services never prompt; all inputs arrive as resolved values so tests
//!   can drive every workflow with canned data.

pub mod org_service;
