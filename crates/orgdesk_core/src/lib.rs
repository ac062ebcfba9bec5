//! Core domain logic for OrgDesk.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::org::{
    validate_name, Department, Employee, EntityId, EntityKind, NameError, Project,
};
pub use repo::org_repo::{
    DepartmentProject, HeadOfDepartment, OrgRepository, RepoError, RepoResult,
    SqliteOrgRepository,
};
pub use service::org_service::{
    AssignmentOutcome, EmployeeInfo, EmployeeWithProjects, OrgService, ServiceError,
    ServiceResult, SkipReason,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
