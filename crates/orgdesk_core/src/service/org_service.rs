//! Organizational workflow service.
//!
//! # Responsibility
//! - Provide the command-level operations behind every CLI subcommand.
//! - Resolve relationship choices (department rosters, project ownership)
//!   before mutating state.
//!
//! # Invariants
//! - Batch assignment never aborts early: unresolved ids are skipped and
//!   reported individually.
//! - Replacing a project's membership set uses the owning department's
//!   entire current roster, replacing any prior membership.
//! - A failed head-of-department selection leaves the department intact.

use crate::model::org::{
    validate_name, Department, Employee, EntityId, EntityKind, NameError, Project,
};
use crate::repo::org_repo::{
    DepartmentProject, HeadOfDepartment, OrgRepository, RepoError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for organizational workflows.
#[derive(Debug)]
pub enum ServiceError {
    /// Entity name failed validation.
    Validation(NameError),
    /// A department with this name already exists.
    DepartmentExists(String),
    /// No department carries this exact name.
    DepartmentNameNotFound(String),
    /// No department carries this id.
    DepartmentNotFound(EntityId),
    /// No employee carries this id.
    EmployeeNotFound(EntityId),
    /// No project carries this id.
    ProjectNotFound(EntityId),
    /// The operation requires at least one existing department.
    NoDepartments,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DepartmentExists(name) => write!(f, "department `{name}` already exists"),
            Self::DepartmentNameNotFound(name) => write!(f, "department `{name}` not found"),
            Self::DepartmentNotFound(id) => write!(f, "department with ID {id} not found"),
            Self::EmployeeNotFound(id) => write!(f, "employee with ID {id} not found"),
            Self::ProjectNotFound(id) => write!(f, "project with ID {id} not found"),
            Self::NoDepartments => write!(f, "no departments exist yet; add a department first"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NameError> for ServiceError {
    fn from(value: NameError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Why one id in a batch assignment was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No row with this id exists.
    NotFound,
    /// Employee already belongs to a department.
    AlreadyAssigned,
    /// Project belongs to a different department than the one chosen.
    OutsideDepartment,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::AlreadyAssigned => write!(f, "already assigned to a department"),
            Self::OutsideDepartment => write!(f, "does not belong to the chosen department"),
        }
    }
}

/// Per-id result of a batch relationship assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// Ids that were applied.
    pub assigned: Vec<EntityId>,
    /// Ids that were skipped, with the reason for each.
    pub skipped: Vec<(EntityId, SkipReason)>,
}

/// An unassigned employee together with their current project names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeWithProjects {
    pub employee: Employee,
    pub project_names: Vec<String>,
}

/// Everything `view-my-info` reports for one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeInfo {
    pub employee: Employee,
    /// `None` when the employee has no department.
    pub department_name: Option<String>,
    pub project_names: Vec<String>,
}

/// Use-case service wrapper for organizational workflows.
pub struct OrgService<R: OrgRepository> {
    repo: R,
}

impl<R: OrgRepository> OrgService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a department after validating name and uniqueness.
    ///
    /// # Contract
    /// - Duplicate names (case-sensitive exact match) are rejected without
    ///   mutating the store.
    pub fn add_department(&self, name: &str) -> ServiceResult<Department> {
        validate_name(name)?;
        if self.repo.find_department_by_name(name)?.is_some() {
            return Err(ServiceError::DepartmentExists(name.to_string()));
        }
        match self.repo.create_department(name) {
            Ok(department) => Ok(department),
            // Lost race against another writer on the same store file.
            Err(RepoError::DuplicateName(name)) => Err(ServiceError::DepartmentExists(name)),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a department by exact name.
    ///
    /// Member employees and owned projects are left department-less by the
    /// schema's nullify policy.
    pub fn remove_department_by_name(&self, name: &str) -> ServiceResult<Department> {
        let department = self
            .repo
            .find_department_by_name(name)?
            .ok_or_else(|| ServiceError::DepartmentNameNotFound(name.to_string()))?;
        self.repo.delete_department(department.id)?;
        Ok(department)
    }

    /// Creates an employee, optionally attached to a department by name.
    pub fn add_employee(
        &self,
        name: &str,
        department_name: Option<&str>,
    ) -> ServiceResult<Employee> {
        validate_name(name)?;
        let department_id = match department_name {
            Some(dept_name) => Some(
                self.repo
                    .find_department_by_name(dept_name)?
                    .ok_or_else(|| ServiceError::DepartmentNameNotFound(dept_name.to_string()))?
                    .id,
            ),
            None => None,
        };
        Ok(self.repo.create_employee(name, department_id)?)
    }

    /// Deletes an employee by id.
    ///
    /// Any head-of-department slot they held is cleared and their project
    /// memberships are removed by the schema's nullify/cascade policy.
    pub fn remove_employee(&self, id: EntityId) -> ServiceResult<()> {
        match self.repo.delete_employee(id) {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound(..)) => Err(ServiceError::EmployeeNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Creates a project owned by the named department.
    ///
    /// # Contract
    /// - Requires at least one department to exist.
    /// - Ownership is fixed at creation; no operation reassigns it.
    pub fn add_project(&self, name: &str, department_name: &str) -> ServiceResult<Project> {
        validate_name(name)?;
        if self.repo.list_departments()?.is_empty() {
            return Err(ServiceError::NoDepartments);
        }
        let department = self
            .repo
            .find_department_by_name(department_name)?
            .ok_or_else(|| ServiceError::DepartmentNameNotFound(department_name.to_string()))?;
        Ok(self.repo.create_project(name, department.id)?)
    }

    /// Deletes a project by id.
    pub fn remove_project(&self, id: EntityId) -> ServiceResult<()> {
        match self.repo.delete_project(id) {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound(..)) => Err(ServiceError::ProjectNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    pub fn list_departments(&self) -> ServiceResult<Vec<Department>> {
        Ok(self.repo.list_departments()?)
    }

    pub fn list_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.repo.list_employees()?)
    }

    pub fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.list_projects()?)
    }

    /// Employees with no department, each with their current project names.
    ///
    /// These are the valid choices offered by the assignment sub-flows.
    pub fn available_employees(&self) -> ServiceResult<Vec<EmployeeWithProjects>> {
        let mut available = Vec::new();
        for employee in self.repo.list_unassigned_employees()? {
            let project_names = self
                .repo
                .list_employee_projects(employee.id)?
                .into_iter()
                .map(|project| project.name)
                .collect();
            available.push(EmployeeWithProjects {
                employee,
                project_names,
            });
        }
        Ok(available)
    }

    /// Assigns each resolvable employee id to the department.
    ///
    /// # Contract
    /// - Unknown ids and already-assigned employees are skipped with a
    ///   reason; the batch is never aborted early.
    pub fn assign_employees_to_department(
        &self,
        department_id: EntityId,
        employee_ids: &[EntityId],
    ) -> ServiceResult<AssignmentOutcome> {
        let department = self
            .repo
            .find_department_by_id(department_id)?
            .ok_or(ServiceError::DepartmentNotFound(department_id))?;

        let mut outcome = AssignmentOutcome::default();
        for &employee_id in employee_ids {
            match self.repo.find_employee_by_id(employee_id)? {
                None => outcome.skipped.push((employee_id, SkipReason::NotFound)),
                Some(employee) if employee.department_id.is_some() => {
                    outcome
                        .skipped
                        .push((employee_id, SkipReason::AlreadyAssigned));
                }
                Some(employee) => {
                    self.repo
                        .set_employee_department(employee.id, Some(department.id))?;
                    outcome.assigned.push(employee.id);
                }
            }
        }
        Ok(outcome)
    }

    /// Designates an employee as head of the department.
    ///
    /// Callers treat a failure here as non-fatal: the department stays in
    /// place without a head.
    pub fn set_department_head(
        &self,
        department_id: EntityId,
        employee_id: EntityId,
    ) -> ServiceResult<()> {
        match self.repo.set_department_head(department_id, employee_id) {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound(EntityKind::Employee, id)) => {
                Err(ServiceError::EmployeeNotFound(id))
            }
            Err(RepoError::NotFound(_, id)) => Err(ServiceError::DepartmentNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Projects owned by one department, for the roster-assignment flow.
    pub fn department_projects(&self, department_id: EntityId) -> ServiceResult<Vec<Project>> {
        self.repo
            .find_department_by_id(department_id)?
            .ok_or(ServiceError::DepartmentNotFound(department_id))?;
        Ok(self.repo.list_department_projects(department_id)?)
    }

    /// Sets each resolved project's membership to the department's roster.
    ///
    /// # Contract
    /// - Each project must belong to the chosen department; others are
    ///   skipped with a reason.
    /// - Membership is replaced, not merged: employees outside the roster
    ///   are removed from the project.
    pub fn assign_projects_to_roster(
        &mut self,
        department_id: EntityId,
        project_ids: &[EntityId],
    ) -> ServiceResult<AssignmentOutcome> {
        let department = self
            .repo
            .find_department_by_id(department_id)?
            .ok_or(ServiceError::DepartmentNotFound(department_id))?;
        let roster: Vec<EntityId> = self
            .repo
            .list_department_employees(department.id)?
            .into_iter()
            .map(|employee| employee.id)
            .collect();

        let mut outcome = AssignmentOutcome::default();
        for &project_id in project_ids {
            match self.repo.find_project_by_id(project_id)? {
                None => outcome.skipped.push((project_id, SkipReason::NotFound)),
                Some(project) if project.department_id != Some(department.id) => {
                    outcome
                        .skipped
                        .push((project_id, SkipReason::OutsideDepartment));
                }
                Some(project) => {
                    self.repo.set_project_members(project.id, &roster)?;
                    outcome.assigned.push(project.id);
                }
            }
        }
        Ok(outcome)
    }

    /// Current membership set of one project.
    pub fn project_members(&self, project_id: EntityId) -> ServiceResult<Vec<Employee>> {
        self.repo
            .find_project_by_id(project_id)?
            .ok_or(ServiceError::ProjectNotFound(project_id))?;
        Ok(self.repo.list_project_members(project_id)?)
    }

    /// Departments with a head set, with the head's name when still present.
    pub fn heads_of_departments(&self) -> ServiceResult<Vec<HeadOfDepartment>> {
        Ok(self.repo.list_heads_of_departments()?)
    }

    /// Roster of the department carrying this exact name.
    pub fn employees_in_department(&self, name: &str) -> ServiceResult<Vec<Employee>> {
        let department = self
            .repo
            .find_department_by_name(name)?
            .ok_or_else(|| ServiceError::DepartmentNameNotFound(name.to_string()))?;
        Ok(self.repo.list_department_employees(department.id)?)
    }

    /// Every (department, project) ownership pair. Departments without
    /// projects contribute no rows.
    pub fn projects_by_departments(&self) -> ServiceResult<Vec<DepartmentProject>> {
        Ok(self.repo.list_department_project_pairs()?)
    }

    /// One employee's department name and project names.
    pub fn employee_info(&self, id: EntityId) -> ServiceResult<EmployeeInfo> {
        let employee = self
            .repo
            .find_employee_by_id(id)?
            .ok_or(ServiceError::EmployeeNotFound(id))?;
        let department_name = match employee.department_id {
            Some(department_id) => self
                .repo
                .find_department_by_id(department_id)?
                .map(|department| department.name),
            None => None,
        };
        let project_names = self
            .repo
            .list_employee_projects(employee.id)?
            .into_iter()
            .map(|project| project.name)
            .collect();
        Ok(EmployeeInfo {
            employee,
            department_name,
            project_names,
        })
    }
}
