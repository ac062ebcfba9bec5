//! Organizational repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the department/employee/project tables.
//! - Own membership-set replacement logic with atomic semantics.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `validate_name` before SQL mutations.
//! - `set_project_members` replaces the whole membership set in a single
//!   transaction; a failure leaves the prior set untouched.
//! - Listing orders rows by insertion id.

use crate::db::DbError;
use crate::model::org::{
    validate_name, Department, Employee, EntityId, EntityKind, NameError, Project,
};
use rusqlite::{params, Connection, ErrorCode, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    head_of_department_id
FROM departments";

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    department_id
FROM employees";

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    department_id
FROM projects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for organizational persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NameError),
    Db(DbError),
    NotFound(EntityKind, EntityId),
    DuplicateName(String),
    SchemaNotReady(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(kind, id) => write!(f, "{kind} with ID {id} not found"),
            Self::DuplicateName(name) => write!(f, "name `{name}` already exists"),
            Self::SchemaNotReady(table) => {
                write!(f, "store schema is not ready: missing table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(..) => None,
            Self::DuplicateName(_) => None,
            Self::SchemaNotReady(_) => None,
        }
    }
}

impl From<NameError> for RepoError {
    fn from(value: NameError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A department paired with its (possibly vanished) head's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadOfDepartment {
    pub department_name: String,
    /// `None` when the referenced employee row no longer exists.
    pub head_name: Option<String>,
}

/// One (department, project) ownership pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentProject {
    pub department_name: String,
    pub project_name: String,
}

/// Repository interface for organizational CRUD and relationship traversal.
pub trait OrgRepository {
    fn create_department(&self, name: &str) -> RepoResult<Department>;
    fn create_employee(&self, name: &str, department_id: Option<EntityId>)
        -> RepoResult<Employee>;
    fn create_project(&self, name: &str, department_id: EntityId) -> RepoResult<Project>;

    fn delete_department(&self, id: EntityId) -> RepoResult<()>;
    fn delete_employee(&self, id: EntityId) -> RepoResult<()>;
    fn delete_project(&self, id: EntityId) -> RepoResult<()>;

    fn find_department_by_id(&self, id: EntityId) -> RepoResult<Option<Department>>;
    fn find_department_by_name(&self, name: &str) -> RepoResult<Option<Department>>;
    fn find_employee_by_id(&self, id: EntityId) -> RepoResult<Option<Employee>>;
    fn find_project_by_id(&self, id: EntityId) -> RepoResult<Option<Project>>;

    fn list_departments(&self) -> RepoResult<Vec<Department>>;
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn list_unassigned_employees(&self) -> RepoResult<Vec<Employee>>;
    fn list_department_employees(&self, department_id: EntityId) -> RepoResult<Vec<Employee>>;
    fn list_department_projects(&self, department_id: EntityId) -> RepoResult<Vec<Project>>;
    fn list_employee_projects(&self, employee_id: EntityId) -> RepoResult<Vec<Project>>;
    fn list_project_members(&self, project_id: EntityId) -> RepoResult<Vec<Employee>>;
    fn list_heads_of_departments(&self) -> RepoResult<Vec<HeadOfDepartment>>;
    fn list_department_project_pairs(&self) -> RepoResult<Vec<DepartmentProject>>;

    fn set_employee_department(
        &self,
        employee_id: EntityId,
        department_id: Option<EntityId>,
    ) -> RepoResult<()>;
    fn set_department_head(
        &self,
        department_id: EntityId,
        employee_id: EntityId,
    ) -> RepoResult<()>;
    /// Replaces the full membership set of a project in one transaction.
    fn set_project_members(
        &mut self,
        project_id: EntityId,
        employee_ids: &[EntityId],
    ) -> RepoResult<()>;
}

/// SQLite-backed organizational repository.
pub struct SqliteOrgRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteOrgRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl OrgRepository for SqliteOrgRepository<'_> {
    fn create_department(&self, name: &str) -> RepoResult<Department> {
        validate_name(name)?;

        let inserted = self.conn.execute(
            "INSERT INTO departments (name) VALUES (?1);",
            [name],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                return Err(RepoError::DuplicateName(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        }

        Ok(Department {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            head_of_department_id: None,
        })
    }

    fn create_employee(
        &self,
        name: &str,
        department_id: Option<EntityId>,
    ) -> RepoResult<Employee> {
        validate_name(name)?;

        let inserted = self.conn.execute(
            "INSERT INTO employees (name, department_id) VALUES (?1, ?2);",
            params![name, department_id],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                // The only constraint on this insert is the department FK.
                let id = department_id.unwrap_or(0);
                return Err(RepoError::NotFound(EntityKind::Department, id));
            }
            Err(err) => return Err(err.into()),
        }

        Ok(Employee {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            department_id,
        })
    }

    fn create_project(&self, name: &str, department_id: EntityId) -> RepoResult<Project> {
        validate_name(name)?;

        let inserted = self.conn.execute(
            "INSERT INTO projects (name, department_id) VALUES (?1, ?2);",
            params![name, department_id],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                return Err(RepoError::NotFound(EntityKind::Department, department_id));
            }
            Err(err) => return Err(err.into()),
        }

        Ok(Project {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            department_id: Some(department_id),
        })
    }

    fn delete_department(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM departments WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Department, id));
        }
        Ok(())
    }

    fn delete_employee(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Employee, id));
        }
        Ok(())
    }

    fn delete_project(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Project, id));
        }
        Ok(())
    }

    fn find_department_by_id(&self, id: EntityId) -> RepoResult<Option<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn find_department_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        // Exact, case-sensitive match by contract.
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn find_employee_by_id(&self, id: EntityId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn find_project_by_id(&self, id: EntityId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_departments(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }
        Ok(departments)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn list_unassigned_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL} WHERE department_id IS NULL ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn list_department_employees(&self, department_id: EntityId) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL} WHERE department_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([department_id])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn list_department_projects(&self, department_id: EntityId) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} WHERE department_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([department_id])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn list_employee_projects(&self, employee_id: EntityId) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.id,
                p.name,
                p.department_id
             FROM projects p
             INNER JOIN project_members pm ON pm.project_id = p.id
             WHERE pm.employee_id = ?1
             ORDER BY p.id ASC;",
        )?;
        let mut rows = stmt.query([employee_id])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn list_project_members(&self, project_id: EntityId) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                e.id,
                e.name,
                e.department_id
             FROM employees e
             INNER JOIN project_members pm ON pm.employee_id = e.id
             WHERE pm.project_id = ?1
             ORDER BY e.id ASC;",
        )?;
        let mut rows = stmt.query([project_id])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn list_heads_of_departments(&self) -> RepoResult<Vec<HeadOfDepartment>> {
        // LEFT JOIN keeps departments whose head row has since vanished; the
        // head name renders as empty instead of erroring.
        let mut stmt = self.conn.prepare(
            "SELECT
                d.name AS department_name,
                e.name AS head_name
             FROM departments d
             LEFT JOIN employees e ON e.id = d.head_of_department_id
             WHERE d.head_of_department_id IS NOT NULL
             ORDER BY d.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut heads = Vec::new();
        while let Some(row) = rows.next()? {
            heads.push(HeadOfDepartment {
                department_name: row.get("department_name")?,
                head_name: row.get("head_name")?,
            });
        }
        Ok(heads)
    }

    fn list_department_project_pairs(&self) -> RepoResult<Vec<DepartmentProject>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                d.name AS department_name,
                p.name AS project_name
             FROM departments d
             INNER JOIN projects p ON p.department_id = d.id
             ORDER BY d.id ASC, p.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            pairs.push(DepartmentProject {
                department_name: row.get("department_name")?,
                project_name: row.get("project_name")?,
            });
        }
        Ok(pairs)
    }

    fn set_employee_department(
        &self,
        employee_id: EntityId,
        department_id: Option<EntityId>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE employees SET department_id = ?1 WHERE id = ?2;",
            params![department_id, employee_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Employee, employee_id));
        }
        Ok(())
    }

    fn set_department_head(
        &self,
        department_id: EntityId,
        employee_id: EntityId,
    ) -> RepoResult<()> {
        let employee_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?1);",
            [employee_id],
            |row| row.get(0),
        )?;
        if employee_exists == 0 {
            return Err(RepoError::NotFound(EntityKind::Employee, employee_id));
        }

        let changed = self.conn.execute(
            "UPDATE departments SET head_of_department_id = ?1 WHERE id = ?2;",
            params![employee_id, department_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityKind::Department, department_id));
        }
        Ok(())
    }

    fn set_project_members(
        &mut self,
        project_id: EntityId,
        employee_ids: &[EntityId],
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let project_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1);",
            [project_id],
            |row| row.get(0),
        )?;
        if project_exists == 0 {
            return Err(RepoError::NotFound(EntityKind::Project, project_id));
        }

        tx.execute(
            "DELETE FROM project_members WHERE project_id = ?1;",
            [project_id],
        )?;
        for employee_id in employee_ids {
            tx.execute(
                "INSERT OR IGNORE INTO project_members (project_id, employee_id)
                 VALUES (?1, ?2);",
                params![project_id, employee_id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["departments", "employees", "projects", "project_members"] {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::SchemaNotReady(table));
        }
    }
    Ok(())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
    )
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    Ok(Department {
        id: row.get("id")?,
        name: row.get("name")?,
        head_of_department_id: row.get("head_of_department_id")?,
    })
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        department_id: row.get("department_id")?,
    })
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        department_id: row.get("department_id")?,
    })
}
