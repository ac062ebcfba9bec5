//! Command flows behind each `orgdesk` subcommand.
//!
//! # Responsibility
//! - Walk the user through validation, relationship selection, and mutation
//!   for every subcommand, then redisplay the affected entity list.
//! - Render all feedback as colored success/error lines.
//!
//! # Invariants
//! - Handled domain errors are printed and the command returns normally;
//!   only prompt I/O failures propagate.
//! - Batch id input is processed per id; bad tokens and unresolved ids are
//!   reported individually without aborting the batch.

use crate::prompt::{
    parse_id_list, prompt_optional_id, prompt_positive_id, prompt_yes_no, Prompter,
};
use crate::table;
use clap::Subcommand;
use colored::Colorize;
use orgdesk_core::{
    AssignmentOutcome, Department, Employee, EntityId, OrgRepository, OrgService, ServiceError,
};
use std::io;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a department and optionally staff it.
    AddDepartment,
    /// Remove a department by name.
    RemoveDepartment,
    /// List all departments.
    DisplayDepartments,
    /// Add an employee, optionally assigned to a department.
    AddEmployee,
    /// Remove an employee by ID.
    RemoveEmployee,
    /// List all employees.
    DisplayEmployees,
    /// Add a project owned by a department.
    AddProject,
    /// Remove a project by ID.
    RemoveProject,
    /// List all projects.
    DisplayProjects,
    /// List departments that have a head assigned.
    DisplayHeadsOfDepartments,
    /// List the employees of one department.
    DisplayEmployeesInDepartment,
    /// List every (department, project) ownership pair.
    DisplayProjectsByDepartments,
    /// Assign unattached employees to a department.
    AddEmployeesToADepartment,
    /// Staff a department's projects with its full roster.
    AssignProjectsToEmployees,
    /// Show one employee's department and projects.
    ViewMyInfo,
}

/// Dispatches one subcommand. Returns `Err` only for prompt I/O failures.
pub fn run<R: OrgRepository, P: Prompter>(
    command: Command,
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    match command {
        Command::AddDepartment => add_department(service, prompter),
        Command::RemoveDepartment => remove_department(service, prompter),
        Command::DisplayDepartments => display_departments(service),
        Command::AddEmployee => add_employee(service, prompter),
        Command::RemoveEmployee => remove_employee(service, prompter),
        Command::DisplayEmployees => display_employees(service),
        Command::AddProject => add_project(service, prompter),
        Command::RemoveProject => remove_project(service, prompter),
        Command::DisplayProjects => display_projects(service),
        Command::DisplayHeadsOfDepartments => display_heads_of_departments(service),
        Command::DisplayEmployeesInDepartment => {
            display_employees_in_department(service, prompter)
        }
        Command::DisplayProjectsByDepartments => display_projects_by_departments(service),
        Command::AddEmployeesToADepartment => add_employees_to_a_department(service, prompter),
        Command::AssignProjectsToEmployees => assign_projects_to_employees(service, prompter),
        Command::ViewMyInfo => view_my_info(service, prompter),
    }
}

fn echo_success(message: &str) {
    println!("{}", message.green());
}

fn echo_error(message: &str) {
    println!("{}", message.red());
}

fn add_department<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let name = prompter.prompt_line("Enter department name")?;
    let department = match service.add_department(&name) {
        Ok(department) => {
            echo_success(&format!("Added department: {}", department.name));
            department
        }
        Err(err) => {
            echo_error(&format!("Error adding department: {err}"));
            return Ok(());
        }
    };

    staff_new_department(service, prompter, department.id)?;
    select_department_head(service, prompter, department.id)?;
    display_departments(service)
}

/// Employee-assignment sub-flow entered right after department creation.
fn staff_new_department<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
    department_id: EntityId,
) -> io::Result<()> {
    let available = match service.available_employees() {
        Ok(available) => available,
        Err(err) => {
            echo_error(&format!("Error listing available employees: {err}"));
            return Ok(());
        }
    };
    if available.is_empty() {
        println!("No available employees");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = available
        .iter()
        .map(|entry| {
            vec![
                entry.employee.id.to_string(),
                entry.employee.name.clone(),
                entry.project_names.join(", "),
            ]
        })
        .collect();
    println!("{}", table::render(&["ID", "Name", "Projects"], &rows));

    let input = prompter.prompt_line("Enter employee IDs to assign (comma-separated, blank to skip)")?;
    if input.is_empty() {
        return Ok(());
    }
    let (ids, bad_tokens) = parse_id_list(&input);
    for token in &bad_tokens {
        echo_error(&format!("Skipping invalid employee ID `{token}`"));
    }
    match service.assign_employees_to_department(department_id, &ids) {
        Ok(outcome) => report_outcome("employee", &outcome),
        Err(err) => echo_error(&format!("Error assigning employees: {err}")),
    }
    Ok(())
}

/// Head selection from the full employee list; failure is non-fatal and the
/// department stays in place without a head.
fn select_department_head<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
    department_id: EntityId,
) -> io::Result<()> {
    let employees = match service.list_employees() {
        Ok(employees) => employees,
        Err(err) => {
            echo_error(&format!("Error listing employees: {err}"));
            return Ok(());
        }
    };
    if employees.is_empty() {
        return Ok(());
    }

    println!("{}", table::render(&["ID", "Name"], &employee_rows(&employees)));
    let head_id =
        match prompt_optional_id(prompter, "Enter head of department ID (blank to skip)")? {
            Some(id) => id,
            None => return Ok(()),
        };
    match service.set_department_head(department_id, head_id) {
        Ok(()) => echo_success(&format!("Assigned head of department: {head_id}")),
        Err(err) => echo_error(&format!("Error assigning head of department: {err}")),
    }
    Ok(())
}

fn remove_department<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let name = prompter.prompt_line("Enter department name")?;
    match service.remove_department_by_name(&name) {
        Ok(department) => echo_success(&format!("Removed department: {}", department.name)),
        Err(err) => {
            echo_error(&format!("Error removing department: {err}"));
            return Ok(());
        }
    }
    display_departments(service)
}

fn display_departments<R: OrgRepository>(service: &mut OrgService<R>) -> io::Result<()> {
    match service.list_departments() {
        Ok(departments) if departments.is_empty() => println!("No departments found"),
        Ok(departments) => {
            let rows: Vec<Vec<String>> = departments
                .iter()
                .map(|department| {
                    vec![
                        department.id.to_string(),
                        department.name.clone(),
                        optional_id(department.head_of_department_id),
                    ]
                })
                .collect();
            println!(
                "{}",
                table::render(&["ID", "Name", "Head of Department ID"], &rows)
            );
        }
        Err(err) => echo_error(&format!("Error displaying departments: {err}")),
    }
    Ok(())
}

fn add_employee<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let name = prompter.prompt_line("Enter employee name")?;

    let departments = match service.list_departments() {
        Ok(departments) => departments,
        Err(err) => {
            echo_error(&format!("Error adding employee: {err}"));
            return Ok(());
        }
    };

    let result = if departments.is_empty() {
        service.add_employee(&name, None)
    } else {
        println!(
            "{}",
            table::render(&["ID", "Name"], &department_name_rows(&departments))
        );
        if prompt_yes_no(prompter, "Assign a department? [y/N]")? {
            let department_name = prompter.prompt_line("Enter department name")?;
            service.add_employee(&name, Some(&department_name))
        } else {
            service.add_employee(&name, None)
        }
    };

    match result {
        Ok(employee) => echo_success(&format!("Added employee: {}", employee.name)),
        Err(err) => {
            echo_error(&format!("Error adding employee: {err}"));
            return Ok(());
        }
    }
    display_employees(service)
}

fn remove_employee<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let id = prompt_positive_id(prompter, "Enter employee ID")?;
    match service.remove_employee(id) {
        Ok(()) => echo_success(&format!("Removed employee with ID: {id}")),
        Err(err) => {
            echo_error(&format!("Error removing employee: {err}"));
            return Ok(());
        }
    }
    display_employees(service)
}

fn display_employees<R: OrgRepository>(service: &mut OrgService<R>) -> io::Result<()> {
    match service.list_employees() {
        Ok(employees) if employees.is_empty() => println!("No employees found"),
        Ok(employees) => {
            let rows: Vec<Vec<String>> = employees
                .iter()
                .map(|employee| {
                    vec![
                        employee.id.to_string(),
                        employee.name.clone(),
                        optional_id(employee.department_id),
                    ]
                })
                .collect();
            println!("{}", table::render(&["ID", "Name", "Department ID"], &rows));
        }
        Err(err) => echo_error(&format!("Error displaying employees: {err}")),
    }
    Ok(())
}

fn add_project<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let departments = match service.list_departments() {
        Ok(departments) => departments,
        Err(err) => {
            echo_error(&format!("Error adding project: {err}"));
            return Ok(());
        }
    };
    if departments.is_empty() {
        echo_error(&format!("Error adding project: {}", ServiceError::NoDepartments));
        return Ok(());
    }

    let name = prompter.prompt_line("Enter project name")?;
    println!(
        "{}",
        table::render(&["ID", "Name"], &department_name_rows(&departments))
    );
    let department_name = prompter.prompt_line("Enter department name")?;

    match service.add_project(&name, &department_name) {
        Ok(project) => echo_success(&format!("Added project: {}", project.name)),
        Err(err) => {
            echo_error(&format!("Error adding project: {err}"));
            return Ok(());
        }
    }
    display_projects(service)
}

fn remove_project<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let id = prompt_positive_id(prompter, "Enter project ID")?;
    match service.remove_project(id) {
        Ok(()) => echo_success(&format!("Removed project with ID: {id}")),
        Err(err) => {
            echo_error(&format!("Error removing project: {err}"));
            return Ok(());
        }
    }
    display_projects(service)
}

fn display_projects<R: OrgRepository>(service: &mut OrgService<R>) -> io::Result<()> {
    match service.list_projects() {
        Ok(projects) if projects.is_empty() => println!("No projects found"),
        Ok(projects) => {
            let rows: Vec<Vec<String>> = projects
                .iter()
                .map(|project| {
                    vec![
                        project.id.to_string(),
                        project.name.clone(),
                        optional_id(project.department_id),
                    ]
                })
                .collect();
            println!("{}", table::render(&["ID", "Name", "Department ID"], &rows));
        }
        Err(err) => echo_error(&format!("Error displaying projects: {err}")),
    }
    Ok(())
}

fn display_heads_of_departments<R: OrgRepository>(service: &mut OrgService<R>) -> io::Result<()> {
    match service.heads_of_departments() {
        Ok(heads) if heads.is_empty() => println!("No heads of departments found"),
        Ok(heads) => {
            let rows: Vec<Vec<String>> = heads
                .iter()
                .map(|head| {
                    vec![
                        head.head_name.clone().unwrap_or_default(),
                        head.department_name.clone(),
                    ]
                })
                .collect();
            println!(
                "{}",
                table::render(&["Head of Department", "Department Name"], &rows)
            );
        }
        Err(err) => echo_error(&format!("Error displaying heads of departments: {err}")),
    }
    Ok(())
}

fn display_employees_in_department<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let name = prompter.prompt_line("Enter department name")?;
    match service.employees_in_department(&name) {
        Ok(employees) if employees.is_empty() => {
            echo_success(&format!("No employees found in department: {name}"));
        }
        Ok(employees) => {
            println!(
                "{}",
                table::render(&["Employee ID", "Employee Name"], &employee_rows(&employees))
            );
        }
        Err(err) => echo_error(&format!("Error displaying employees in department: {err}")),
    }
    Ok(())
}

fn display_projects_by_departments<R: OrgRepository>(
    service: &mut OrgService<R>,
) -> io::Result<()> {
    match service.projects_by_departments() {
        Ok(pairs) if pairs.is_empty() => println!("No projects found"),
        Ok(pairs) => {
            let rows: Vec<Vec<String>> = pairs
                .iter()
                .map(|pair| vec![pair.department_name.clone(), pair.project_name.clone()])
                .collect();
            println!(
                "{}",
                table::render(&["Department Name", "Project Name"], &rows)
            );
        }
        Err(err) => echo_error(&format!("Error displaying projects by departments: {err}")),
    }
    Ok(())
}

fn add_employees_to_a_department<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let departments = match service.list_departments() {
        Ok(departments) => departments,
        Err(err) => {
            echo_error(&format!("Error assigning employees: {err}"));
            return Ok(());
        }
    };
    if departments.is_empty() {
        println!("No departments found");
        return Ok(());
    }
    println!(
        "{}",
        table::render(&["ID", "Name"], &department_name_rows(&departments))
    );
    let department_id = prompt_positive_id(prompter, "Enter department ID")?;

    let available = match service.available_employees() {
        Ok(available) => available,
        Err(err) => {
            echo_error(&format!("Error listing available employees: {err}"));
            return Ok(());
        }
    };
    if available.is_empty() {
        println!("No available employees");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = available
        .iter()
        .map(|entry| {
            vec![
                entry.employee.id.to_string(),
                entry.employee.name.clone(),
                entry.project_names.join(", "),
            ]
        })
        .collect();
    println!("{}", table::render(&["ID", "Name", "Projects"], &rows));

    let input = prompter.prompt_line("Enter employee IDs (comma-separated)")?;
    let (ids, bad_tokens) = parse_id_list(&input);
    for token in &bad_tokens {
        echo_error(&format!("Skipping invalid employee ID `{token}`"));
    }
    match service.assign_employees_to_department(department_id, &ids) {
        Ok(outcome) => report_outcome("employee", &outcome),
        Err(err) => {
            echo_error(&format!("Error assigning employees: {err}"));
            return Ok(());
        }
    }
    display_employees(service)
}

fn assign_projects_to_employees<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let departments = match service.list_departments() {
        Ok(departments) => departments,
        Err(err) => {
            echo_error(&format!("Error assigning projects: {err}"));
            return Ok(());
        }
    };
    if departments.is_empty() {
        println!("No departments found");
        return Ok(());
    }
    println!(
        "{}",
        table::render(&["ID", "Name"], &department_name_rows(&departments))
    );
    let department_id = prompt_positive_id(prompter, "Enter department ID")?;

    let projects = match service.department_projects(department_id) {
        Ok(projects) => projects,
        Err(err) => {
            echo_error(&format!("Error assigning projects: {err}"));
            return Ok(());
        }
    };
    if projects.is_empty() {
        println!("No projects found in this department");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|project| vec![project.id.to_string(), project.name.clone()])
        .collect();
    println!("{}", table::render(&["ID", "Name"], &rows));

    let input = prompter.prompt_line("Enter project IDs (comma-separated)")?;
    let (ids, bad_tokens) = parse_id_list(&input);
    for token in &bad_tokens {
        echo_error(&format!("Skipping invalid project ID `{token}`"));
    }
    match service.assign_projects_to_roster(department_id, &ids) {
        Ok(outcome) => report_outcome("project", &outcome),
        Err(err) => echo_error(&format!("Error assigning projects: {err}")),
    }
    Ok(())
}

fn view_my_info<R: OrgRepository, P: Prompter>(
    service: &mut OrgService<R>,
    prompter: &mut P,
) -> io::Result<()> {
    let id = prompt_positive_id(prompter, "Enter employee ID")?;
    match service.employee_info(id) {
        Ok(info) => {
            println!("Name: {}", info.employee.name);
            match info.department_name {
                Some(name) => println!("Department: {name}"),
                None => println!("Department: no department"),
            }
            if info.project_names.is_empty() {
                println!("Projects: no projects");
            } else {
                println!("Projects: {}", info.project_names.join(", "));
            }
        }
        Err(err) => echo_error(&format!("Error viewing info: {err}")),
    }
    Ok(())
}

fn report_outcome(noun: &str, outcome: &AssignmentOutcome) {
    for (id, reason) in &outcome.skipped {
        echo_error(&format!("Skipped {noun} with ID {id}: {reason}"));
    }
    if !outcome.assigned.is_empty() {
        let ids: Vec<String> = outcome.assigned.iter().map(|id| id.to_string()).collect();
        echo_success(&format!("Assigned {noun} IDs: {}", ids.join(", ")));
    }
}

fn optional_id(id: Option<EntityId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn employee_rows(employees: &[Employee]) -> Vec<Vec<String>> {
    employees
        .iter()
        .map(|employee| vec![employee.id.to_string(), employee.name.clone()])
        .collect()
}

fn department_name_rows(departments: &[Department]) -> Vec<Vec<String>> {
    departments
        .iter()
        .map(|department| vec![department.id.to_string(), department.name.clone()])
        .collect()
}
