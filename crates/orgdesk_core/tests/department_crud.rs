use orgdesk_core::db::open_db_in_memory;
use orgdesk_core::{
    NameError, OrgRepository, OrgService, RepoError, ServiceError, SqliteOrgRepository,
};

#[test]
fn create_department_then_list_contains_exactly_one_entry() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();

    let created = repo.create_department("Engineering").unwrap();
    assert!(created.id > 0);
    assert_eq!(created.head_of_department_id, None);

    let departments = repo.list_departments().unwrap();
    assert_eq!(departments.len(), 1);
    assert_eq!(departments[0].name, "Engineering");
    assert_eq!(departments[0].id, created.id);
}

#[test]
fn duplicate_department_name_is_rejected_without_mutation() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();

    repo.create_department("Sales").unwrap();
    let err = repo.create_department("Sales").unwrap_err();
    assert!(matches!(err, RepoError::DuplicateName(name) if name == "Sales"));
    assert_eq!(repo.list_departments().unwrap().len(), 1);
}

#[test]
fn department_name_match_is_case_sensitive() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();

    repo.create_department("Sales").unwrap();
    assert!(repo.find_department_by_name("sales").unwrap().is_none());
    assert!(repo.find_department_by_name("Sales").unwrap().is_some());
}

#[test]
fn invalid_names_are_rejected_before_persistence() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();

    for name in ["", "123", "Jane Doe", "O'Brien"] {
        let err = repo.create_department(name).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)), "accepted `{name}`");
    }
    assert!(repo.list_departments().unwrap().is_empty());
}

#[test]
fn service_reports_duplicate_as_department_exists() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    service.add_department("Ops").unwrap();
    let err = service.add_department("Ops").unwrap_err();
    assert!(matches!(err, ServiceError::DepartmentExists(name) if name == "Ops"));
    assert_eq!(service.list_departments().unwrap().len(), 1);
}

#[test]
fn service_validation_surfaces_name_error_kind() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    let err = service.add_department("").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(NameError::Empty)
    ));
}

#[test]
fn remove_department_by_unknown_name_changes_no_row_counts() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    service.add_department("Eng").unwrap();
    service.add_employee("Jane", Some("Eng")).unwrap();

    let err = service.remove_department_by_name("Ghost").unwrap_err();
    assert!(matches!(err, ServiceError::DepartmentNameNotFound(name) if name == "Ghost"));
    assert_eq!(service.list_departments().unwrap().len(), 1);
    assert_eq!(service.list_employees().unwrap().len(), 1);
}

#[test]
fn deleting_department_nullifies_employee_and_project_ownership() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    let department = service.add_department("Eng").unwrap();
    let employee = service.add_employee("Jane", Some("Eng")).unwrap();
    let project = service.add_project("Apollo", "Eng").unwrap();
    assert_eq!(project.department_id, Some(department.id));

    service.remove_department_by_name("Eng").unwrap();

    let info = service.employee_info(employee.id).unwrap();
    assert_eq!(info.department_name, None);
    let projects = service.list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].department_id, None);
}

#[test]
fn remove_employee_and_project_report_not_found_for_unknown_ids() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    let err = service.remove_employee(42).unwrap_err();
    assert!(matches!(err, ServiceError::EmployeeNotFound(42)));
    let err = service.remove_project(7).unwrap_err();
    assert!(matches!(err, ServiceError::ProjectNotFound(7)));
}

#[test]
fn add_project_requires_an_existing_department() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    let err = service.add_project("Apollo", "Eng").unwrap_err();
    assert!(matches!(err, ServiceError::NoDepartments));
}
