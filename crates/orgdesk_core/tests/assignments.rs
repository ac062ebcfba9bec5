use orgdesk_core::db::open_db_in_memory;
use orgdesk_core::{OrgRepository, OrgService, ServiceError, SkipReason, SqliteOrgRepository};

#[test]
fn batch_employee_assignment_skips_missing_ids_without_aborting() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    let department = service.add_department("Eng").unwrap();
    let jane = service.add_employee("Jane", None).unwrap();

    // Missing id first: processing must still reach the valid one.
    let outcome = service
        .assign_employees_to_department(department.id, &[999, jane.id])
        .unwrap();
    assert_eq!(outcome.assigned, vec![jane.id]);
    assert_eq!(outcome.skipped, vec![(999, SkipReason::NotFound)]);

    let info = service.employee_info(jane.id).unwrap();
    assert_eq!(info.department_name.as_deref(), Some("Eng"));
}

#[test]
fn batch_employee_assignment_skips_already_assigned_employees() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    service.add_department("Eng").unwrap();
    let sales = service.add_department("Sales").unwrap();
    let jane = service.add_employee("Jane", Some("Eng")).unwrap();
    let omar = service.add_employee("Omar", None).unwrap();

    let outcome = service
        .assign_employees_to_department(sales.id, &[jane.id, omar.id])
        .unwrap();
    assert_eq!(outcome.assigned, vec![omar.id]);
    assert_eq!(outcome.skipped, vec![(jane.id, SkipReason::AlreadyAssigned)]);
}

#[test]
fn assignment_to_unknown_department_fails_up_front() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    let err = service
        .assign_employees_to_department(12, &[1])
        .unwrap_err();
    assert!(matches!(err, ServiceError::DepartmentNotFound(12)));
}

#[test]
fn project_membership_is_replaced_with_department_roster() {
    let mut conn = open_db_in_memory().unwrap();

    // Seed through the repository: a project owned by Eng whose membership
    // still carries an employee from another department.
    let (eng_id, ana_id, ben_id, project_id) = {
        let mut repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
        let eng = repo.create_department("Eng").unwrap();
        let sales = repo.create_department("Sales").unwrap();
        let ana = repo.create_employee("Ana", Some(eng.id)).unwrap();
        let ben = repo.create_employee("Ben", Some(eng.id)).unwrap();
        let carl = repo.create_employee("Carl", Some(sales.id)).unwrap();
        let project = repo.create_project("Apollo", eng.id).unwrap();
        repo.set_project_members(project.id, &[carl.id]).unwrap();
        (eng.id, ana.id, ben.id, project.id)
    };

    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let mut service = OrgService::new(repo);
    let outcome = service
        .assign_projects_to_roster(eng_id, &[project_id])
        .unwrap();
    assert_eq!(outcome.assigned, vec![project_id]);
    assert!(outcome.skipped.is_empty());

    let members: Vec<i64> = service
        .project_members(project_id)
        .unwrap()
        .into_iter()
        .map(|employee| employee.id)
        .collect();
    assert_eq!(members, vec![ana_id, ben_id]);
}

#[test]
fn project_outside_chosen_department_is_skipped() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let mut service = OrgService::new(repo);

    let eng = service.add_department("Eng").unwrap();
    service.add_department("Sales").unwrap();
    service.add_employee("Ana", Some("Eng")).unwrap();
    let foreign = service.add_project("Pitch", "Sales").unwrap();

    let outcome = service
        .assign_projects_to_roster(eng.id, &[foreign.id, 404])
        .unwrap();
    assert!(outcome.assigned.is_empty());
    assert_eq!(
        outcome.skipped,
        vec![
            (foreign.id, SkipReason::OutsideDepartment),
            (404, SkipReason::NotFound),
        ]
    );
    assert!(service.project_members(foreign.id).unwrap().is_empty());
}

#[test]
fn deleting_employee_clears_head_slot_and_memberships() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let mut service = OrgService::new(repo);

    let eng = service.add_department("Eng").unwrap();
    let ana = service.add_employee("Ana", Some("Eng")).unwrap();
    let project = service.add_project("Apollo", "Eng").unwrap();
    service.set_department_head(eng.id, ana.id).unwrap();
    service
        .assign_projects_to_roster(eng.id, &[project.id])
        .unwrap();
    assert_eq!(service.project_members(project.id).unwrap().len(), 1);

    service.remove_employee(ana.id).unwrap();

    let departments = service.list_departments().unwrap();
    assert_eq!(departments[0].head_of_department_id, None);
    assert!(service.project_members(project.id).unwrap().is_empty());
    assert!(service.heads_of_departments().unwrap().is_empty());
}

#[test]
fn head_selection_failure_leaves_department_headless_but_present() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    let eng = service.add_department("Eng").unwrap();
    let err = service.set_department_head(eng.id, 31).unwrap_err();
    assert!(matches!(err, ServiceError::EmployeeNotFound(31)));

    let departments = service.list_departments().unwrap();
    assert_eq!(departments.len(), 1);
    assert_eq!(departments[0].head_of_department_id, None);
}

#[test]
fn available_employees_lists_only_unassigned_with_their_projects() {
    let mut conn = open_db_in_memory().unwrap();

    let free_id = {
        let mut repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
        let eng = repo.create_department("Eng").unwrap();
        repo.create_employee("Ana", Some(eng.id)).unwrap();
        let free = repo.create_employee("Ben", None).unwrap();
        let project = repo.create_project("Apollo", eng.id).unwrap();
        repo.set_project_members(project.id, &[free.id]).unwrap();
        free.id
    };

    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);
    let available = service.available_employees().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].employee.id, free_id);
    assert_eq!(available[0].project_names, vec!["Apollo".to_string()]);
}

#[test]
fn projects_by_departments_pairs_skip_empty_departments() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteOrgRepository::try_new(&mut conn).unwrap();
    let service = OrgService::new(repo);

    service.add_department("Eng").unwrap();
    service.add_department("Sales").unwrap();
    service.add_project("Apollo", "Eng").unwrap();
    service.add_project("Hermes", "Eng").unwrap();

    let pairs = service.projects_by_departments().unwrap();
    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|pair| pair.department_name == "Eng"));
}
