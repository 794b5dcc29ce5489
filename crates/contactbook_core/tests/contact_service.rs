mod common;

use common::registered_user;
use contactbook_core::db::open_db_in_memory;
use contactbook_core::model::contact::{
    CreateContactRequest, SearchContactRequest, UpdateContactRequest,
};
use contactbook_core::repo::SqliteContactRepository;
use contactbook_core::validation::ValidationError;
use contactbook_core::{ContactService, ServiceError};
use rusqlite::Connection;

fn contact_service(conn: &Connection) -> ContactService<SqliteContactRepository<'_>> {
    ContactService::new(SqliteContactRepository::try_new(conn).unwrap())
}

fn full_contact(first_name: &str, last_name: &str, email: &str, phone: &str) -> CreateContactRequest {
    CreateContactRequest {
        first_name: first_name.to_string(),
        last_name: Some(last_name.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
    }
}

fn search_by_name(name: &str) -> SearchContactRequest {
    SearchContactRequest {
        name: Some(name.to_string()),
        ..SearchContactRequest::default()
    }
}

#[test]
fn create_fills_absent_optionals_with_empty_strings() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");

    let created = contact_service(&conn)
        .create(&alice, CreateContactRequest::new("Bob"))
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.first_name, "Bob");
    assert_eq!(created.last_name, "");
    assert_eq!(created.email, "");
    assert_eq!(created.phone, "");
}

#[test]
fn create_then_get_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let service = contact_service(&conn);

    let created = service
        .create(
            &alice,
            full_contact("Budi", "Santoso", "budi@example.com", "+62 812-3456"),
        )
        .unwrap();
    let fetched = service.get(&alice, created.id).unwrap();

    assert_eq!(fetched, created);
}

#[test]
fn invalid_contact_is_rejected_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");

    let err = contact_service(&conn)
        .create(
            &alice,
            full_contact("Budi", "Santoso", "not-an-email", "+62 812-3456"),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidFormat { field: "email", .. })
    ));

    let stored: i64 = conn
        .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored, 0);
}

#[test]
fn foreign_contacts_look_missing() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let mallory = registered_user(&conn, "mallory");
    let service = contact_service(&conn);
    let bob = service
        .create(&alice, CreateContactRequest::new("Bob"))
        .unwrap();

    let replacement = UpdateContactRequest {
        first_name: "Hijacked".to_string(),
        last_name: None,
        email: None,
        phone: None,
    };
    for err in [
        service.get(&mallory, bob.id).unwrap_err(),
        service.update(&mallory, bob.id, replacement).unwrap_err(),
        service.delete(&mallory, bob.id).unwrap_err(),
        service.get(&alice, bob.id + 100).unwrap_err(),
    ] {
        assert!(matches!(err, ServiceError::NotFound("Contact not found")));
        assert_eq!(err.status_code(), 404);
    }

    assert_eq!(service.get(&alice, bob.id).unwrap().first_name, "Bob");
}

#[test]
fn update_replaces_every_field() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let service = contact_service(&conn);
    let created = service
        .create(
            &alice,
            full_contact("Budi", "Santoso", "budi@example.com", "+62 812-3456"),
        )
        .unwrap();

    let updated = service
        .update(
            &alice,
            created.id,
            UpdateContactRequest {
                first_name: "Budiman".to_string(),
                last_name: None,
                email: Some("budiman@example.com".to_string()),
                phone: None,
            },
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.first_name, "Budiman");
    assert_eq!(updated.last_name, "");
    assert_eq!(updated.email, "budiman@example.com");
    assert_eq!(updated.phone, "");
}

#[test]
fn invalid_ids_are_validation_errors() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");

    let err = contact_service(&conn).get(&alice, 0).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::NotPositive { field: "contact_id" })
    ));
}

#[test]
fn delete_removes_the_contact() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let service = contact_service(&conn);
    let bob = service
        .create(&alice, CreateContactRequest::new("Bob"))
        .unwrap();

    service.delete(&alice, bob.id).unwrap();
    assert!(matches!(
        service.get(&alice, bob.id),
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(&alice, bob.id),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn search_matches_either_name_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let service = contact_service(&conn);
    service
        .create(&alice, CreateContactRequest::new("Bob"))
        .unwrap();
    service
        .create(
            &alice,
            full_contact("Ani", "Bowo", "ani@example.com", "0812345678"),
        )
        .unwrap();
    service
        .create(&alice, CreateContactRequest::new("Carol"))
        .unwrap();

    let page = service.search(&alice, &search_by_name("BO")).unwrap();
    let names = page
        .data
        .iter()
        .map(|contact| contact.first_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Bob", "Ani"]);
    assert_eq!(page.paging.page, 1);
    assert_eq!(page.paging.limit, 10);
    assert_eq!(page.paging.total_page, 1);
}

#[test]
fn search_folds_case_beyond_ascii() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let service = contact_service(&conn);
    service
        .create(
            &alice,
            full_contact("Élodie", "Østergård", "elodie@example.com", "0812345678"),
        )
        .unwrap();
    service
        .create(&alice, CreateContactRequest::new("Eloise"))
        .unwrap();

    for needle in ["Élodie", "élodie", "ÉLODIE", "lodie", "ØSTER"] {
        let page = service.search(&alice, &search_by_name(needle)).unwrap();
        let names = page
            .data
            .iter()
            .map(|contact| contact.first_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Élodie"], "needle {needle}");
        assert_eq!(page.paging.total_page, 1);
    }
}

#[test]
fn search_criteria_are_conjunctive_and_owner_scoped() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let mallory = registered_user(&conn, "mallory");
    let service = contact_service(&conn);
    service
        .create(
            &alice,
            full_contact("Budi", "Santoso", "budi@example.com", "0812345678"),
        )
        .unwrap();
    service
        .create(
            &alice,
            full_contact("Budi", "Hartono", "budi@corp.example", "0899999999"),
        )
        .unwrap();
    service
        .create(
            &mallory,
            full_contact("Budi", "Mallory", "budi@example.com", "0812345678"),
        )
        .unwrap();

    let request = SearchContactRequest {
        name: Some("budi".to_string()),
        email: Some("EXAMPLE.COM".to_string()),
        phone: Some("0812".to_string()),
        ..SearchContactRequest::default()
    };
    let page = service.search(&alice, &request).unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].last_name, "Santoso");
}

#[test]
fn search_pages_are_bounded_by_limit() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let service = contact_service(&conn);
    for index in 0..7 {
        service
            .create(&alice, CreateContactRequest::new(format!("Friend {index}")))
            .unwrap();
    }

    let request = |page| SearchContactRequest {
        page,
        limit: 3,
        ..SearchContactRequest::default()
    };
    let first = service.search(&alice, &request(1)).unwrap();
    let last = service.search(&alice, &request(3)).unwrap();
    let beyond = service.search(&alice, &request(4)).unwrap();

    assert_eq!(first.data.len(), 3);
    assert_eq!(first.paging.total_page, 3);
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].first_name, "Friend 6");
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.paging.total_page, 3);
}

#[test]
fn empty_search_has_zero_pages() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");
    let service = contact_service(&conn);
    service
        .create(&alice, CreateContactRequest::new("Bob"))
        .unwrap();

    let page = service.search(&alice, &search_by_name("xyz")).unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.paging.total_page, 0);
}

#[test]
fn non_positive_paging_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let alice = registered_user(&conn, "alice123");

    let request = SearchContactRequest {
        limit: 0,
        ..SearchContactRequest::default()
    };
    let err = contact_service(&conn).search(&alice, &request).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::NotPositive { field: "limit" })
    ));
}
