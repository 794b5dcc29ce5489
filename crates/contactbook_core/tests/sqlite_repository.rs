use contactbook_core::db::open_db_in_memory;
use contactbook_core::model::address::{AddressChanges, NewAddress};
use contactbook_core::model::contact::{ContactChanges, NewContact};
use contactbook_core::model::user::{NewUser, UserChanges};
use contactbook_core::query::{Pagination, Predicate};
use contactbook_core::repo::{
    RepoError, ResourceRepository, SqliteAddressRepository, SqliteContactRepository,
    SqliteUserRepository,
};
use rusqlite::Connection;

fn seed_user(conn: &Connection, username: &str) {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create(&NewUser {
            username: username.to_string(),
            name: "Seeded".to_string(),
            password_digest: "digest".to_string(),
        })
        .unwrap();
}

fn new_contact(username: &str, first_name: &str) -> NewContact {
    NewContact {
        username: username.to_string(),
        first_name: first_name.to_string(),
        last_name: None,
        email: None,
        phone: None,
    }
}

fn new_address(contact_id: i64) -> NewAddress {
    NewAddress {
        contact_id,
        street: Some("Jalan Merdeka".to_string()),
        city: None,
        province: None,
        country: "Indonesia".to_string(),
        postal_code: "40111".to_string(),
    }
}

#[test]
fn duplicate_username_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "alice123");

    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let err = repo
        .create(&NewUser {
            username: "alice123".to_string(),
            name: "Other".to_string(),
            password_digest: "digest".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)), "got {err}");
}

#[test]
fn token_can_be_set_and_cleared() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "alice123");
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let by_name = Predicate::eq("username", "alice123");

    let issued = repo
        .update(
            &by_name,
            &UserChanges {
                token: Some(Some("abc".to_string())),
                ..UserChanges::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(issued.token.as_deref(), Some("abc"));
    assert!(repo.find_one(&Predicate::eq("token", "abc")).unwrap().is_some());

    let cleared = repo
        .update(
            &by_name,
            &UserChanges {
                token: Some(None),
                ..UserChanges::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(cleared.token, None);
    assert_eq!(cleared.name, "Seeded");
}

#[test]
fn contact_without_owner_is_a_missing_parent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();

    let err = repo.create(&new_contact("ghost", "Nobody")).unwrap_err();
    assert!(matches!(err, RepoError::MissingParent(_)), "got {err}");
}

#[test]
fn scoped_update_and_delete_ignore_foreign_rows() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "alice123");
    seed_user(&conn, "mallory");
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let contact = repo.create(&new_contact("alice123", "Bob")).unwrap();

    let foreign_scope = Predicate::and([
        Predicate::eq("id", contact.id),
        Predicate::eq("username", "mallory"),
    ]);
    let changes = ContactChanges {
        first_name: "Hijacked".to_string(),
        last_name: None,
        email: None,
        phone: None,
    };
    assert_eq!(repo.update(&foreign_scope, &changes).unwrap(), None);
    assert_eq!(repo.delete(&foreign_scope).unwrap(), None);

    let stored = repo
        .find_one(&Predicate::eq("id", contact.id))
        .unwrap()
        .unwrap();
    assert_eq!(stored.first_name, "Bob");
}

#[test]
fn search_is_case_insensitive_and_treats_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "alice123");
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    repo.create(&new_contact("alice123", "Bobby")).unwrap();
    repo.create(&new_contact("alice123", "100%_real")).unwrap();
    repo.create(&new_contact("alice123", "Carol")).unwrap();

    let bo = Predicate::contains_insensitive("first_name", "BO");
    assert_eq!(repo.count(&bo).unwrap(), 1);

    let percent = Predicate::contains_insensitive("first_name", "%_");
    let hits = repo
        .find_many(&percent, Pagination::try_new(1, 10).unwrap().window())
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].first_name, "100%_real");
}

#[test]
fn find_many_pages_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "alice123");
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let created = (0..5)
        .map(|index| {
            repo.create(&new_contact("alice123", &format!("Contact {index}")))
                .unwrap()
        })
        .collect::<Vec<_>>();

    let owner = Predicate::eq("username", "alice123");
    let second_page = repo
        .find_many(&owner, Pagination::try_new(2, 2).unwrap().window())
        .unwrap();
    let ids = second_page.iter().map(|contact| contact.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![created[2].id, created[3].id]);

    let last_page = repo
        .find_many(&owner, Pagination::try_new(3, 2).unwrap().window())
        .unwrap();
    assert_eq!(last_page.len(), 1);
}

#[test]
fn address_patch_keeps_absent_fields_and_empty_patch_reads_back() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "alice123");
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let contact = contacts.create(&new_contact("alice123", "Bob")).unwrap();
    let address = addresses.create(&new_address(contact.id)).unwrap();
    let scope = Predicate::eq("id", address.id);

    let patched = addresses
        .update(
            &scope,
            &AddressChanges {
                city: Some("Bandung".to_string()),
                ..AddressChanges::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(patched.city.as_deref(), Some("Bandung"));
    assert_eq!(patched.street.as_deref(), Some("Jalan Merdeka"));

    let unchanged = addresses
        .update(&scope, &AddressChanges::default())
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, patched);
}

#[test]
fn deleting_contact_cascades_to_addresses() {
    let conn = open_db_in_memory().unwrap();
    seed_user(&conn, "alice123");
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let contact = contacts.create(&new_contact("alice123", "Bob")).unwrap();
    addresses.create(&new_address(contact.id)).unwrap();
    addresses.create(&new_address(contact.id)).unwrap();

    contacts
        .delete(&Predicate::eq("id", contact.id))
        .unwrap()
        .unwrap();

    let remaining = addresses
        .count(&Predicate::eq("contact_id", contact.id))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn address_for_missing_contact_is_a_missing_parent() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();

    let err = addresses.create(&new_address(4242)).unwrap_err();
    assert!(matches!(err, RepoError::MissingParent(_)), "got {err}");
}
