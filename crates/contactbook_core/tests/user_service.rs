mod common;

use common::{register_request, registered_user, user_service};
use contactbook_core::db::open_db_in_memory;
use contactbook_core::model::user::{LoginUserRequest, UpdateUserRequest};
use contactbook_core::repo::SqliteUserRepository;
use contactbook_core::validation::ValidationError;
use contactbook_core::{
    Argon2PasswordHasher, AuthGuard, ServiceError, UserService, UuidTokenGenerator,
};

fn login_request(username: &str, password: &str) -> LoginUserRequest {
    LoginUserRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn register_returns_profile_without_token() {
    let conn = open_db_in_memory().unwrap();
    let response = user_service(&conn)
        .register(register_request("alice123", "secret123", "Alice"))
        .unwrap();

    assert_eq!(response.username, "alice123");
    assert_eq!(response.name, "Alice");
    assert_eq!(response.token, None);

    let stored: String = conn
        .query_row(
            "SELECT password FROM users WHERE username = 'alice123';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_ne!(stored, "secret123");
}

#[test]
fn duplicate_registration_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let service = user_service(&conn);
    service
        .register(register_request("alice123", "secret123", "Alice"))
        .unwrap();

    let err = service
        .register(register_request("alice123", "other1234", "Alice Two"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict("User already exists")));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn invalid_registration_touches_nothing() {
    let conn = open_db_in_memory().unwrap();
    let err = user_service(&conn)
        .register(register_request("al", "secret123", "Alice"))
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::TooShort {
            field: "username",
            min: 3
        })
    ));
    let users: i64 = conn
        .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(users, 0);
}

#[test]
fn login_issues_a_token_that_authenticates() {
    let conn = open_db_in_memory().unwrap();
    registered_user(&conn, "alice123");

    let response = user_service(&conn)
        .login(login_request("alice123", "secret123"))
        .unwrap();
    let token = response.token.unwrap();
    assert!(!token.is_empty());

    let guard = AuthGuard::new(SqliteUserRepository::try_new(&conn).unwrap());
    let user = guard
        .authenticate(Some(&format!("Bearer {token}")))
        .unwrap();
    assert_eq!(user.username, "alice123");
}

#[test]
fn login_failures_are_distinguished() {
    let conn = open_db_in_memory().unwrap();
    registered_user(&conn, "alice123");
    let service = user_service(&conn);

    let unknown = service
        .login(login_request("nobody", "secret123"))
        .unwrap_err();
    assert!(matches!(unknown, ServiceError::NotFound("User not found")));

    let wrong = service
        .login(login_request("alice123", "wrongpass"))
        .unwrap_err();
    assert!(matches!(wrong, ServiceError::Unauthorized("Invalid password")));
    assert_eq!(wrong.status_code(), 401);
}

#[test]
fn guard_rejects_missing_and_stale_tokens() {
    let conn = open_db_in_memory().unwrap();
    registered_user(&conn, "alice123");
    let guard = AuthGuard::new(SqliteUserRepository::try_new(&conn).unwrap());

    assert!(matches!(
        guard.authenticate(None),
        Err(ServiceError::Unauthorized(_))
    ));
    assert!(matches!(
        guard.authenticate(Some("Bearer never-issued")),
        Err(ServiceError::Unauthorized(_))
    ));
}

#[test]
fn update_applies_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let user = registered_user(&conn, "alice123");
    let service = user_service(&conn);

    let renamed = service
        .update(
            &user,
            UpdateUserRequest {
                name: Some("Alice Liddell".to_string()),
                password: None,
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Alice Liddell");
    service
        .login(login_request("alice123", "secret123"))
        .unwrap();

    let repassworded = service
        .update(
            &user,
            UpdateUserRequest {
                name: None,
                password: Some("newsecret".to_string()),
            },
        )
        .unwrap();
    assert_eq!(repassworded.name, "Alice Liddell");
    assert!(service
        .login(login_request("alice123", "secret123"))
        .is_err());
    service
        .login(login_request("alice123", "newsecret"))
        .unwrap();
}

#[test]
fn logout_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let user = registered_user(&conn, "alice123");
    let service = user_service(&conn);
    service
        .login(login_request("alice123", "secret123"))
        .unwrap();

    service.logout(&user).unwrap();
    service.logout(&user).unwrap();

    let token: Option<String> = conn
        .query_row(
            "SELECT token FROM users WHERE username = 'alice123';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(token, None);
}

#[test]
fn argon2_backed_service_round_trips_credentials() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(
        SqliteUserRepository::try_new(&conn).unwrap(),
        Argon2PasswordHasher,
        UuidTokenGenerator,
    );

    service
        .register(register_request("alice123", "secret123", "Alice"))
        .unwrap();
    let first = service
        .login(login_request("alice123", "secret123"))
        .unwrap()
        .token
        .unwrap();
    let second = service
        .login(login_request("alice123", "secret123"))
        .unwrap()
        .token
        .unwrap();
    assert_ne!(first, second);
    assert!(matches!(
        service.login(login_request("alice123", "secret124")),
        Err(ServiceError::Unauthorized(_))
    ));
}
