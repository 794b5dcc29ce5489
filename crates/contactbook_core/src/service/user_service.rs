//! User lifecycle use-cases.
//!
//! # Responsibility
//! - Register users, issue and revoke session tokens, edit profiles.
//!
//! # Invariants
//! - Requests are validated before any repository access.
//! - Responses never echo password digests; tokens only after login.
//! - Username uniqueness is enforced by the store's primary key; the
//!   count pre-check only produces the friendly error early.

use crate::error::{ServiceError, ServiceResult};
use crate::logging::sanitize_for_log;
use crate::model::user::{
    fields, LoginUserRequest, NewUser, RegisterUserRequest, UpdateUserRequest, User, UserChanges,
    UserResponse,
};
use crate::query::Predicate;
use crate::repo::{RepoError, UserRepository};
use crate::security::{PasswordHasher, TokenGenerator};
use crate::validation::Validate;
use log::{info, warn};

pub const USER_EXISTS_MESSAGE: &str = "User already exists";
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password";

/// User use-case service over injected storage and credential primitives.
pub struct UserService<R: UserRepository, H: PasswordHasher, G: TokenGenerator> {
    users: R,
    hasher: H,
    tokens: G,
}

impl<R, H, G> UserService<R, H, G>
where
    R: UserRepository,
    H: PasswordHasher,
    G: TokenGenerator,
{
    pub fn new(users: R, hasher: H, tokens: G) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates a user without a session token.
    ///
    /// # Errors
    /// - `Validation` for malformed input.
    /// - `Conflict` when the username is taken, including a racing insert.
    pub fn register(&self, request: RegisterUserRequest) -> ServiceResult<UserResponse> {
        request.validate()?;
        let username = sanitize_for_log(&request.username);

        let by_username = Predicate::eq(fields::USERNAME, request.username.as_str());
        if self.users.count(&by_username)? != 0 {
            warn!("event=user_register module=service status=error username={username} reason=duplicate");
            return Err(ServiceError::Conflict(USER_EXISTS_MESSAGE));
        }

        let draft = NewUser {
            password_digest: self.hasher.hash(&request.password)?,
            username: request.username,
            name: request.name,
        };
        let user = match self.users.create(&draft) {
            Ok(user) => user,
            Err(RepoError::Conflict(_)) => {
                warn!("event=user_register module=service status=error username={username} reason=duplicate_race");
                return Err(ServiceError::Conflict(USER_EXISTS_MESSAGE));
            }
            Err(err) => return Err(err.into()),
        };

        info!("event=user_register module=service status=ok username={username}");
        Ok(UserResponse::from(&user))
    }

    /// Verifies credentials and issues a fresh session token.
    ///
    /// # Errors
    /// - `NotFound` when no user has the username.
    /// - `Unauthorized` when the password does not match.
    pub fn login(&self, request: LoginUserRequest) -> ServiceResult<UserResponse> {
        request.validate()?;
        let username = sanitize_for_log(&request.username);

        let by_username = Predicate::eq(fields::USERNAME, request.username.as_str());
        let Some(user) = self.users.find_one(&by_username)? else {
            warn!("event=user_login module=service status=error username={username} reason=unknown_user");
            return Err(ServiceError::NotFound(USER_NOT_FOUND_MESSAGE));
        };
        if !self.hasher.verify(&request.password, &user.password)? {
            warn!("event=user_login module=service status=error username={username} reason=bad_password");
            return Err(ServiceError::Unauthorized(INVALID_PASSWORD_MESSAGE));
        }

        let changes = UserChanges {
            token: Some(Some(self.tokens.new_token())),
            ..UserChanges::default()
        };
        let user = self
            .users
            .update(&by_username, &changes)?
            .ok_or(ServiceError::NotFound(USER_NOT_FOUND_MESSAGE))?;

        info!("event=user_login module=service status=ok username={username}");
        Ok(UserResponse::with_token(&user))
    }

    /// Shapes the already-authenticated identity.
    pub fn profile(&self, user: &User) -> UserResponse {
        UserResponse::from(user)
    }

    /// Applies the present fields; omitted fields keep their values.
    pub fn update(&self, user: &User, request: UpdateUserRequest) -> ServiceResult<UserResponse> {
        request.validate()?;

        let password_digest = match request.password.as_deref() {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let changes = UserChanges {
            name: request.name,
            password_digest,
            token: None,
        };
        let updated = self
            .users
            .update(&Predicate::eq(fields::USERNAME, user.username.as_str()), &changes)?
            .ok_or(ServiceError::NotFound(USER_NOT_FOUND_MESSAGE))?;

        info!(
            "event=user_update module=service status=ok username={} name_changed={} password_changed={}",
            sanitize_for_log(&updated.username),
            changes.name.is_some(),
            changes.password_digest.is_some()
        );
        Ok(UserResponse::from(&updated))
    }

    /// Clears the session token. Repeated calls leave the same state.
    pub fn logout(&self, user: &User) -> ServiceResult<()> {
        let changes = UserChanges {
            token: Some(None),
            ..UserChanges::default()
        };
        self.users
            .update(&Predicate::eq(fields::USERNAME, user.username.as_str()), &changes)?;

        info!(
            "event=user_logout module=service status=ok username={}",
            sanitize_for_log(&user.username)
        );
        Ok(())
    }
}
