//! User use-case service.
//!
//! # Responsibility
//! - Sign users up with hashed passwords.
//! - Authenticate username/password pairs into a `Session`.
//! - Provide lookup, update and delete by id.
//!
//! # Invariants
//! - Email and username uniqueness come from store constraints; duplicate
//!   violations are translated, never pre-checked.
//! - Update/delete return the row as it was before the mutation.

use super::error::{ServiceError, ServiceResult};
use crate::auth::{hash_password, verify_password, Session};
use crate::model::user::{User, UserFields, UserId};
use crate::model::ValidationError;
use crate::repo::error::RepoError;
use crate::repo::user_repo::UserRepository;
use log::{info, warn};

/// Input for creating a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Replacement values for an existing account.
///
/// `password: None` keeps the stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: Option<String>,
}

/// User service facade over a repository implementation.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an account; the password is hashed before storage.
    ///
    /// # Errors
    /// - `EmailTaken` / `UsernameTaken` on unique violations.
    /// - `Validation` for blank or malformed fields.
    pub fn signup(&self, request: &SignupRequest) -> ServiceResult<User> {
        if request.password.is_empty() {
            return Err(ValidationError::BlankField("password").into());
        }

        let fields = UserFields::new(
            request.name.as_str(),
            request.email.as_str(),
            request.username.as_str(),
            hash_password(&request.password)?,
        );
        fields.validate()?;

        let user = self
            .repo
            .create_user(&fields)
            .map_err(|err| map_user_conflict(err, &fields))?;
        info!("event=user_signup module=service status=ok id={}", user.id);
        Ok(user)
    }

    /// Verifies credentials and opens a session for the matching user.
    ///
    /// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
    pub fn authenticate(&self, username: &str, password: &str) -> ServiceResult<Session> {
        let user = match self.repo.get_user_by_username(username) {
            Ok(user) => user,
            Err(RepoError::NotFound { .. }) => {
                info!("event=user_login module=service status=denied reason=unknown_user");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(err) => return Err(err.into()),
        };

        if !verify_password(password, &user.password_hash)? {
            info!(
                "event=user_login module=service status=denied reason=bad_password id={}",
                user.id
            );
            return Err(ServiceError::InvalidCredentials);
        }

        info!("event=user_login module=service status=ok id={}", user.id);
        Ok(Session::for_user(&user))
    }

    pub fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.repo.list_users()?)
    }

    pub fn get_user(&self, id: UserId) -> ServiceResult<User> {
        Ok(self.repo.get_user(id)?)
    }

    pub fn get_user_by_email(&self, email: &str) -> ServiceResult<User> {
        Ok(self.repo.get_user_by_email(email)?)
    }

    /// Replaces the account fields of user `id`.
    ///
    /// Returns the previous snapshot.
    pub fn update_user(&self, id: UserId, update: &UserUpdate) -> ServiceResult<User> {
        let existing = self.repo.get_user(id)?;

        let password_hash = match update.password.as_deref() {
            Some(password) if !password.is_empty() => hash_password(password)?,
            _ => existing.password_hash.clone(),
        };
        let fields = UserFields::new(
            update.name.as_str(),
            update.email.as_str(),
            update.username.as_str(),
            password_hash,
        );

        if let Err(err) = self.repo.update_user(id, &fields) {
            warn!(
                "event=user_update module=service status=error id={} error={}",
                id, err
            );
            return Err(map_user_conflict(err, &fields));
        }
        Ok(existing)
    }

    /// Deletes user `id` and returns the removed row.
    ///
    /// Posts and comments owned by the user are removed by cascade.
    pub fn delete_user(&self, id: UserId) -> ServiceResult<User> {
        let existing = self.repo.get_user(id)?;
        if let Err(err) = self.repo.delete_user(id) {
            warn!(
                "event=user_delete module=service status=error id={} error={}",
                id, err
            );
            return Err(err.into());
        }
        Ok(existing)
    }
}

fn map_user_conflict(err: RepoError, fields: &UserFields) -> ServiceError {
    if err.is_duplicate_of("users.email") {
        return ServiceError::EmailTaken(fields.email.clone());
    }
    if err.is_duplicate_of("users.username") {
        return ServiceError::UsernameTaken(fields.username.clone());
    }
    err.into()
}
