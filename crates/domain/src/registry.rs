use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::user::User;
use crate::validation::{validate_password, validate_username};

/// All registered users, loaded and saved as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    users: Vec<User>,
}

impl Registry {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn into_users(self) -> Vec<User> {
        self.users
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name() == name)
    }

    /// Registers a user under the trimmed `name`.
    pub fn register(
        &mut self,
        name: Option<&str>,
        password: Option<&str>,
        cost: u32,
    ) -> Result<&User, DomainError> {
        let name = validate_username(name)?;
        if self.user(name).is_some() {
            return Err(DomainError::UsernameTaken);
        }
        let password = validate_password(password)?;

        self.users.push(User::new(name, password, cost)?);
        Ok(&self.users[self.users.len() - 1])
    }

    pub fn sign_in(&self, name: &str, password: Option<&str>) -> Result<&User, DomainError> {
        let user = self.user(name).ok_or(DomainError::UnknownUser)?;
        let password = password.ok_or(DomainError::SignInPasswordMissing)?;
        if !user.correct_password(password) {
            return Err(DomainError::WrongPassword);
        }
        Ok(user)
    }
}
