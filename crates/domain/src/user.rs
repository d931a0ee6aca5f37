use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub use bcrypt::DEFAULT_COST;

/// A stored password verifier. The plaintext is never kept.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn hash(password: &str, cost: u32) -> Result<Self, DomainError> {
        bcrypt::hash(password, cost)
            .map(Self)
            .map_err(|e| DomainError::CredentialHash(e.to_string()))
    }

    /// A malformed stored hash never verifies.
    pub fn verify(&self, attempt: &str) -> bool {
        bcrypt::verify(attempt, &self.0).unwrap_or(false)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: String,
    credential: Credential,
}

impl User {
    pub fn new(name: &str, password: &str, cost: u32) -> Result<Self, DomainError> {
        Ok(Self {
            name: name.to_string(),
            credential: Credential::hash(password, cost)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn correct_password(&self, attempt: &str) -> bool {
        self.credential.verify(attempt)
    }
}
