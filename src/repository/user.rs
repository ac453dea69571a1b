use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DirectoryError;

/// A user, identified by a unique, case-sensitive name.
///
/// Equality, hashing and ordering all go through the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct User {
    name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Canonical store of users.
pub trait UserRepository: Send + Sync {
    /// Registers a new user. Fails with `AlreadyExists` if the name is taken.
    fn create(&self, user: User) -> Result<User, DirectoryError>;
    fn find_by_name(&self, name: &str) -> Result<Option<User>, DirectoryError>;
    /// Removes the user. Relations held by the membership service are untouched.
    fn delete(&self, user: &User) -> Result<(), DirectoryError>;
    /// All users, ordered by name.
    fn list(&self) -> Result<Vec<User>, DirectoryError>;
}
