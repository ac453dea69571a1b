use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DirectoryError;

/// A group, identified by a unique, case-sensitive name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Group {
    name: String,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Canonical store of groups.
pub trait GroupRepository: Send + Sync {
    /// Registers a new group. Fails with `AlreadyExists` if the name is taken.
    fn create(&self, group: Group) -> Result<Group, DirectoryError>;
    fn find_by_name(&self, name: &str) -> Result<Option<Group>, DirectoryError>;
    /// Removes the group.
    ///
    /// Membership and hierarchy entries that mention the group are not purged;
    /// use [`DeleteGroupAction`](crate::DeleteGroupAction) for that.
    fn delete(&self, group: &Group) -> Result<(), DirectoryError>;
    /// All groups, ordered by name.
    fn list(&self) -> Result<Vec<Group>, DirectoryError>;
}
