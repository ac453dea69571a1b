use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::config::NameConfig;
use crate::repository::{User, UserRepository};
use crate::validators::validate_name;
use crate::{DirectoryError, EntityKind};

pub struct MemoryUserRepository {
    users: RwLock<BTreeMap<String, User>>,
    config: NameConfig,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::with_config(NameConfig::default())
    }

    pub fn with_config(config: NameConfig) -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            config,
        }
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for MemoryUserRepository {
    fn create(&self, user: User) -> Result<User, DirectoryError> {
        validate_name(user.name(), &self.config)?;

        let mut users = self
            .users
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        if users.contains_key(user.name()) {
            return Err(DirectoryError::AlreadyExists {
                kind: EntityKind::User,
                name: user.name().to_owned(),
            });
        }
        users.insert(user.name().to_owned(), user.clone());
        drop(users);

        log::debug!(target: "usergroups", "msg=\"user created\", user=\"{user}\"");

        Ok(user)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<User>, DirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(users.get(name).cloned())
    }

    fn delete(&self, user: &User) -> Result<(), DirectoryError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        if users.remove(user.name()).is_none() {
            return Err(DirectoryError::NotFound {
                kind: EntityKind::User,
                name: user.name().to_owned(),
            });
        }
        drop(users);

        log::debug!(target: "usergroups", "msg=\"user deleted\", user=\"{user}\"");

        Ok(())
    }

    fn list(&self) -> Result<Vec<User>, DirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(users.values().cloned().collect())
    }
}
