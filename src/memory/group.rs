use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::config::NameConfig;
use crate::repository::{Group, GroupRepository};
use crate::validators::validate_name;
use crate::{DirectoryError, EntityKind};

pub struct MemoryGroupRepository {
    groups: RwLock<BTreeMap<String, Group>>,
    config: NameConfig,
}

impl MemoryGroupRepository {
    pub fn new() -> Self {
        Self::with_config(NameConfig::default())
    }

    pub fn with_config(config: NameConfig) -> Self {
        Self {
            groups: RwLock::new(BTreeMap::new()),
            config,
        }
    }
}

impl Default for MemoryGroupRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupRepository for MemoryGroupRepository {
    fn create(&self, group: Group) -> Result<Group, DirectoryError> {
        validate_name(group.name(), &self.config)?;

        let mut groups = self
            .groups
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        if groups.contains_key(group.name()) {
            return Err(DirectoryError::AlreadyExists {
                kind: EntityKind::Group,
                name: group.name().to_owned(),
            });
        }
        groups.insert(group.name().to_owned(), group.clone());
        drop(groups);

        log::debug!(target: "usergroups", "msg=\"group created\", group=\"{group}\"");

        Ok(group)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Group>, DirectoryError> {
        let groups = self
            .groups
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(groups.get(name).cloned())
    }

    fn delete(&self, group: &Group) -> Result<(), DirectoryError> {
        let mut groups = self
            .groups
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        if groups.remove(group.name()).is_none() {
            return Err(DirectoryError::NotFound {
                kind: EntityKind::Group,
                name: group.name().to_owned(),
            });
        }
        drop(groups);

        log::debug!(target: "usergroups", "msg=\"group deleted\", group=\"{group}\"");

        Ok(())
    }

    fn list(&self) -> Result<Vec<Group>, DirectoryError> {
        let groups = self
            .groups
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(groups.values().cloned().collect())
    }
}
