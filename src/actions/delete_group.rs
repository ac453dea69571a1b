use std::sync::Arc;

use crate::{DirectoryError, EntityKind, Group, Services};

/// Action to delete a group together with every relation it takes part in.
///
/// This action:
/// 1. Verifies the group exists
/// 2. Clears its members
/// 3. Detaches it from every parent group
/// 4. Clears its child groups
/// 5. Deletes it from the group repository
///
/// A group re-created under the same name therefore starts out empty.
pub struct DeleteGroupAction<S: Services> {
    services: Arc<S>,
}

impl<S: Services> DeleteGroupAction<S> {
    pub fn new(services: Arc<S>) -> Self {
        DeleteGroupAction { services }
    }

    /// # Returns
    ///
    /// - `Ok(())` - Group and its relations removed
    /// - `Err(DirectoryError::NotFound)` - Group does not exist
    /// - `Err(_)` - Internal errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "delete_group", skip_all, fields(group = %group), err)
    )]
    pub fn execute(&self, group: &Group) -> Result<(), DirectoryError> {
        let groups = self.services.group_repository();
        if groups.find_by_name(group.name())?.is_none() {
            return Err(DirectoryError::NotFound {
                kind: EntityKind::Group,
                name: group.name().to_owned(),
            });
        }

        let membership = self.services.membership_service();
        membership.remove_users_from_group(Some(group))?;
        for parent in membership.get_parent_groups(Some(group))? {
            membership.remove_group_from_group(Some(group), Some(&parent))?;
        }
        membership.remove_child_groups(Some(group))?;

        groups.delete(group)?;

        log::info!(target: "usergroups", "msg=\"group deleted\", group=\"{group}\"");

        Ok(())
    }
}
