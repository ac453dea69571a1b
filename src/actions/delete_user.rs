use std::sync::Arc;

use crate::{DirectoryError, EntityKind, Services, User};

/// Action to delete a user and drop it from every group it belongs to.
pub struct DeleteUserAction<S: Services> {
    services: Arc<S>,
}

impl<S: Services> DeleteUserAction<S> {
    pub fn new(services: Arc<S>) -> Self {
        DeleteUserAction { services }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "delete_user", skip_all, fields(user = %user), err)
    )]
    pub fn execute(&self, user: &User) -> Result<(), DirectoryError> {
        let users = self.services.user_repository();
        if users.find_by_name(user.name())?.is_none() {
            return Err(DirectoryError::NotFound {
                kind: EntityKind::User,
                name: user.name().to_owned(),
            });
        }

        let membership = self.services.membership_service();
        let groups = membership.get_groups_for_user(Some(user))?;
        for group in &groups {
            membership.remove_user_from_group(Some(user), Some(group))?;
        }

        users.delete(user)?;

        log::info!(
            target: "usergroups",
            "msg=\"user deleted\", user=\"{user}\", groups_removed={}",
            groups.len()
        );

        Ok(())
    }
}
