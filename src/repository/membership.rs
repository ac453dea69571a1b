use std::collections::BTreeSet;

use super::{Group, User};
use crate::DirectoryError;

/// Direct user-in-group and group-in-group relations.
///
/// Absent arguments are passed as `None` and always fail with
/// [`DirectoryError::NullInput`] before any lookup happens. Only mutations that
/// add to a relation check that the named entities exist; they fail with
/// [`DirectoryError::InvalidArgument`] otherwise.
///
/// Membership is never transitive: a user in a child group is not reported
/// as a member of the parent, and a grandchild is not a child of its
/// grandparent.
pub trait MembershipService: Send + Sync {
    /// Adds `user` to `group`. Adding an existing member is a no-op.
    fn add_user_to_group(
        &self,
        user: Option<&User>,
        group: Option<&Group>,
    ) -> Result<(), DirectoryError>;

    /// Removes `user` from `group`. Removing a non-member is a no-op.
    fn remove_user_from_group(
        &self,
        user: Option<&User>,
        group: Option<&Group>,
    ) -> Result<(), DirectoryError>;

    fn is_user_in_group(
        &self,
        user: Option<&User>,
        group: Option<&Group>,
    ) -> Result<bool, DirectoryError>;

    /// Direct members of `group`, empty if it never had any.
    fn get_users_in_group(&self, group: Option<&Group>) -> Result<BTreeSet<User>, DirectoryError>;

    /// Clears every member of `group`.
    fn remove_users_from_group(&self, group: Option<&Group>) -> Result<(), DirectoryError>;

    /// Makes `child` a direct child of `parent`. Cycles are not rejected.
    fn add_group_to_group(
        &self,
        child: Option<&Group>,
        parent: Option<&Group>,
    ) -> Result<(), DirectoryError>;

    fn remove_group_from_group(
        &self,
        child: Option<&Group>,
        parent: Option<&Group>,
    ) -> Result<(), DirectoryError>;

    fn is_group_in_group(
        &self,
        child: Option<&Group>,
        parent: Option<&Group>,
    ) -> Result<bool, DirectoryError>;

    /// Direct children of `parent`.
    fn get_child_groups(&self, parent: Option<&Group>) -> Result<BTreeSet<Group>, DirectoryError>;

    /// Groups that hold `child` as a direct child.
    fn get_parent_groups(&self, child: Option<&Group>) -> Result<BTreeSet<Group>, DirectoryError>;

    /// Groups that hold `user` as a direct member.
    fn get_groups_for_user(&self, user: Option<&User>) -> Result<BTreeSet<Group>, DirectoryError>;

    /// Clears every child of `parent`.
    fn remove_child_groups(&self, parent: Option<&Group>) -> Result<(), DirectoryError>;
}
