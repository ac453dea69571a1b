use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, Weak};

use crate::repository::{Group, MembershipService, User};
use crate::services::Services;
use crate::{require_non_null, DirectoryError, EntityKind};

/// Stores user and group relationships in memory.
///
/// Relation entries are created on first insertion and are never dropped when
/// the user or group is deleted from its repository; callers clear them with
/// the explicit removal operations.
pub struct MemoryMembershipService {
    services: Weak<dyn Services>,
    child_groups_by_parent: RwLock<HashMap<Group, BTreeSet<Group>>>,
    users_by_group: RwLock<HashMap<Group, BTreeSet<User>>>,
}

impl MemoryMembershipService {
    pub fn new(services: Weak<dyn Services>) -> Self {
        Self {
            services,
            child_groups_by_parent: RwLock::new(HashMap::new()),
            users_by_group: RwLock::new(HashMap::new()),
        }
    }

    fn services(&self) -> Result<Arc<dyn Services>, DirectoryError> {
        self.services
            .upgrade()
            .ok_or_else(|| DirectoryError::Internal("services have been dropped".into()))
    }

    fn require_user_exists(&self, user: &User, role: &'static str) -> Result<(), DirectoryError> {
        let services = self.services()?;
        if services.user_repository().find_by_name(user.name())?.is_none() {
            return Err(DirectoryError::InvalidArgument {
                kind: EntityKind::User,
                role,
                name: user.name().to_owned(),
            });
        }
        Ok(())
    }

    fn require_group_exists(&self, group: &Group, role: &'static str) -> Result<(), DirectoryError> {
        let services = self.services()?;
        if services.group_repository().find_by_name(group.name())?.is_none() {
            return Err(DirectoryError::InvalidArgument {
                kind: EntityKind::Group,
                role,
                name: group.name().to_owned(),
            });
        }
        Ok(())
    }
}

impl MembershipService for MemoryMembershipService {
    fn add_user_to_group(
        &self,
        user: Option<&User>,
        group: Option<&Group>,
    ) -> Result<(), DirectoryError> {
        let user = require_non_null(user, "user")?;
        let group = require_non_null(group, "group")?;
        self.require_user_exists(user, "user")?;
        self.require_group_exists(group, "group")?;

        let mut users_by_group = self
            .users_by_group
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        users_by_group
            .entry(group.clone())
            .or_default()
            .insert(user.clone());
        drop(users_by_group);

        log::debug!(
            target: "usergroups",
            "msg=\"user added to group\", user=\"{user}\", group=\"{group}\""
        );

        Ok(())
    }

    fn remove_user_from_group(
        &self,
        user: Option<&User>,
        group: Option<&Group>,
    ) -> Result<(), DirectoryError> {
        let user = require_non_null(user, "user")?;
        let group = require_non_null(group, "group")?;

        let mut users_by_group = self
            .users_by_group
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        if let Some(users) = users_by_group.get_mut(group) {
            users.remove(user);
            log::debug!(
                target: "usergroups",
                "msg=\"user removed from group\", user=\"{user}\", group=\"{group}\""
            );
        }

        Ok(())
    }

    fn is_user_in_group(
        &self,
        user: Option<&User>,
        group: Option<&Group>,
    ) -> Result<bool, DirectoryError> {
        let user = require_non_null(user, "user")?;
        let group = require_non_null(group, "group")?;

        // direct memberships only
        let users_by_group = self
            .users_by_group
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(users_by_group
            .get(group)
            .is_some_and(|users| users.contains(user)))
    }

    fn get_users_in_group(&self, group: Option<&Group>) -> Result<BTreeSet<User>, DirectoryError> {
        let group = require_non_null(group, "group")?;

        let users_by_group = self
            .users_by_group
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        let users = users_by_group.get(group).cloned().unwrap_or_default();

        log::trace!(
            target: "usergroups",
            "msg=\"users in group\", group=\"{group}\", count={}",
            users.len()
        );

        Ok(users)
    }

    fn remove_users_from_group(&self, group: Option<&Group>) -> Result<(), DirectoryError> {
        let group = require_non_null(group, "group")?;

        let mut users_by_group = self
            .users_by_group
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        if let Some(users) = users_by_group.get_mut(group) {
            users.clear();
            log::debug!(target: "usergroups", "msg=\"group members cleared\", group=\"{group}\"");
        }

        Ok(())
    }

    fn add_group_to_group(
        &self,
        child: Option<&Group>,
        parent: Option<&Group>,
    ) -> Result<(), DirectoryError> {
        let child = require_non_null(child, "child")?;
        let parent = require_non_null(parent, "parent")?;
        self.require_group_exists(parent, "parent")?;
        self.require_group_exists(child, "child")?;

        let mut child_groups_by_parent = self
            .child_groups_by_parent
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        child_groups_by_parent
            .entry(parent.clone())
            .or_default()
            .insert(child.clone());
        drop(child_groups_by_parent);

        log::debug!(
            target: "usergroups",
            "msg=\"child group added\", child=\"{child}\", parent=\"{parent}\""
        );

        Ok(())
    }

    fn remove_group_from_group(
        &self,
        child: Option<&Group>,
        parent: Option<&Group>,
    ) -> Result<(), DirectoryError> {
        let child = require_non_null(child, "child")?;
        let parent = require_non_null(parent, "parent")?;

        let mut child_groups_by_parent = self
            .child_groups_by_parent
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        if let Some(children) = child_groups_by_parent.get_mut(parent) {
            children.remove(child);
        }

        Ok(())
    }

    fn is_group_in_group(
        &self,
        child: Option<&Group>,
        parent: Option<&Group>,
    ) -> Result<bool, DirectoryError> {
        let child = require_non_null(child, "child")?;
        let parent = require_non_null(parent, "parent")?;

        // one level only, no ancestor walk
        let child_groups_by_parent = self
            .child_groups_by_parent
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(child_groups_by_parent
            .get(parent)
            .is_some_and(|children| children.contains(child)))
    }

    fn get_child_groups(&self, parent: Option<&Group>) -> Result<BTreeSet<Group>, DirectoryError> {
        let parent = require_non_null(parent, "parent")?;

        let child_groups_by_parent = self
            .child_groups_by_parent
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(child_groups_by_parent
            .get(parent)
            .cloned()
            .unwrap_or_default())
    }

    fn get_parent_groups(&self, child: Option<&Group>) -> Result<BTreeSet<Group>, DirectoryError> {
        let child = require_non_null(child, "child")?;

        let child_groups_by_parent = self
            .child_groups_by_parent
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(child_groups_by_parent
            .iter()
            .filter(|(_, children)| children.contains(child))
            .map(|(parent, _)| parent.clone())
            .collect())
    }

    fn get_groups_for_user(&self, user: Option<&User>) -> Result<BTreeSet<Group>, DirectoryError> {
        let user = require_non_null(user, "user")?;

        let users_by_group = self
            .users_by_group
            .read()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        Ok(users_by_group
            .iter()
            .filter(|(_, users)| users.contains(user))
            .map(|(group, _)| group.clone())
            .collect())
    }

    fn remove_child_groups(&self, parent: Option<&Group>) -> Result<(), DirectoryError> {
        let parent = require_non_null(parent, "parent")?;

        let mut child_groups_by_parent = self
            .child_groups_by_parent
            .write()
            .map_err(|_| DirectoryError::lock_poisoned())?;
        if let Some(children) = child_groups_by_parent.get_mut(parent) {
            children.clear();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceFactory;

    struct Fixture {
        services: Arc<ServiceFactory>,
        fred: User,
        george: User,
        admins: Group,
        hackers: Group,
        app_users: Group,
    }

    fn setup() -> Fixture {
        let services = ServiceFactory::create_services();
        let fred = services.user_repository().create(User::new("fred")).unwrap();
        let george = services.user_repository().create(User::new("george")).unwrap();
        let admins = services.group_repository().create(Group::new("admins")).unwrap();
        let hackers = services.group_repository().create(Group::new("hackers")).unwrap();
        let app_users = services
            .group_repository()
            .create(Group::new("app-users"))
            .unwrap();

        Fixture {
            services,
            fred,
            george,
            admins,
            hackers,
            app_users,
        }
    }

    #[test]
    fn test_add_user_to_group_duplicate() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_user_to_group(Some(&f.fred), Some(&f.hackers)).unwrap();
        membership.add_user_to_group(Some(&f.george), Some(&f.hackers)).unwrap();
        let users: Vec<User> = membership
            .get_users_in_group(Some(&f.hackers))
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(users, vec![f.fred.clone(), f.george.clone()]);

        membership.add_user_to_group(Some(&f.fred), Some(&f.hackers)).unwrap();
        let users: Vec<User> = membership
            .get_users_in_group(Some(&f.hackers))
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(users, vec![f.fred, f.george]);
    }

    #[test]
    fn test_add_user_twice_keeps_single_member() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_user_to_group(Some(&f.fred), Some(&f.app_users)).unwrap();
        membership.add_user_to_group(Some(&f.fred), Some(&f.app_users)).unwrap();

        let users = membership.get_users_in_group(Some(&f.app_users)).unwrap();
        assert_eq!(users.len(), 1);
        assert!(users.contains(&f.fred));
    }

    #[test]
    fn test_add_user_to_group_no_such_group() {
        let f = setup();
        let nogroup = Group::new("nogroup");

        let result = f
            .services
            .membership_service()
            .add_user_to_group(Some(&f.fred), Some(&nogroup));
        assert_eq!(
            result.unwrap_err(),
            DirectoryError::InvalidArgument {
                kind: EntityKind::Group,
                role: "group",
                name: "nogroup".to_owned(),
            }
        );
    }

    #[test]
    fn test_add_user_to_group_no_such_user() {
        let f = setup();
        let nobody = User::new("nobody");

        let result = f
            .services
            .membership_service()
            .add_user_to_group(Some(&nobody), Some(&f.hackers));
        assert_eq!(
            result.unwrap_err(),
            DirectoryError::InvalidArgument {
                kind: EntityKind::User,
                role: "user",
                name: "nobody".to_owned(),
            }
        );
    }

    #[test]
    fn test_null_takes_priority_over_missing_entity() {
        let f = setup();
        let membership = f.services.membership_service();
        let nobody = User::new("nobody");

        let result = membership.add_user_to_group(Some(&nobody), None);
        assert_eq!(
            result.unwrap_err(),
            DirectoryError::NullInput { argument: "group" }
        );

        let result = membership.add_group_to_group(None, Some(&Group::new("nogroup")));
        assert_eq!(
            result.unwrap_err(),
            DirectoryError::NullInput { argument: "child" }
        );
    }

    #[test]
    fn test_null_guards() {
        let f = setup();
        let m = f.services.membership_service();
        let null = |argument| DirectoryError::NullInput { argument };

        assert_eq!(m.add_user_to_group(None, Some(&f.hackers)), Err(null("user")));
        assert_eq!(m.add_user_to_group(Some(&f.fred), None), Err(null("group")));
        assert_eq!(m.remove_user_from_group(None, Some(&f.admins)), Err(null("user")));
        assert_eq!(m.remove_user_from_group(Some(&f.fred), None), Err(null("group")));
        assert_eq!(m.is_user_in_group(None, Some(&f.admins)), Err(null("user")));
        assert_eq!(m.is_user_in_group(Some(&f.fred), None), Err(null("group")));
        assert_eq!(m.get_users_in_group(None), Err(null("group")));
        assert_eq!(m.remove_users_from_group(None), Err(null("group")));
        assert_eq!(m.add_group_to_group(None, Some(&f.admins)), Err(null("child")));
        assert_eq!(m.add_group_to_group(Some(&f.admins), None), Err(null("parent")));
        assert_eq!(m.remove_group_from_group(None, Some(&f.admins)), Err(null("child")));
        assert_eq!(m.remove_group_from_group(Some(&f.admins), None), Err(null("parent")));
        assert_eq!(m.is_group_in_group(None, Some(&f.admins)), Err(null("child")));
        assert_eq!(m.is_group_in_group(Some(&f.admins), None), Err(null("parent")));
        assert_eq!(m.get_child_groups(None), Err(null("parent")));
        assert_eq!(m.get_parent_groups(None), Err(null("child")));
        assert_eq!(m.get_groups_for_user(None), Err(null("user")));
        assert_eq!(m.remove_child_groups(None), Err(null("parent")));
    }

    #[test]
    fn test_remove_user_from_group() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_user_to_group(Some(&f.fred), Some(&f.admins)).unwrap();
        membership.add_user_to_group(Some(&f.george), Some(&f.hackers)).unwrap();
        assert!(membership.is_user_in_group(Some(&f.fred), Some(&f.admins)).unwrap());

        membership.remove_user_from_group(Some(&f.fred), Some(&f.admins)).unwrap();
        assert!(!membership.is_user_in_group(Some(&f.fred), Some(&f.admins)).unwrap());
        assert!(membership.is_user_in_group(Some(&f.george), Some(&f.hackers)).unwrap());
    }

    #[test]
    fn test_remove_user_from_empty_group() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.remove_user_from_group(Some(&f.fred), Some(&f.hackers)).unwrap();
        assert!(!membership.is_user_in_group(Some(&f.fred), Some(&f.hackers)).unwrap());
    }

    #[test]
    fn test_remove_absent_member_is_noop() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_user_to_group(Some(&f.fred), Some(&f.admins)).unwrap();
        membership.remove_user_from_group(Some(&f.george), Some(&f.admins)).unwrap();

        assert!(membership.is_user_in_group(Some(&f.fred), Some(&f.admins)).unwrap());
    }

    #[test]
    fn test_is_user_in_group() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_user_to_group(Some(&f.fred), Some(&f.admins)).unwrap();
        membership.add_user_to_group(Some(&f.george), Some(&f.hackers)).unwrap();

        assert!(membership.is_user_in_group(Some(&f.fred), Some(&f.admins)).unwrap());
        assert!(membership.is_user_in_group(Some(&f.george), Some(&f.hackers)).unwrap());
        assert!(!membership.is_user_in_group(Some(&f.fred), Some(&f.hackers)).unwrap());
        assert!(!membership.is_user_in_group(Some(&f.george), Some(&f.admins)).unwrap());
    }

    #[test]
    fn test_get_users_in_unpopulated_group_is_empty() {
        let f = setup();

        let users = f
            .services
            .membership_service()
            .get_users_in_group(Some(&f.app_users))
            .unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn test_queries_do_not_validate_existence() {
        let f = setup();
        let membership = f.services.membership_service();
        let nogroup = Group::new("nogroup");

        assert!(!membership.is_user_in_group(Some(&f.fred), Some(&nogroup)).unwrap());
        assert!(membership.get_users_in_group(Some(&nogroup)).unwrap().is_empty());
        membership.remove_user_from_group(Some(&f.fred), Some(&nogroup)).unwrap();
    }

    #[test]
    fn test_remove_users_from_group() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_user_to_group(Some(&f.fred), Some(&f.admins)).unwrap();
        membership.add_user_to_group(Some(&f.george), Some(&f.admins)).unwrap();
        membership.add_user_to_group(Some(&f.fred), Some(&f.hackers)).unwrap();

        membership.remove_users_from_group(Some(&f.admins)).unwrap();

        assert!(membership.get_users_in_group(Some(&f.admins)).unwrap().is_empty());
        assert!(membership.is_user_in_group(Some(&f.fred), Some(&f.hackers)).unwrap());

        // no set yet
        membership.remove_users_from_group(Some(&f.app_users)).unwrap();
    }

    #[test]
    fn test_add_group_to_group() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_group_to_group(Some(&f.hackers), Some(&f.admins)).unwrap();
        membership.add_group_to_group(Some(&f.hackers), Some(&f.admins)).unwrap();

        assert!(membership.is_group_in_group(Some(&f.hackers), Some(&f.admins)).unwrap());
        assert!(!membership.is_group_in_group(Some(&f.admins), Some(&f.hackers)).unwrap());
        assert_eq!(membership.get_child_groups(Some(&f.admins)).unwrap().len(), 1);
    }

    #[test]
    fn test_add_group_to_group_no_such_group() {
        let f = setup();
        let membership = f.services.membership_service();
        let nogroup = Group::new("nogroup");

        let result = membership.add_group_to_group(Some(&nogroup), Some(&f.admins));
        assert!(matches!(
            result,
            Err(DirectoryError::InvalidArgument { role: "child", .. })
        ));

        let result = membership.add_group_to_group(Some(&f.admins), Some(&nogroup));
        assert!(matches!(
            result,
            Err(DirectoryError::InvalidArgument { role: "parent", .. })
        ));
    }

    #[test]
    fn test_cycles_are_accepted() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_group_to_group(Some(&f.admins), Some(&f.hackers)).unwrap();
        membership.add_group_to_group(Some(&f.hackers), Some(&f.admins)).unwrap();

        assert!(membership.is_group_in_group(Some(&f.admins), Some(&f.hackers)).unwrap());
        assert!(membership.is_group_in_group(Some(&f.hackers), Some(&f.admins)).unwrap());
    }

    #[test]
    fn test_grandchild_is_not_a_child() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_group_to_group(Some(&f.hackers), Some(&f.admins)).unwrap();
        membership.add_group_to_group(Some(&f.app_users), Some(&f.hackers)).unwrap();

        assert!(!membership.is_group_in_group(Some(&f.app_users), Some(&f.admins)).unwrap());
    }

    #[test]
    fn test_user_in_child_group_is_not_in_parent() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_user_to_group(Some(&f.fred), Some(&f.hackers)).unwrap();
        membership.add_group_to_group(Some(&f.hackers), Some(&f.admins)).unwrap();

        assert!(!membership.is_user_in_group(Some(&f.fred), Some(&f.admins)).unwrap());
    }

    #[test]
    fn test_remove_group_from_group() {
        let f = setup();
        let membership = f.services.membership_service();

        // parent has no child set yet
        membership.remove_group_from_group(Some(&f.hackers), Some(&f.admins)).unwrap();

        membership.add_group_to_group(Some(&f.hackers), Some(&f.admins)).unwrap();
        membership.add_group_to_group(Some(&f.app_users), Some(&f.admins)).unwrap();
        membership.remove_group_from_group(Some(&f.hackers), Some(&f.admins)).unwrap();

        assert!(!membership.is_group_in_group(Some(&f.hackers), Some(&f.admins)).unwrap());
        assert!(membership.is_group_in_group(Some(&f.app_users), Some(&f.admins)).unwrap());
    }

    #[test]
    fn test_parent_groups_and_groups_for_user() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_group_to_group(Some(&f.app_users), Some(&f.admins)).unwrap();
        membership.add_group_to_group(Some(&f.app_users), Some(&f.hackers)).unwrap();
        membership.add_user_to_group(Some(&f.george), Some(&f.hackers)).unwrap();
        membership.add_user_to_group(Some(&f.george), Some(&f.app_users)).unwrap();

        let parents = membership.get_parent_groups(Some(&f.app_users)).unwrap();
        assert_eq!(
            parents,
            BTreeSet::from([f.admins.clone(), f.hackers.clone()])
        );

        let groups = membership.get_groups_for_user(Some(&f.george)).unwrap();
        assert_eq!(groups, BTreeSet::from([f.app_users, f.hackers]));
        assert!(membership.get_groups_for_user(Some(&f.fred)).unwrap().is_empty());
    }

    #[test]
    fn test_remove_child_groups() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_group_to_group(Some(&f.hackers), Some(&f.admins)).unwrap();
        membership.add_group_to_group(Some(&f.app_users), Some(&f.admins)).unwrap();
        membership.remove_child_groups(Some(&f.admins)).unwrap();

        assert!(membership.get_child_groups(Some(&f.admins)).unwrap().is_empty());
    }

    #[test]
    fn test_store_delete_does_not_cascade() {
        let f = setup();
        let membership = f.services.membership_service();

        membership.add_user_to_group(Some(&f.fred), Some(&f.app_users)).unwrap();
        f.services.group_repository().delete(&f.app_users).unwrap();
        f.services
            .group_repository()
            .create(Group::new("app-users"))
            .unwrap();

        assert!(membership.is_user_in_group(Some(&f.fred), Some(&f.app_users)).unwrap());
    }

    #[test]
    fn test_dropped_services() {
        let dangling: Weak<dyn Services> = Weak::<ServiceFactory>::new();
        let membership = MemoryMembershipService::new(dangling);
        let fred = User::new("fred");
        let admins = Group::new("admins");

        let result = membership.add_user_to_group(Some(&fred), Some(&admins));
        assert!(matches!(result, Err(DirectoryError::Internal(_))));

        // lookups never touch the repositories
        assert!(!membership.is_user_in_group(Some(&fred), Some(&admins)).unwrap());
    }
}
