//! In-memory users, groups and group membership.
//!
//! The crate is built from three services wired together by a [`ServiceFactory`]:
//!
//! | Service | Description |
//! |---------|-------------|
//! | [`UserRepository`] | Canonical user records, looked up by name |
//! | [`GroupRepository`] | Canonical group records, looked up by name |
//! | [`MembershipService`] | User-in-group and group-in-group relations |
//!
//! Every membership mutation is validated against the two repositories, so a user or
//! group must be created before it can take part in a relation.
//!
//! # Example
//!
//! ```rust
//! use usergroups::{Group, ServiceFactory, Services, User};
//!
//! let services = ServiceFactory::create_services();
//! let fred = services.user_repository().create(User::new("fred")).unwrap();
//! let admins = services.group_repository().create(Group::new("admins")).unwrap();
//!
//! let membership = services.membership_service();
//! membership.add_user_to_group(Some(&fred), Some(&admins)).unwrap();
//! assert!(membership.is_user_in_group(Some(&fred), Some(&admins)).unwrap());
//! ```

pub mod actions;
pub mod config;
pub mod memory;
pub mod repository;
pub mod services;
pub mod validators;

pub use actions::{DeleteGroupAction, DeleteUserAction};
pub use config::{DirectoryConfig, NameConfig};
pub use memory::{MemoryGroupRepository, MemoryMembershipService, MemoryUserRepository};
pub use repository::{Group, GroupRepository, MembershipService, User, UserRepository};
pub use services::{ServiceFactory, Services};
pub use validators::ValidationError;

/// Kind of directory entity, used to give errors some context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Group,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Group => write!(f, "Group"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectoryError {
    /// A required argument was absent. Always reported before any lookup.
    #[error("{argument} must not be null")]
    NullInput { argument: &'static str },

    /// A named argument does not resolve in its repository.
    #[error("{kind} '{name}' does not exist! ({role})")]
    InvalidArgument {
        kind: EntityKind,
        role: &'static str,
        name: String,
    },

    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: EntityKind, name: String },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("invalid name: {0}")]
    Validation(#[from] ValidationError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DirectoryError {
    pub(crate) fn lock_poisoned() -> Self {
        Self::Internal("lock poisoned".into())
    }
}

/// Unwraps a required argument, failing with [`DirectoryError::NullInput`] when absent.
pub(crate) fn require_non_null<'a, T>(
    value: Option<&'a T>,
    argument: &'static str,
) -> Result<&'a T, DirectoryError> {
    value.ok_or(DirectoryError::NullInput { argument })
}
