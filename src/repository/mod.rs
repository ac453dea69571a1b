//! Repository traits and data types.
//!
//! This module defines the service abstractions used throughout the crate.
//! Implement these traits to back the directory with your own storage.
//!
//! # Traits
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`UserRepository`] | User create, lookup and delete |
//! | [`GroupRepository`] | Group create, lookup and delete |
//! | [`MembershipService`] | User-in-group and group-in-group relations |
//!
//! # Data Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`User`] | A user, identified by name |
//! | [`Group`] | A group, identified by name |
//!
//! In-memory implementations live in [`crate::memory`].

mod group;
mod membership;
mod user;

pub use group::Group;
pub use group::GroupRepository;
pub use membership::MembershipService;
pub use user::User;
pub use user::UserRepository;
