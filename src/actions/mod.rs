//! Workflows that combine repository deletes with the explicit membership
//! removal operations.

pub mod delete_group;
pub mod delete_user;

pub use delete_group::DeleteGroupAction;
pub use delete_user::DeleteUserAction;
