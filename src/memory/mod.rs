//! In-memory implementations of the repository traits.
//!
//! Each map is guarded by its own `RwLock`, held only for the duration of a
//! single call. The membership service never holds a relation lock while it
//! talks to the user or group repository.

mod group;
mod membership;
mod user;

pub use group::MemoryGroupRepository;
pub use membership::MemoryMembershipService;
pub use user::MemoryUserRepository;
