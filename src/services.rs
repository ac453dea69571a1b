//! Wiring for the user, group and membership services.
//!
//! The membership service needs the user and group repositories to validate
//! its inputs. Rather than holding them directly, it holds a weak handle to
//! the [`Services`] locator that owns all three.

use std::sync::{Arc, Weak};

use crate::config::DirectoryConfig;
use crate::memory::{MemoryGroupRepository, MemoryMembershipService, MemoryUserRepository};
use crate::repository::{GroupRepository, MembershipService, UserRepository};

/// Provides access to all of the services so that dependencies between them
/// can be resolved at runtime.
pub trait Services: Send + Sync {
    fn user_repository(&self) -> &dyn UserRepository;
    fn group_repository(&self) -> &dyn GroupRepository;
    fn membership_service(&self) -> &dyn MembershipService;
}

/// Builds and owns a memory-based set of services.
pub struct ServiceFactory {
    user_repository: MemoryUserRepository,
    group_repository: MemoryGroupRepository,
    membership_service: MemoryMembershipService,
}

impl ServiceFactory {
    /// Creates a fresh, empty set of services with the default configuration.
    pub fn create_services() -> Arc<Self> {
        Self::with_config(DirectoryConfig::default())
    }

    pub fn with_config(config: DirectoryConfig) -> Arc<Self> {
        Arc::new_cyclic(|factory: &Weak<Self>| {
            let services: Weak<dyn Services> = factory.clone();
            Self {
                user_repository: MemoryUserRepository::with_config(config.names.clone()),
                group_repository: MemoryGroupRepository::with_config(config.names),
                membership_service: MemoryMembershipService::new(services),
            }
        })
    }
}

impl Services for ServiceFactory {
    fn user_repository(&self) -> &dyn UserRepository {
        &self.user_repository
    }

    fn group_repository(&self) -> &dyn GroupRepository {
        &self.group_repository
    }

    fn membership_service(&self) -> &dyn MembershipService {
        &self.membership_service
    }
}
