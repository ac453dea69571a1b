//! Configuration types for the directory services.
//!
//! # Example
//!
//! ```rust
//! use usergroups::config::{DirectoryConfig, NameConfig};
//! use usergroups::ServiceFactory;
//!
//! // Use defaults
//! let services = ServiceFactory::create_services();
//!
//! // Or customize
//! let config = DirectoryConfig {
//!     names: NameConfig {
//!         max_length: 32,
//!         ..Default::default()
//!     },
//! };
//! let services = ServiceFactory::with_config(config);
//! ```

/// Main configuration struct for the directory services.
#[derive(Debug, Clone, Default)]
pub struct DirectoryConfig {
    /// Rules applied to user and group names on creation.
    pub names: NameConfig,
}

impl DirectoryConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Short names, no surrounding whitespace.
    pub fn strict() -> Self {
        Self {
            names: NameConfig {
                max_length: 64,
                allow_surrounding_whitespace: false,
            },
        }
    }

    /// Accepts nearly any non-blank name.
    pub fn permissive() -> Self {
        Self {
            names: NameConfig {
                max_length: 4096,
                allow_surrounding_whitespace: true,
            },
        }
    }
}

/// Rules for user and group names.
///
/// Names are always case-sensitive and never normalized; these rules only
/// decide whether a name is accepted.
#[derive(Debug, Clone)]
pub struct NameConfig {
    /// Maximum name length in characters.
    ///
    /// Default: 255
    pub max_length: usize,

    /// Whether leading or trailing whitespace is accepted.
    ///
    /// Default: false
    pub allow_surrounding_whitespace: bool,
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            max_length: 255,
            allow_surrounding_whitespace: false,
        }
    }
}
