pub mod name;

pub use name::validate_name;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    NameEmpty,
    #[error("Name is too long (max {max} characters)")]
    NameTooLong { max: usize },
    #[error("Name cannot start or end with whitespace")]
    NameSurroundingWhitespace,
}
