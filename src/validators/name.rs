use super::ValidationError;
use crate::config::NameConfig;

pub fn validate_name(name: &str, config: &NameConfig) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::NameEmpty);
    }

    if name.chars().count() > config.max_length {
        return Err(ValidationError::NameTooLong {
            max: config.max_length,
        });
    }

    if !config.allow_surrounding_whitespace && trimmed.len() != name.len() {
        return Err(ValidationError::NameSurroundingWhitespace);
    }

    Ok(())
}
