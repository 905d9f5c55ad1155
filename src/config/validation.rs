//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (0 < capacity <= MAX_CAPACITY)
//! - Reject category overrides that would match nothing useful
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggingConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::LoggingConfig;
use crate::sink::MAX_CAPACITY;

/// A single semantic problem in a [`LoggingConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("category prefix must not be empty")]
    EmptyCategory,

    #[error("category prefix `{0}` has surrounding whitespace")]
    PaddedCategory(String),

    #[error("memory_capacity must be greater than zero")]
    ZeroCapacity,

    #[error("memory_capacity {got} exceeds maximum {max}")]
    CapacityTooLarge { max: usize, got: usize },
}

pub fn validate_config(config: &LoggingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for prefix in config.categories.keys() {
        if prefix.is_empty() {
            errors.push(ValidationError::EmptyCategory);
        } else if prefix.trim() != prefix {
            errors.push(ValidationError::PaddedCategory(prefix.clone()));
        }
    }

    if config.memory_capacity == 0 {
        errors.push(ValidationError::ZeroCapacity);
    } else if config.memory_capacity > MAX_CAPACITY {
        errors.push(ValidationError::CapacityTooLarge {
            max: MAX_CAPACITY,
            got: config.memory_capacity,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
