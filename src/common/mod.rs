// Common module - shared types and utilities across all modules

pub mod config;
pub mod helpers;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::{apply_cli_override, AppConfig, CliOverrides, ConfigError};
pub use helpers::{safe_name_log, safe_text_log};
pub use validation::{ValidationError, ValidationResult, Validator};
