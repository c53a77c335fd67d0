//! # Registration Module
//!
//! This module handles the registration form including:
//! - Form values and the submitted snapshot
//! - Field validation rules
//! - The confirm-then-submit lifecycle

pub mod flow;
pub mod models;
pub mod prefectures;
pub mod validators;

#[cfg(test)]
mod tests;

pub use flow::{FlowError, Phase, RegistrationForm};
pub use models::{Field, FieldEdit, FormValues, Gender, SubmittedSnapshot};
pub use validators::{RegistrationValidator, ValidationRules};
