//! Registration form with field validation, a confirmation step and
//! submission of the confirmed values to an HTTP endpoint.

pub mod common;
pub mod console;
pub mod registration;
pub mod services;
