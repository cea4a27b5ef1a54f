//! Validation Module
//!
//! Declarative per-field rules evaluated against submitted form values,
//! built-in schemas for the hospital forms, and registration screening.

mod duplicates;
mod engine;
mod rules;
pub mod schemas;
mod value;


pub use duplicates::{
    find_duplicates, screen_registration, DuplicateCandidate, ExistingPatient, MatchReason,
    RegistrationOutcome,
};
pub use engine::{sanitize, sanitize_and_validate, validate_field, validate_form, ValidationResult};
pub use rules::{FieldPattern, FieldRule, ValidationSchema};
pub use value::{
    parse_leading_float, FieldValue, FormValues, InvalidFormValue, UnsupportedValue,
};
