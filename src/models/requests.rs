//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming HTTP request bodies. Form submissions
//! for `POST /validate/:form` deserialize straight into `FormValues`.

use serde::Deserialize;

use crate::validation::{ExistingPatient, FormValues};

/// Request body for `POST /patients/screen`
///
/// # Fields
/// - `values`: The registration form as submitted
/// - `existing`: Patients already on file to compare against
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenRequest {
    pub values: FormValues,
    #[serde(default)]
    pub existing: Vec<ExistingPatient>,
}
