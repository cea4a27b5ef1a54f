//! Duplicate-patient screening for registrations.
//!
//! A registration is sanitized, validated against the patient schema, and
//! compared with existing patients. The three possible outcomes are returned
//! as data so the conflict path is handled like any other branch.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::validation::{sanitize_and_validate, schemas, FormValues, ValidationResult};

// == Existing Patient ==
/// The subset of a stored patient record used for duplicate matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingPatient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

// == Match Reason ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    /// Same mobile number, compared on digits only
    Mobile,
    /// Same first and last name (case-insensitive) and date of birth
    NameAndDateOfBirth,
}

// == Duplicate Candidate ==
/// An existing patient that looks like the one being registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub id: String,
    pub name: String,
    pub mobile: Option<String>,
    pub reasons: Vec<MatchReason>,
}

// == Registration Outcome ==
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// Values are valid and unique; carries the sanitized values
    Accepted { values: FormValues },
    /// Values failed the patient schema
    Invalid { result: ValidationResult },
    /// Values are valid but match existing patients
    Conflict { candidates: Vec<DuplicateCandidate> },
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Finds existing patients that match `values` by mobile or by name plus
/// date of birth. Candidates keep the order of `existing`.
pub fn find_duplicates(
    values: &FormValues,
    existing: &[ExistingPatient],
) -> Vec<DuplicateCandidate> {
    let mobile = values
        .text("mobile")
        .map(|m| digits(&m))
        .filter(|m| !m.is_empty());
    let first_name = values.text("first_name");
    let last_name = values.text("last_name");
    let dob = values.text("date_of_birth");

    existing
        .iter()
        .filter_map(|patient| {
            let mut reasons = Vec::new();

            let mobile_match = match (&mobile, &patient.mobile) {
                (Some(new), Some(old)) => *new == digits(old),
                _ => false,
            };
            if mobile_match {
                reasons.push(MatchReason::Mobile);
            }

            let identity_match = match (&first_name, &last_name, &dob, &patient.date_of_birth) {
                (Some(first), Some(last), Some(new_dob), Some(old_dob)) => {
                    same_text(first, &patient.first_name)
                        && same_text(last, &patient.last_name)
                        && new_dob.trim() == old_dob.trim()
                }
                _ => false,
            };
            if identity_match {
                reasons.push(MatchReason::NameAndDateOfBirth);
            }

            if reasons.is_empty() {
                None
            } else {
                Some(DuplicateCandidate {
                    id: patient.id.clone(),
                    name: format!("{} {}", patient.first_name, patient.last_name),
                    mobile: patient.mobile.clone(),
                    reasons,
                })
            }
        })
        .collect()
}

/// Screens a new patient registration.
pub fn screen_registration(
    values: &FormValues,
    existing: &[ExistingPatient],
) -> RegistrationOutcome {
    let (cleaned, result) = sanitize_and_validate(values, schemas::patient_schema());
    if !result.is_valid {
        debug!(fields = ?result.errors.keys().collect::<Vec<_>>(), "registration invalid");
        return RegistrationOutcome::Invalid { result };
    }

    let candidates = find_duplicates(&cleaned, existing);
    if !candidates.is_empty() {
        info!(count = candidates.len(), "registration matches existing patients");
        return RegistrationOutcome::Conflict { candidates };
    }

    RegistrationOutcome::Accepted { values: cleaned }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> FormValues {
        FormValues::new()
            .with("first_name", " Asha ")
            .with("last_name", "Rao")
            .with("mobile", "9876543210")
            .with("age", 34i64)
            .with("gender", "Female")
            .with("date_of_birth", "1992-04-11")
    }

    fn existing(id: &str, first: &str, last: &str, mobile: &str, dob: &str) -> ExistingPatient {
        ExistingPatient {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            mobile: Some(mobile.to_string()),
            date_of_birth: Some(dob.to_string()),
        }
    }

    #[test]
    fn test_accepted_returns_sanitized_values() {
        let others = vec![existing("P-9", "Ravi", "Kumar", "9000000000", "1980-01-01")];

        match screen_registration(&registration(), &others) {
            RegistrationOutcome::Accepted { values } => {
                assert_eq!(values.text("first_name").as_deref(), Some("Asha"));
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_is_reported_before_duplicates() {
        let values = registration().with("mobile", "123");
        let others = vec![existing("P-1", "Asha", "Rao", "123", "1992-04-11")];

        match screen_registration(&values, &others) {
            RegistrationOutcome::Invalid { result } => {
                assert!(result.error("mobile").is_some());
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_mobile_match_ignores_formatting() {
        let others = vec![existing("P-2", "Someone", "Else", "+91 98765-43210", "1970-01-01")];
        let found = find_duplicates(&registration(), &others);

        // Country code makes the digit strings differ
        assert!(found.is_empty());

        let others = vec![existing("P-2", "Someone", "Else", "98765 43210", "1970-01-01")];
        let found = find_duplicates(&registration(), &others);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reasons, vec![MatchReason::Mobile]);
    }

    #[test]
    fn test_name_and_dob_match_is_case_insensitive() {
        let others = vec![existing("P-3", "ASHA", "rao", "9111111111", "1992-04-11")];

        match screen_registration(&registration(), &others) {
            RegistrationOutcome::Conflict { candidates } => {
                assert_eq!(candidates.len(), 1);
                assert_eq!(candidates[0].id, "P-3");
                assert_eq!(candidates[0].reasons, vec![MatchReason::NameAndDateOfBirth]);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_both_reasons_reported() {
        let others = vec![
            existing("P-4", "Asha", "Rao", "9876543210", "1992-04-11"),
            existing("P-5", "Asha", "Rao", "9222222222", "1993-01-01"),
        ];
        let found = find_duplicates(&registration(), &others);

        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].reasons,
            vec![MatchReason::Mobile, MatchReason::NameAndDateOfBirth]
        );
        assert_eq!(found[0].name, "Asha Rao");
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = RegistrationOutcome::Conflict { candidates: vec![] };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "conflict");
    }
}
