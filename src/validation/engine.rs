//! Validation Engine
//!
//! Pure evaluation of form values against a schema. Checks run in a fixed
//! order per field and the first failure wins.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::validation::{FieldRule, FieldValue, FormValues, ValidationSchema};

// == Validation Result ==
/// Outcome of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Error message for one field, if it failed.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

// == Single Field ==
/// Checks one value against its rule. `None` means the value passed.
///
/// A missing value is treated as empty.
pub fn validate_field(field: &str, value: Option<&FieldValue>, rule: &FieldRule) -> Option<String> {
    let fail = |default: String| Some(rule.message.clone().unwrap_or(default));

    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ if rule.required => return fail(format!("{} is required", field)),
        _ => return None,
    };

    match value {
        FieldValue::List(items) => {
            if let Some(min) = rule.min_length {
                if items.len() < min {
                    return fail(format!("{} must have at least {} item(s)", field, min));
                }
            }
            if let Some(max) = rule.max_length {
                if items.len() > max {
                    return fail(format!("{} must have at most {} item(s)", field, max));
                }
            }
            if let Some(bad) = items.iter().find(|item| !rule.allows(item)) {
                return fail(format!("'{}' is not a valid option for {}", bad, field));
            }
        }
        scalar => {
            let text = scalar.as_text();
            let length = text.chars().count();

            if let Some(min) = rule.min_length {
                if length < min {
                    return fail(format!("{} must be at least {} characters", field, min));
                }
            }
            if let Some(max) = rule.max_length {
                if length > max {
                    return fail(format!("{} must be at most {} characters", field, max));
                }
            }
            if let Some(pattern) = &rule.pattern {
                if !pattern.is_match(&text) {
                    return fail(format!("{} format is invalid", field));
                }
            }
            if !rule.allows(&text) {
                let options = rule.allowed.as_deref().unwrap_or_default().join(", ");
                return fail(format!("{} must be one of: {}", field, options));
            }
            // Values with no numeric reading are left to the pattern check
            if let Some(number) = scalar.as_number() {
                if let Some(min) = rule.min {
                    if number < min {
                        return fail(format!("{} must be at least {}", field, min));
                    }
                }
                if let Some(max) = rule.max {
                    if number > max {
                        return fail(format!("{} must be at most {}", field, max));
                    }
                }
            }
        }
    }

    None
}

// == Whole Form ==
/// Validates every field the schema names, including ones absent from
/// `values`. Fields the schema does not name are ignored.
pub fn validate_form(values: &FormValues, schema: &ValidationSchema) -> ValidationResult {
    let errors = schema
        .fields()
        .filter_map(|(field, rule)| {
            validate_field(field, values.get(field), rule).map(|msg| (field.to_string(), msg))
        })
        .collect();

    ValidationResult::from_errors(errors)
}

// == Sanitization ==
/// Trims surrounding whitespace from text values; other kinds pass through.
pub fn sanitize(values: &FormValues) -> FormValues {
    values
        .iter()
        .map(|(field, value)| {
            let cleaned = match value {
                FieldValue::Text(s) => FieldValue::Text(s.trim().to_string()),
                other => other.clone(),
            };
            (field.clone(), cleaned)
        })
        .collect()
}

/// Sanitizes, then validates the cleaned values.
pub fn sanitize_and_validate(
    values: &FormValues,
    schema: &ValidationSchema,
) -> (FormValues, ValidationResult) {
    let cleaned = sanitize(values);
    let result = validate_form(&cleaned, schema);
    (cleaned, result)
}
