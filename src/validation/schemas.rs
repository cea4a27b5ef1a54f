//! Built-in schemas for the hospital's data-entry forms.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::validation::{FieldPattern, FieldRule, ValidationSchema};

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const APPOINTMENT_TYPES: [&str; 4] =
    ["Consultation", "Follow-up", "Emergency", "Routine Checkup"];

pub const APPOINTMENT_STATUSES: [&str; 5] =
    ["Scheduled", "Confirmed", "Completed", "Cancelled", "No-show"];

fn pattern(source: &str) -> FieldPattern {
    FieldPattern::new(source).expect("built-in field pattern must compile")
}

static MOBILE: Lazy<FieldPattern> = Lazy::new(|| pattern(r"[0-9]{10}"));
static EMAIL: Lazy<FieldPattern> = Lazy::new(|| pattern(r"[^\s@]+@[^\s@]+\.[^\s@]+"));
static PERSON_NAME: Lazy<FieldPattern> = Lazy::new(|| pattern(r"[A-Za-z][A-Za-z .'-]*"));
static ISO_DATE: Lazy<FieldPattern> =
    Lazy::new(|| pattern(r"\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])"));
static TIME_24H: Lazy<FieldPattern> = Lazy::new(|| pattern(r"([01]\d|2[0-3]):[0-5]\d"));

fn name_rule(label: &str) -> FieldRule {
    FieldRule::new()
        .required()
        .min_length(2)
        .max_length(50)
        .pattern((*PERSON_NAME).clone())
        .message(format!("{} must be 2-50 letters", label))
}

fn mobile_rule() -> FieldRule {
    FieldRule::new()
        .required()
        .pattern((*MOBILE).clone())
        .message("Mobile number must be exactly 10 digits")
}

fn patient() -> ValidationSchema {
    ValidationSchema::new()
        .field("first_name", name_rule("First name"))
        .field("last_name", name_rule("Last name"))
        .field("mobile", mobile_rule())
        .field(
            "email",
            FieldRule::new()
                .pattern((*EMAIL).clone())
                .message("Please enter a valid email address"),
        )
        .field(
            "age",
            FieldRule::new()
                .required()
                .min(0.0)
                .max(150.0)
                .message("Age must be between 0 and 150"),
        )
        .field("gender", FieldRule::new().required().one_of(GENDERS))
        .field("blood_group", FieldRule::new().one_of(BLOOD_GROUPS))
        .field(
            "date_of_birth",
            FieldRule::new()
                .pattern((*ISO_DATE).clone())
                .message("Date of birth must be YYYY-MM-DD"),
        )
        .field("address", FieldRule::new().max_length(200))
        .field(
            "emergency_contact",
            FieldRule::new()
                .pattern((*MOBILE).clone())
                .message("Emergency contact must be exactly 10 digits"),
        )
}

fn doctor() -> ValidationSchema {
    ValidationSchema::new()
        .field("first_name", name_rule("First name"))
        .field("last_name", name_rule("Last name"))
        .field("mobile", mobile_rule())
        .field(
            "email",
            FieldRule::new()
                .required()
                .pattern((*EMAIL).clone())
                .message("Please enter a valid email address"),
        )
        .field(
            "specialization",
            FieldRule::new().required().min_length(2).max_length(100),
        )
        .field("qualification", FieldRule::new().required().max_length(100))
        .field("department", FieldRule::new().required())
        .field("experience_years", FieldRule::new().min(0.0).max(70.0))
        .field("consultation_fee", FieldRule::new().min(0.0))
        .field(
            "available_days",
            FieldRule::new()
                .required()
                .min_length(1)
                .max_length(7)
                .one_of(WEEKDAYS),
        )
}

fn appointment() -> ValidationSchema {
    ValidationSchema::new()
        .field("patient_id", FieldRule::new().required())
        .field("doctor_id", FieldRule::new().required())
        .field(
            "appointment_date",
            FieldRule::new()
                .required()
                .pattern((*ISO_DATE).clone())
                .message("Appointment date must be YYYY-MM-DD"),
        )
        .field(
            "appointment_time",
            FieldRule::new()
                .required()
                .pattern((*TIME_24H).clone())
                .message("Appointment time must be HH:MM"),
        )
        .field(
            "appointment_type",
            FieldRule::new().required().one_of(APPOINTMENT_TYPES),
        )
        .field("status", FieldRule::new().one_of(APPOINTMENT_STATUSES))
        .field("reason", FieldRule::new().max_length(500))
}

fn medical_record() -> ValidationSchema {
    ValidationSchema::new()
        .field("patient_id", FieldRule::new().required())
        .field("doctor_id", FieldRule::new().required())
        .field(
            "visit_date",
            FieldRule::new()
                .required()
                .pattern((*ISO_DATE).clone())
                .message("Visit date must be YYYY-MM-DD"),
        )
        .field(
            "diagnosis",
            FieldRule::new().required().min_length(3).max_length(1000),
        )
        .field("symptoms", FieldRule::new().max_length(20))
        .field("prescription", FieldRule::new().max_length(2000))
        .field("notes", FieldRule::new().max_length(2000))
        .field(
            "follow_up_date",
            FieldRule::new()
                .pattern((*ISO_DATE).clone())
                .message("Follow-up date must be YYYY-MM-DD"),
        )
}

static PATIENT: Lazy<ValidationSchema> = Lazy::new(patient);

static SCHEMAS: Lazy<BTreeMap<&'static str, ValidationSchema>> = Lazy::new(|| {
    BTreeMap::from([
        ("patient", PATIENT.clone()),
        ("doctor", doctor()),
        ("appointment", appointment()),
        ("medical_record", medical_record()),
    ])
});

/// Looks up a built-in schema by form name.
pub fn lookup(name: &str) -> Option<&'static ValidationSchema> {
    SCHEMAS.get(name)
}

/// Schema used for patient registration.
pub fn patient_schema() -> &'static ValidationSchema {
    &PATIENT
}

/// Names of every built-in schema, sorted.
pub fn names() -> Vec<&'static str> {
    SCHEMAS.keys().copied().collect()
}
