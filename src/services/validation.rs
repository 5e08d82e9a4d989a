//! Payload validation against the book field table

use serde_json::Value;
use validator::ValidateUrl;

use crate::{
    error::{FieldViolation, Problem, ValidationError},
    models::{
        schema::{self, FieldKind, FieldSpec, Intent, YEAR_MAX, YEAR_MIN},
        FieldValue, ValidatedFields,
    },
};

/// Check a payload for the given intent.
///
/// Unknown keys are reported on their own, before required fields are
/// considered. Values are never coerced: `"500"` is not a page count.
pub fn validate(payload: &Value, intent: Intent) -> Result<ValidatedFields, ValidationError> {
    let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;
    let specs = schema::describe(intent);

    let unknown: Vec<FieldViolation> = object
        .keys()
        .filter(|key| !specs.iter().any(|spec| spec.name() == key.as_str()))
        .map(|key| FieldViolation::new(key.as_str(), Problem::UnknownField))
        .collect();
    if !unknown.is_empty() {
        return Err(ValidationError::Fields(unknown));
    }

    let mut fields = ValidatedFields::default();
    let mut violations = Vec::new();

    for spec in &specs {
        match object.get(spec.name()) {
            None if spec.required => {
                violations.push(FieldViolation::new(spec.name(), Problem::MissingField));
            }
            None => {}
            Some(value) => match check(spec, value) {
                Ok(value) => fields.insert(spec.field, value),
                Err(problem) => violations.push(FieldViolation::new(spec.name(), problem)),
            },
        }
    }

    if violations.is_empty() {
        Ok(fields)
    } else {
        Err(ValidationError::Fields(violations))
    }
}

fn check(spec: &FieldSpec, value: &Value) -> Result<FieldValue, Problem> {
    if value.is_null() {
        return if spec.nullable {
            Ok(FieldValue::Null)
        } else {
            Err(Problem::NotNullable)
        };
    }

    match spec.kind {
        FieldKind::Text => text(spec.kind, value).map(FieldValue::Text),
        FieldKind::NonEmptyText => {
            let value = text(spec.kind, value)?;
            if value.trim().is_empty() {
                return Err(Problem::Empty);
            }
            Ok(FieldValue::Text(value))
        }
        FieldKind::Url => {
            let value = text(spec.kind, value)?;
            if !is_web_url(&value) {
                return Err(Problem::Malformed {
                    expected: "an absolute http(s) URL",
                });
            }
            Ok(FieldValue::Text(value))
        }
        FieldKind::PositiveInteger => {
            let value = integer(spec.kind, value)?;
            if value <= 0 {
                return Err(Problem::OutOfRange {
                    constraint: "greater than zero",
                });
            }
            Ok(FieldValue::Integer(value))
        }
        FieldKind::Year => {
            let value = integer(spec.kind, value)?;
            if !(YEAR_MIN..=YEAR_MAX).contains(&value) {
                return Err(Problem::OutOfRange {
                    constraint: "a four-digit year",
                });
            }
            Ok(FieldValue::Integer(value))
        }
    }
}

fn text(kind: FieldKind, value: &Value) -> Result<String, Problem> {
    value.as_str().map(str::to_string).ok_or(Problem::WrongType {
        expected: kind.expected(),
    })
}

fn integer(kind: FieldKind, value: &Value) -> Result<i32, Problem> {
    // as_i64 is None for floats and strings alike
    let value = value.as_i64().ok_or(Problem::WrongType {
        expected: kind.expected(),
    })?;
    i32::try_from(value).map_err(|_| Problem::OutOfRange {
        constraint: "within 32-bit range",
    })
}

fn is_web_url(value: &str) -> bool {
    (value.starts_with("http://") || value.starts_with("https://")) && value.validate_url()
}
