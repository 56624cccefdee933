/// Data-driven field validation engine
///
/// Every entity declares its constraints as a table of [`FieldSpec`]s, and
/// one engine evaluates them uniformly: no per-form duplication. A failed
/// validation yields field-keyed, human-readable messages and nothing is
/// written.
///
/// Uniqueness is not checked here; it is enforced by the database unique
/// constraints and mapped back to a field-keyed error at the API boundary.
///
/// # Example
///
/// ```
/// use taskboard_shared::validate::{validate, FieldSpec, Rule, NAME_MAX_LEN};
///
/// const SPECS: &[FieldSpec] = &[FieldSpec {
///     field: "name",
///     rules: &[Rule::Required, Rule::MaxLen(NAME_MAX_LEN)],
/// }];
///
/// assert!(validate(SPECS, &[("name", "in progress")]).is_ok());
/// assert!(validate(SPECS, &[("name", "")]).is_err());
/// ```

use serde::{Deserialize, Serialize};

/// Maximum length of every name-type field (entity names, username,
/// first/last name)
pub const NAME_MAX_LEN: usize = 150;

/// Minimum password length
pub const PASSWORD_MIN_LEN: usize = 3;

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Human-readable error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A declarative per-field constraint
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Value must be non-empty after trimming
    Required,

    /// Value must be at most this many characters
    MaxLen(usize),

    /// Value must be at least this many characters
    MinLen(usize),

    /// Value may contain only letters, digits and `@` `.` `+` `-` `_`
    Username,
}

/// One field and the ordered rules applied to it
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// Validator table for entities with a single `name` field
/// (Status, Label) and for the Task name field
pub const NAMED_ENTITY: &[FieldSpec] = &[FieldSpec {
    field: "name",
    rules: &[Rule::Required, Rule::MaxLen(NAME_MAX_LEN)],
}];

/// Validator table for the user sign-up and update forms
///
/// The password-pair match is checked separately by
/// [`validate_password_pair`] since it spans two fields.
pub const USER_FORM: &[FieldSpec] = &[
    FieldSpec {
        field: "username",
        rules: &[Rule::Required, Rule::MaxLen(NAME_MAX_LEN), Rule::Username],
    },
    FieldSpec {
        field: "first_name",
        rules: &[Rule::Required, Rule::MaxLen(NAME_MAX_LEN)],
    },
    FieldSpec {
        field: "last_name",
        rules: &[Rule::Required, Rule::MaxLen(NAME_MAX_LEN)],
    },
    FieldSpec {
        field: "password",
        rules: &[Rule::Required, Rule::MinLen(PASSWORD_MIN_LEN)],
    },
];

impl Rule {
    /// Applies the rule to one value, producing a message on violation
    fn check(&self, value: &str) -> Option<String> {
        match self {
            Rule::Required => {
                if value.trim().is_empty() {
                    Some("This field is required.".to_string())
                } else {
                    None
                }
            }
            Rule::MaxLen(max) => {
                let len = value.chars().count();
                if len > *max {
                    Some(format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        max, len
                    ))
                } else {
                    None
                }
            }
            Rule::MinLen(min) => {
                let len = value.chars().count();
                if len < *min {
                    Some(format!(
                        "This value is too short. It must contain at least {} characters.",
                        min
                    ))
                } else {
                    None
                }
            }
            Rule::Username => {
                let valid = value
                    .chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
                if valid {
                    None
                } else {
                    Some(
                        "Enter a valid username. This value may contain only letters, \
                         digits and @/./+/-/_ characters."
                            .to_string(),
                    )
                }
            }
        }
    }
}

/// Evaluates a validator table against submitted values
///
/// `values` maps field names to submitted strings; a field missing from
/// `values` is treated as empty. All violations are collected, not just the
/// first, so the caller gets the complete field-keyed error set.
pub fn validate(specs: &[FieldSpec], values: &[(&str, &str)]) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for spec in specs {
        let value = values
            .iter()
            .find(|(field, _)| *field == spec.field)
            .map(|(_, value)| *value)
            .unwrap_or("");

        for rule in spec.rules {
            if let Some(message) = rule.check(value) {
                errors.push(FieldError::new(spec.field, message));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that the two submitted passwords match
pub fn validate_password_pair(password: &str, confirmation: &str) -> Result<(), FieldError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(FieldError::new(
            "password_confirmation",
            "The two password fields didn't match.",
        ))
    }
}
