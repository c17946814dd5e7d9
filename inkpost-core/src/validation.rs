//! Field level validation errors
//!
//! Errors are collected per field so that a single 400 response can report
//! every problem of a payload at once.

use std::collections::BTreeMap;

use serde::Serialize;

pub const REQUIRED: &str = "This field is required.";
pub const MAY_NOT_BE_BLANK: &str = "This field may not be blank.";

pub fn max_length_message(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

pub fn unknown_pk_message(pk: i64) -> String {
    format!("Invalid pk \"{pk}\" - object does not exist.")
}

pub fn invalid_choice_message(value: &str) -> String {
    format!("\"{value}\" is not a valid choice.")
}

pub fn unique_message(model: &str, field: &str) -> String {
    format!("{model} with this {field} already exists.")
}

/// How strictly a write payload is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// POST: required fields must be present
    Create,
    /// PUT: required fields must be present
    Replace,
    /// PATCH: every field is optional
    Partial,
}

impl WriteMode {
    pub fn requires_all_fields(&self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Record a missing value when the write mode needs it
    pub fn require<T>(&mut self, field: &str, value: &Option<T>, mode: WriteMode) {
        if value.is_none() && mode.requires_all_fields() {
            self.add(field, REQUIRED);
        }
    }

    /// Like [`FieldErrors::require`] but also rejects empty strings
    pub fn require_text(&mut self, field: &str, value: &Option<String>, mode: WriteMode) {
        match value {
            Some(text) if text.trim().is_empty() => self.add(field, MAY_NOT_BE_BLANK),
            Some(_) => {}
            None => self.require(field, value, mode),
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut result = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation failed for field '{field}'"));
                result.add(field.as_ref(), message);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(max = 3, message = "Ensure this field has no more than 3 characters."))]
        name: Option<String>,
    }

    #[test]
    fn test_require_respects_write_mode() {
        let mut errors = FieldErrors::new();
        errors.require::<i64>("blog", &None, WriteMode::Partial);
        assert!(errors.is_empty());

        errors.require::<i64>("blog", &None, WriteMode::Create);
        errors.require_text("text", &Some("   ".to_string()), WriteMode::Partial);
        assert_eq!(errors.get("blog"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("text"), Some(&[MAY_NOT_BE_BLANK.to_string()][..]));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_convert_validator_errors() {
        let payload = Payload {
            name: Some("too long".to_string()),
        };
        let errors: FieldErrors = payload.validate().unwrap_err().into();
        assert_eq!(errors.get("name"), Some(&[max_length_message(3)][..]));
    }

    #[test]
    fn test_serializes_as_field_map() {
        let mut errors = FieldErrors::single("title", unique_message("blog", "title"));
        errors.merge(FieldErrors::single("category", unknown_pk_message(7)));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "category": ["Invalid pk \"7\" - object does not exist."],
                "title": ["blog with this title already exists."],
            })
        );
    }
}
