//! Typed access to an inbound JSON object.
//!
//! Every accessor records its own validation message and returns `None`
//! when the field is absent or invalid, so one pass over the input reports
//! every broken field at once.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{PresentError, ValidationErrors, NON_FIELD_ERRORS};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";

pub struct InputFields<'a> {
    map: &'a Map<String, Value>,
    partial: bool,
    errors: ValidationErrors,
}

impl<'a> InputFields<'a> {
    /// Wrap an input body. Anything other than a JSON object is rejected.
    ///
    /// In `partial` mode absent fields are not reported as missing.
    pub fn new(input: &'a Value, partial: bool) -> Result<Self, PresentError> {
        match input {
            Value::Object(map) => Ok(Self {
                map,
                partial,
                errors: ValidationErrors::new(),
            }),
            other => Err(ValidationErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(other)
                ),
            )
            .into()),
        }
    }

    /// Record an error found by the caller (e.g. an unresolved reference).
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Finish reading; fails if any accessor recorded a message.
    pub fn finish(self) -> Result<(), PresentError> {
        self.errors.into_result()
    }

    fn value(&mut self, field: &str, required: bool) -> Option<&'a Value> {
        let map = self.map;
        match map.get(field) {
            None => {
                if required && !self.partial {
                    self.errors.add(field, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.errors.add(field, NOT_NULL);
                None
            }
            Some(value) => Some(value),
        }
    }

    /// Required, trimmed, non-blank string of at most `max_len` characters.
    pub fn string(&mut self, field: &str, max_len: usize) -> Option<String> {
        let value = self.value(field, true)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.errors.add(field, "Not a valid string.");
                return None;
            }
        };
        if text.is_empty() {
            self.errors.add(field, "This field may not be blank.");
            return None;
        }
        if text.chars().count() > max_len {
            self.errors.add(
                field,
                format!("Ensure this field has no more than {} characters.", max_len),
            );
            return None;
        }
        Some(text)
    }

    /// Required integer, accepting numeric strings, bounded below by `min`.
    pub fn integer(&mut self, field: &str, min: i32) -> Option<i32> {
        let value = self.value(field, true)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        let Some(parsed) = parsed.and_then(|n| i32::try_from(n).ok()) else {
            self.errors.add(field, "A valid integer is required.");
            return None;
        };
        if parsed < min {
            self.errors.add(
                field,
                format!("Ensure this value is greater than or equal to {}.", min),
            );
            return None;
        }
        Some(parsed)
    }

    /// Optional boolean; absence is not an error.
    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        let value = self.value(field, false)?;
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, "Must be a valid boolean.");
        }
        parsed
    }

    /// Required calendar date in `YYYY-MM-DD` form.
    pub fn date(&mut self, field: &str) -> Option<NaiveDate> {
        let value = self.value(field, true)?;
        let parsed = value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok());
        if parsed.is_none() {
            self.errors.add(
                field,
                "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
            );
        }
        parsed
    }

    /// Required code from a fixed table. `required = false` lets a default apply.
    pub fn choice<T>(
        &mut self,
        field: &str,
        required: bool,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let value = self.value(field, required)?;
        let code = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let parsed = parse(&code);
        if parsed.is_none() {
            self.errors
                .add(field, format!("\"{}\" is not a valid choice.", code));
        }
        parsed
    }
}

/// Turn a value that survived [`InputFields::finish`] into a hard requirement.
pub fn require<T>(field: &str, value: Option<T>) -> Result<T, PresentError> {
    value.ok_or_else(|| ValidationErrors::single(field, REQUIRED).into())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_body_is_rejected() {
        let input = json!(["not", "an", "object"]);
        let err = InputFields::new(&input, false).err().unwrap();
        let errors = err.validation().unwrap();
        assert_eq!(
            errors.messages(NON_FIELD_ERRORS),
            ["Invalid data. Expected a dictionary, but got list."]
        );
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let input = json!({});
        let mut fields = InputFields::new(&input, false).unwrap();
        assert_eq!(fields.string("name", 10), None);
        assert_eq!(fields.integer("races_count", 0), None);
        let err = fields.finish().unwrap_err();
        let errors = err.validation().unwrap();
        assert!(errors.contains("name"));
        assert!(errors.contains("races_count"));
    }

    #[test]
    fn partial_input_skips_missing_fields() {
        let input = json!({});
        let mut fields = InputFields::new(&input, true).unwrap();
        assert_eq!(fields.string("name", 10), None);
        assert!(fields.finish().is_ok());
    }

    #[test]
    fn strings_are_trimmed_and_bounded() {
        let input = json!({"a": "  Falcon ", "b": "   ", "c": "toolong"});
        let mut fields = InputFields::new(&input, false).unwrap();
        assert_eq!(fields.string("a", 10).as_deref(), Some("Falcon"));
        assert_eq!(fields.string("b", 10), None);
        assert_eq!(fields.string("c", 3), None);
        let err = fields.finish().unwrap_err();
        let errors = err.validation().unwrap();
        assert_eq!(errors.messages("b"), ["This field may not be blank."]);
        assert_eq!(
            errors.messages("c"),
            ["Ensure this field has no more than 3 characters."]
        );
    }

    #[test]
    fn integers_accept_numeric_strings() {
        let input = json!({"a": "12", "b": -1, "c": 1.5});
        let mut fields = InputFields::new(&input, false).unwrap();
        assert_eq!(fields.integer("a", 0), Some(12));
        assert_eq!(fields.integer("b", 0), None);
        assert_eq!(fields.integer("c", 0), None);
        let err = fields.finish().unwrap_err();
        assert!(err.validation().unwrap().contains("b"));
        assert!(err.validation().unwrap().contains("c"));
    }

    #[test]
    fn dates_and_booleans() {
        let input = json!({"d": "2020-01-01", "bad": "01/01/2020", "flag": "true"});
        let mut fields = InputFields::new(&input, false).unwrap();
        assert_eq!(
            fields.date("d"),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert_eq!(fields.date("bad"), None);
        assert_eq!(fields.boolean("flag"), Some(true));
        assert_eq!(fields.boolean("absent"), None);
        let err = fields.finish().unwrap_err();
        let errors = err.validation().unwrap();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["bad"]);
    }

    #[test]
    fn null_is_not_absent() {
        let input = json!({"name": null});
        let mut fields = InputFields::new(&input, true).unwrap();
        assert_eq!(fields.string("name", 10), None);
        let err = fields.finish().unwrap_err();
        assert_eq!(
            err.validation().unwrap().messages("name"),
            ["This field may not be null."]
        );
    }
}
