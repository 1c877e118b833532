use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::record::FieldValue;

/// Read-only view of a JSON object that reports failures with the full
/// dotted path of the offending field.
#[derive(Clone, Copy)]
pub(crate) struct Fields<'a> {
    value: &'a Value,
    base: &'a str,
}

/// Owned variant for list items, whose paths are built at runtime.
pub(crate) struct OwnedPath<'a> {
    value: &'a Value,
    base: String,
}

impl<'a> OwnedPath<'a> {
    pub(crate) fn new(value: &'a Value, base: String) -> Self {
        Self { value, base }
    }

    pub(crate) fn fields(&self) -> Fields<'_> {
        Fields {
            value: self.value,
            base: &self.base,
        }
    }
}

impl<'a> Fields<'a> {
    pub(crate) fn new(value: &'a Value, base: &'a str) -> Self {
        Self { value, base }
    }

    pub(crate) fn full_path(&self, path: &str) -> String {
        if self.base.is_empty() {
            path.to_string()
        } else {
            format!("{}.{}", self.base, path)
        }
    }

    /// Follows a dotted `path`; the final key may hold `null`.
    pub(crate) fn get(&self, path: &str) -> Result<&'a Value, ExtractError> {
        let mut current = self.value;
        for key in path.split('.') {
            current = current
                .as_object()
                .and_then(|obj: &Map<String, Value>| obj.get(key))
                .ok_or_else(|| ExtractError::MissingField {
                    path: self.full_path(path),
                })?;
        }
        Ok(current)
    }

    /// Like [`Fields::get`] but an absent key is `None` instead of an error.
    pub(crate) fn optional(&self, path: &str) -> Option<&'a Value> {
        self.get(path).ok()
    }

    fn invalid(&self, path: &str, expected: &'static str) -> ExtractError {
        ExtractError::InvalidType {
            path: self.full_path(path),
            expected,
        }
    }

    /// Strings pass through, numbers are rendered, `null` becomes empty.
    pub(crate) fn text(&self, path: &str) -> Result<String, ExtractError> {
        Ok(self.optional_text(path)?.unwrap_or_default())
    }

    /// As [`Fields::text`], but keeps `null` distinct.
    pub(crate) fn optional_text(&self, path: &str) -> Result<Option<String>, ExtractError> {
        match self.get(path)? {
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Null => Ok(None),
            _ => Err(self.invalid(path, "a string")),
        }
    }

    /// Renders a number or string as text; `null` is not allowed.
    pub(crate) fn scalar(&self, path: &str) -> Result<String, ExtractError> {
        match self.get(path)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(self.invalid(path, "a number or string")),
        }
    }

    pub(crate) fn flag(&self, path: &str) -> Result<bool, ExtractError> {
        self.get(path)?
            .as_bool()
            .ok_or_else(|| self.invalid(path, "a boolean"))
    }

    pub(crate) fn optional_flag(&self, path: &str) -> Result<Option<bool>, ExtractError> {
        match self.get(path)? {
            Value::Bool(b) => Ok(Some(*b)),
            Value::Null => Ok(None),
            _ => Err(self.invalid(path, "a boolean")),
        }
    }

    pub(crate) fn integer(&self, path: &str) -> Result<i64, ExtractError> {
        self.get(path)?
            .as_i64()
            .ok_or_else(|| self.invalid(path, "an integer"))
    }

    pub(crate) fn field_value(&self, path: &str) -> Result<FieldValue, ExtractError> {
        FieldValue::from_json(self.get(path)?).ok_or_else(|| self.invalid(path, "a scalar"))
    }

    /// Returns the array at `path` paired with each item's own path.
    pub(crate) fn items(&self, path: &str) -> Result<Vec<OwnedPath<'a>>, ExtractError> {
        let items = self
            .get(path)?
            .as_array()
            .ok_or_else(|| self.invalid(path, "an array"))?;
        let base = self.full_path(path);
        Ok(items
            .iter()
            .enumerate()
            .map(|(i, item)| OwnedPath::new(item, format!("{}[{}]", base, i)))
            .collect())
    }

    /// Collects a list of plain strings, e.g. spoken languages.
    pub(crate) fn strings(&self, path: &str) -> Result<Vec<String>, ExtractError> {
        let items = self
            .get(path)?
            .as_array()
            .ok_or_else(|| self.invalid(path, "an array"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(ExtractError::InvalidType {
                    path: format!("{}[{}]", self.full_path(path), i),
                    expected: "a string",
                }),
            })
            .collect()
    }
}
