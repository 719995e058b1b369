//! # Arguments bound to a worker target.
//!
//! [`TaskArgs`] carries the positional and named arguments fixed at worker construction.
//! Values are [`serde_json::Value`]s so heterogeneous argument lists stay cheap to clone,
//! and typed access goes through serde.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TaskError;

/// Positional and named arguments for one target invocation.
///
/// # Example
/// ```
/// use serde_json::json;
/// use waitvisor::TaskArgs;
///
/// let args = TaskArgs::new()
///     .push(json!("ACGTTGCA"))
///     .with("min_len", json!(18));
///
/// let seq: String = args.get_positional(0).unwrap();
/// let min_len: u32 = args.get("min_len").unwrap();
/// assert_eq!(seq, "ACGTTGCA");
/// assert_eq!(min_len, 18);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskArgs {
    /// Ordered positional arguments.
    pub positional: Vec<Value>,
    /// Named arguments.
    pub named: BTreeMap<String, Value>,
}

impl TaskArgs {
    /// Empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn push(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    /// Sets a named argument, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.named.insert(key.into(), value);
        self
    }

    /// Raw positional argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Raw named argument.
    pub fn named(&self, key: &str) -> Option<&Value> {
        self.named.get(key)
    }

    /// Deserializes the positional argument at `index`.
    ///
    /// Fails with [`TaskError::Fail`] when the argument is missing or has the wrong shape.
    pub fn get_positional<T: DeserializeOwned>(&self, index: usize) -> Result<T, TaskError> {
        let value = self
            .arg(index)
            .ok_or_else(|| TaskError::fail(format!("missing positional argument #{index}")))?;
        decode(value, || format!("positional argument #{index}"))
    }

    /// Deserializes the named argument `key`.
    ///
    /// Fails with [`TaskError::Fail`] when the argument is missing or has the wrong shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, TaskError> {
        let value = self
            .named(key)
            .ok_or_else(|| TaskError::fail(format!("missing named argument '{key}'")))?;
        decode(value, || format!("named argument '{key}'"))
    }

    /// True if there are neither positional nor named arguments.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

fn decode<T: DeserializeOwned>(
    value: &Value,
    what: impl FnOnce() -> String,
) -> Result<T, TaskError> {
    serde_json::from_value(value.clone())
        .map_err(|e| TaskError::fail(format!("invalid {}: {e}", what())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_empty() {
        let args = TaskArgs::default();
        assert!(args.is_empty());
        assert!(args.arg(0).is_none());
        assert!(args.named("k").is_none());
    }

    #[test]
    fn missing_and_mistyped_arguments_fail() {
        let args = TaskArgs::new().push(json!("text")).with("n", json!("nope"));

        let err = args.get_positional::<String>(1).unwrap_err();
        assert!(err.to_string().contains("missing positional argument #1"));

        let err = args.get::<u32>("n").unwrap_err();
        assert!(err.to_string().contains("invalid named argument 'n'"), "{err}");

        let err = args.get::<u32>("absent").unwrap_err();
        assert_eq!(err.as_label(), "task_failed");
    }

    #[test]
    fn named_arguments_replace() {
        let args = TaskArgs::new().with("k", json!(1)).with("k", json!(2));
        assert_eq!(args.get::<i64>("k").unwrap(), 2);
    }
}
