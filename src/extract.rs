//! Recovery of error records from inconsistently shaped error bodies.

use serde_json::Value;

use crate::error::ErrorDetail;

const ERRORS: &str = "errors";
const INPUT_ERRORS: &str = "inputErrors";
const CODE: &str = "code";

/// Walk `data` depth-first and yield every error record found in it.
///
/// At each level an `errors` key is unwrapped once. An object holding
/// `inputErrors` yields only what is found under that key; an object holding
/// `code` is itself a record; any other object or array is a container whose
/// children are searched in order. Scalars are yielded unchanged.
///
/// Never fails; the result may be empty.
pub fn extract_errors(data: &Value) -> ErrorRecords<'_> {
    ErrorRecords { stack: vec![data] }
}

/// Lazy iterator returned by [`extract_errors`].
#[derive(Debug, Clone)]
pub struct ErrorRecords<'a> {
    // Pending values, next one on top.
    stack: Vec<&'a Value>,
}

impl Iterator for ErrorRecords<'_> {
    type Item = ErrorDetail;

    fn next(&mut self) -> Option<ErrorDetail> {
        while let Some(mut value) = self.stack.pop() {
            if let Some(inner) = value.get(ERRORS) {
                value = inner;
            }

            match value {
                Value::Object(map) => {
                    if let Some(inputs) = map.get(INPUT_ERRORS) {
                        self.stack.push(inputs);
                    } else if map.contains_key(CODE) {
                        return Some(ErrorDetail::from(value.clone()));
                    } else {
                        self.stack.extend(map.values().rev());
                    }
                }
                Value::Array(items) => self.stack.extend(items.iter().rev()),
                other => return Some(ErrorDetail::from(other.clone())),
            }
        }
        None
    }
}
