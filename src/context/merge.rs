//! Read-modify-write of a single field inside a JSON document.

use super::error::ContextError;
use serde_json::Value;

/// Replace `field` inside the object found at dotted `path` (empty = root).
///
/// Only existing keys can be replaced. On error the document is untouched.
pub fn set_field_at_path(
    root: &mut Value,
    path: &str,
    field: &str,
    value: Value,
) -> Result<(), ContextError> {
    let mut target = root;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        target = target
            .as_object_mut()
            .and_then(|obj| obj.get_mut(segment))
            .ok_or_else(|| ContextError::UnknownPath(path.to_string()))?;
    }

    let object = target
        .as_object_mut()
        .ok_or_else(|| ContextError::UnknownPath(path.to_string()))?;

    match object.get_mut(field) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(ContextError::UnknownField {
            path: path.to_string(),
            field: field.to_string(),
        }),
    }
}
