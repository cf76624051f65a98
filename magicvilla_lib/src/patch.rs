//! Applies JSON Patch documents to a villa update payload.
//!
//! Only single-segment paths naming a top-level field are accepted
//! (`/name`, `/rate`, ...). Field names match case-insensitively.
//! `add` and `replace` set the field, `remove` clears it, `test` checks it.
//! `move` and `copy` are rejected.

use serde_json::{Map, Value};

use crate::types::{PatchOp, PatchOperation, VillaUpdateDto};

#[derive(thiserror::Error, Debug)]
pub enum PatchError {
    #[error("Unsupported patch operation {0:?}")]
    Unsupported(PatchOp),
    #[error("The path '{0}' does not refer to a villa field")]
    UnknownPath(String),
    #[error("The field at '{0}' cannot be patched")]
    ReadOnly(String),
    #[error("The {op:?} operation at '{path}' requires a value")]
    MissingValue { op: PatchOp, path: String },
    #[error("Test operation failed at '{0}'")]
    TestFailed(String),
    #[error("Patched villa is invalid: {0}")]
    InvalidResult(#[source] serde_json::Error),
}

/// Returns a copy of `doc` with `ops` applied in order. `doc` is untouched
/// when any operation fails.
pub fn apply_patch(
    doc: &VillaUpdateDto,
    ops: &[PatchOperation],
) -> Result<VillaUpdateDto, PatchError> {
    let mut fields = match serde_json::to_value(doc).map_err(PatchError::InvalidResult)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for op in ops {
        let key = resolve_field(&fields, &op.path)?;
        match op.op {
            PatchOp::Add | PatchOp::Replace => {
                let value = op.value.clone().ok_or_else(|| PatchError::MissingValue {
                    op: op.op,
                    path: op.path.clone(),
                })?;
                fields.insert(key, value);
            }
            PatchOp::Remove => {
                fields.insert(key, Value::Null);
            }
            PatchOp::Test => {
                let expected = op.value.as_ref().unwrap_or(&Value::Null);
                if fields.get(&key) != Some(expected) {
                    return Err(PatchError::TestFailed(op.path.clone()));
                }
            }
            PatchOp::Move | PatchOp::Copy => return Err(PatchError::Unsupported(op.op)),
        }
    }

    serde_json::from_value(Value::Object(fields)).map_err(PatchError::InvalidResult)
}

fn resolve_field(fields: &Map<String, Value>, path: &str) -> Result<String, PatchError> {
    let name = path
        .strip_prefix('/')
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .ok_or_else(|| PatchError::UnknownPath(path.to_string()))?;

    let key = fields
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| PatchError::UnknownPath(path.to_string()))?;

    if key == "id" {
        return Err(PatchError::ReadOnly(path.to_string()));
    }
    Ok(key)
}
