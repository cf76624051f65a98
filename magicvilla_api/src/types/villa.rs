//! Villa payloads exchanged with the `/api/villa` resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric identifier for a villa.
pub type VillaID = i64;

/// Longest villa name the API accepts.
pub const MAX_NAME_LEN: usize = 30;

/// A villa as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VillaDto {
    pub id: VillaID,
    pub name: String,
    pub details: Option<String>,
    /// Nightly rate.
    pub rate: f64,
    pub sqft: i32,
    pub occupancy: i32,
    pub image_url: Option<String>,
    pub amenity: Option<String>,
}

/// Payload for `POST /api/villa`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VillaCreateDto {
    pub name: String,
    pub details: Option<String>,
    pub rate: f64,
    pub sqft: i32,
    pub occupancy: i32,
    pub image_url: Option<String>,
    pub amenity: Option<String>,
}

/// Payload for `PUT /api/villa/{id}`, and the document a patch is applied to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VillaUpdateDto {
    pub id: VillaID,
    pub name: String,
    pub details: Option<String>,
    pub rate: f64,
    pub sqft: i32,
    pub occupancy: i32,
    pub image_url: Option<String>,
    pub amenity: Option<String>,
}

impl VillaCreateDto {
    /// Returns one message per rule the payload breaks. Empty means valid.
    pub fn validation_errors(&self) -> Vec<String> {
        validate_fields(&self.name, self.rate, self.sqft, self.occupancy)
    }
}

impl VillaUpdateDto {
    pub fn validation_errors(&self) -> Vec<String> {
        validate_fields(&self.name, self.rate, self.sqft, self.occupancy)
    }
}

impl From<VillaDto> for VillaUpdateDto {
    fn from(villa: VillaDto) -> Self {
        Self {
            id: villa.id,
            name: villa.name,
            details: villa.details,
            rate: villa.rate,
            sqft: villa.sqft,
            occupancy: villa.occupancy,
            image_url: villa.image_url,
            amenity: villa.amenity,
        }
    }
}

fn validate_fields(name: &str, rate: f64, sqft: i32, occupancy: i32) -> Vec<String> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push("The Name field is required.".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.push(format!(
            "The field Name must be a string with a maximum length of {}.",
            MAX_NAME_LEN
        ));
    }
    if !rate.is_finite() || rate < 0.0 {
        errors.push("The Rate field must be a non-negative number.".to_string());
    }
    if sqft < 0 {
        errors.push("The Sqft field must not be negative.".to_string());
    }
    if occupancy < 0 {
        errors.push("The Occupancy field must not be negative.".to_string());
    }
    errors
}

/// JSON Patch operation kinds (RFC 6902).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

/// One entry of a JSON Patch document sent to `PATCH /api/villa/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl PatchOperation {
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value),
            from: None,
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
            from: None,
        }
    }
}
