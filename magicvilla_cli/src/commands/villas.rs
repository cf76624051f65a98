//! Client subcommands that call the villa API.

use anyhow::{anyhow, bail, Result};
use clap::Args;
use magicvilla_lib::types::{
    ApiResponse, PatchOp, PatchOperation, VillaCreateDto, VillaUpdateDto,
};
use magicvilla_lib::magicvilla_api::Error as ApiError;
use magicvilla_lib::VillaService;
use serde_json::Value;

use crate::output::{print_json, print_villas, OutputFormat};

#[derive(Args)]
pub struct GetArgs {
    /// Villa ID
    #[arg(long)]
    pub id: i64,
}

#[derive(Args)]
pub struct VillaFields {
    /// Villa name (at most 30 characters)
    #[arg(long)]
    pub name: String,

    /// Free-text description
    #[arg(long)]
    pub details: Option<String>,

    /// Nightly rate
    #[arg(long, default_value = "0")]
    pub rate: f64,

    /// Floor area in square feet
    #[arg(long, default_value = "0")]
    pub sqft: i32,

    /// Maximum number of guests
    #[arg(long, default_value = "0")]
    pub occupancy: i32,

    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// Amenity description
    #[arg(long)]
    pub amenity: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: VillaFields,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Villa ID
    #[arg(long)]
    pub id: i64,

    #[command(flatten)]
    pub fields: VillaFields,
}

#[derive(Args)]
pub struct PatchArgs {
    /// Villa ID
    #[arg(long)]
    pub id: i64,

    /// Operation as op:/path[=value], e.g. replace:/rate=250 or remove:/amenity.
    /// Values are read as JSON, falling back to a plain string.
    #[arg(long = "op", required = true)]
    pub ops: Vec<String>,
}

pub async fn list(service: &VillaService, format: &OutputFormat) -> Result<()> {
    let resp = service.get_all().await.map_err(api_failure)?;
    let villas = into_result(resp)?;
    eprintln!("{} villas", villas.len());
    print_villas(&villas, format)
}

pub async fn get(args: &GetArgs, service: &VillaService, format: &OutputFormat) -> Result<()> {
    let resp = service.get(args.id).await.map_err(api_failure)?;
    let villa = into_result(resp)?;
    print_villas(&[villa], format)
}

pub async fn create(args: &CreateArgs, service: &VillaService, format: &OutputFormat) -> Result<()> {
    let f = &args.fields;
    let dto = VillaCreateDto {
        name: f.name.clone(),
        details: f.details.clone(),
        rate: f.rate,
        sqft: f.sqft,
        occupancy: f.occupancy,
        image_url: f.image_url.clone(),
        amenity: f.amenity.clone(),
    };
    let resp = service.create(&dto).await.map_err(api_failure)?;
    let villa = into_result(resp)?;
    eprintln!("Created villa {}", villa.id);
    print_villas(&[villa], format)
}

pub async fn update(args: &UpdateArgs, service: &VillaService, format: &OutputFormat) -> Result<()> {
    let f = &args.fields;
    let dto = VillaUpdateDto {
        id: args.id,
        name: f.name.clone(),
        details: f.details.clone(),
        rate: f.rate,
        sqft: f.sqft,
        occupancy: f.occupancy,
        image_url: f.image_url.clone(),
        amenity: f.amenity.clone(),
    };
    let resp = service.update(&dto).await.map_err(api_failure)?;
    report_done(resp, &format!("Updated villa {}", args.id), format)
}

pub async fn patch(args: &PatchArgs, service: &VillaService, format: &OutputFormat) -> Result<()> {
    let ops = args
        .ops
        .iter()
        .map(|raw| parse_patch_op(raw))
        .collect::<Result<Vec<_>>>()?;
    let resp = service.patch(args.id, &ops).await.map_err(api_failure)?;
    report_done(resp, &format!("Patched villa {}", args.id), format)
}

pub async fn delete(args: &GetArgs, service: &VillaService, format: &OutputFormat) -> Result<()> {
    let resp = service.delete(args.id).await.map_err(api_failure)?;
    report_done(resp, &format!("Deleted villa {}", args.id), format)
}

/// Unwraps a successful envelope's payload, or turns its error messages
/// into an error.
fn into_result<R>(resp: ApiResponse<R>) -> Result<R> {
    if resp.is_failure() {
        bail!("{}", failure_text(&resp.error_messages));
    }
    let status = resp.status_code;
    resp.into_result()
        .ok_or_else(|| anyhow!("API returned {} without a result", status))
}

/// Reports a rejected request by its envelope's error messages.
fn api_failure(err: ApiError) -> anyhow::Error {
    anyhow!("{}", failure_text(&err.messages()))
}

fn report_done(resp: ApiResponse, message: &str, format: &OutputFormat) -> Result<()> {
    if resp.is_failure() {
        bail!("{}", failure_text(&resp.error_messages));
    }
    match format {
        OutputFormat::Json => print_json(&resp),
        _ => eprintln!("{}", message),
    }
    Ok(())
}

fn failure_text(messages: &[String]) -> String {
    if messages.is_empty() {
        "request failed".to_string()
    } else {
        messages.join("; ")
    }
}

/// Parses `op:/path[=value]`.
pub fn parse_patch_op(raw: &str) -> Result<PatchOperation> {
    let (op, rest) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("expected op:/path[=value], got '{}'", raw))?;
    let op = match op.trim().to_ascii_lowercase().as_str() {
        "add" => PatchOp::Add,
        "replace" => PatchOp::Replace,
        "remove" => PatchOp::Remove,
        "test" => PatchOp::Test,
        other => bail!("unsupported patch operation '{}'", other),
    };

    let (path, value) = match rest.split_once('=') {
        Some((path, value)) => (path, Some(parse_value(value))),
        None => (rest, None),
    };
    if !path.starts_with('/') {
        bail!("patch path must start with '/', got '{}'", path);
    }
    if matches!(op, PatchOp::Add | PatchOp::Replace | PatchOp::Test) && value.is_none() {
        bail!("operation '{}' needs a value", raw);
    }

    Ok(PatchOperation {
        op,
        path: path.to_string(),
        value,
        from: None,
    })
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicvilla_lib::types::{HttpStatusCode, VillaDto};
    use serde_json::json;

    #[test]
    fn parses_replace_with_number() {
        let op = parse_patch_op("replace:/rate=250").unwrap();
        assert_eq!(op.op, PatchOp::Replace);
        assert_eq!(op.path, "/rate");
        assert_eq!(op.value, Some(json!(250)));
    }

    #[test]
    fn parses_plain_string_value() {
        let op = parse_patch_op("replace:/name=Lagoon Villa").unwrap();
        assert_eq!(op.value, Some(json!("Lagoon Villa")));
    }

    #[test]
    fn parses_remove_without_value() {
        let op = parse_patch_op("remove:/amenity").unwrap();
        assert_eq!(op.op, PatchOp::Remove);
        assert_eq!(op.value, None);
    }

    #[test]
    fn rejects_malformed_ops() {
        assert!(parse_patch_op("replace/name=x").is_err());
        assert!(parse_patch_op("move:/name=x").is_err());
        assert!(parse_patch_op("replace:name=x").is_err());
        assert!(parse_patch_op("replace:/name").is_err());
    }

    #[test]
    fn into_result_surfaces_error_messages() {
        let resp: ApiResponse<VillaDto> =
            ApiResponse::failure(HttpStatusCode::Unset, ["connection refused", "retry later"]);
        let err = into_result(resp).unwrap_err();
        assert_eq!(err.to_string(), "connection refused; retry later");
    }

    #[test]
    fn rejected_request_reports_envelope_messages() {
        let err = ApiError::ClientFailure {
            status: 404,
            payload: r#"{"isSuccess":false,"statusCode":400,"errorMessages":["Villa with id 9 was not found"],"result":null}"#.to_string(),
        };
        assert_eq!(api_failure(err).to_string(), "Villa with id 9 was not found");
    }

    #[test]
    fn unrecognized_body_reports_error_text() {
        let err = ApiError::UnrecognizedBody {
            status: 415,
            payload: r#""Unsupported Media Type""#.to_string(),
        };
        let text = api_failure(err).to_string();
        assert!(text.starts_with("Unrecognized error response with status 415"));
    }

    #[test]
    fn into_result_requires_payload() {
        let resp: ApiResponse<VillaDto> = ApiResponse::empty(HttpStatusCode::Ok);
        assert!(into_result(resp).is_err());
    }
}
