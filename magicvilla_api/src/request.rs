//! The outbound request descriptor handed to [`Client::send`](crate::Client::send).

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

/// HTTP verb for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiType {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl ApiType {
    pub fn method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Unrecognized verbs fall back to GET.
impl FromStr for ApiType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            _ => Self::Get,
        })
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// How `data` is encoded into the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Json,
    /// Each top-level key of `data` becomes a text part; each attached
    /// [`FormFile`] becomes a file part.
    MultipartFormData,
}

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFile {
    /// Form field name.
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/png`. Left to the transport when `None`.
    pub mime: Option<String>,
}

/// Everything needed to make one API call.
///
/// Built with the `with_*` methods, then read-only.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    api_type: ApiType,
    url: String,
    data: Option<Value>,
    token: Option<String>,
    content_type: ContentType,
    files: Vec<FormFile>,
}

impl ApiRequest {
    /// `url` may be absolute or relative to the client's base URL.
    pub fn new(api_type: ApiType, url: impl Into<String>) -> Self {
        Self {
            api_type,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(ApiType::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(ApiType::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(ApiType::Put, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(ApiType::Patch, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(ApiType::Delete, url)
    }

    /// Sets the payload. Serialization happens here so the descriptor stays
    /// independent of the payload's type.
    pub fn with_data<D: Serialize + ?Sized>(mut self, data: &D) -> Result<Self, serde_json::Error> {
        self.data = Some(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Sets the bearer token. Empty tokens are ignored.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Attaches a file and switches the encoding to multipart.
    pub fn with_file(mut self, file: FormFile) -> Self {
        self.files.push(file);
        self.content_type = ContentType::MultipartFormData;
        self
    }

    pub fn api_type(&self) -> ApiType {
        self.api_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn files(&self) -> &[FormFile] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_verb_defaults_to_get() {
        assert_eq!("OPTIONS".parse::<ApiType>().unwrap(), ApiType::Get);
        assert_eq!("".parse::<ApiType>().unwrap(), ApiType::Get);
        assert_eq!("delete".parse::<ApiType>().unwrap(), ApiType::Delete);
        assert_eq!("Post".parse::<ApiType>().unwrap(), ApiType::Post);
    }

    #[test]
    fn api_type_display_is_method_name() {
        assert_eq!(ApiType::Patch.to_string(), "PATCH");
    }

    #[test]
    fn builder_sets_fields() {
        let req = ApiRequest::post("/api/villa")
            .with_data(&json!({"name": "Royal"}))
            .unwrap()
            .with_token("abc");
        assert_eq!(req.api_type(), ApiType::Post);
        assert_eq!(req.url(), "/api/villa");
        assert_eq!(req.data(), Some(&json!({"name": "Royal"})));
        assert_eq!(req.token(), Some("abc"));
        assert_eq!(req.content_type(), ContentType::Json);
    }

    #[test]
    fn empty_token_is_dropped() {
        let req = ApiRequest::get("/api/villa").with_token("");
        assert_eq!(req.token(), None);
    }

    #[test]
    fn attaching_file_switches_to_multipart() {
        let req = ApiRequest::post("/api/villa").with_file(FormFile {
            field: "image".into(),
            file_name: "villa.png".into(),
            bytes: vec![1, 2, 3],
            mime: Some("image/png".into()),
        });
        assert_eq!(req.content_type(), ContentType::MultipartFormData);
        assert_eq!(req.files().len(), 1);
    }
}
