//! HTTP dispatcher for the MagicVilla API.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{
    classify::{classify, to_failure_result, truncate_body},
    request::{ApiRequest, ContentType},
    Error,
};

/// Reasons a request never produced a response.
#[derive(thiserror::Error, Debug)]
enum TransportError {
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Sends [`ApiRequest`]s and classifies the replies.
///
/// Holds one pooled `reqwest::Client`, so clones and concurrent calls share
/// connections. Nothing else is shared between calls. No timeout is set and
/// no request is retried.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    /// Relative request URLs are resolved against this.
    base_api_url: Url,
}

impl Client {
    /// Creates a client for the API at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build()?;
        Self::with_http_client(base_url, http)
    }

    /// Creates a client that reuses an existing connection pool.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_api_url = Url::parse(base_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", base_url, e);
            Error::InvalidBaseUrl(e)
        })?;
        Ok(Self { http, base_api_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_api_url
    }

    /// Sends `request` and reads the reply as `T`.
    ///
    /// Transport failures and unreadable bodies come back as `Ok`, holding a
    /// failure envelope read as `T`. `Err` is returned for a 400/404
    /// envelope ([`Error::ClientFailure`]), a non-envelope error body
    /// ([`Error::UnrecognizedBody`]), or when `T` cannot represent the
    /// failure at all.
    pub async fn send<T>(&self, request: &ApiRequest) -> Result<T, Error>
    where
        T: DeserializeOwned + Serialize,
    {
        let (status, body) = match self.dispatch(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("{} {} failed: {}", request.api_type(), request.url(), e);
                return to_failure_result(&e.to_string());
            }
        };

        match classify::<T>(status, &body) {
            Err(Error::Deserialize(e)) => {
                tracing::error!(
                    "Failed to parse response: {} | body: {}",
                    e,
                    truncate_body(&body)
                );
                to_failure_result(&e.to_string())
            }
            other => other,
        }
    }

    fn resolve_url(&self, url: &str) -> Result<Url, url::ParseError> {
        self.base_api_url.join(url)
    }

    fn build_request(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = self.resolve_url(request.url())?;
        let mut builder = self
            .http
            .request(request.api_type().method(), url)
            .header(ACCEPT, "application/json");

        if let Some(token) = request.token().filter(|t| !t.is_empty()) {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        builder = match request.content_type() {
            ContentType::Json => match request.data() {
                Some(data) => builder.json(data),
                None => builder,
            },
            ContentType::MultipartFormData => builder.multipart(build_form(request)?),
        };

        Ok(builder)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<(u16, String), TransportError> {
        let builder = self.build_request(request)?;
        tracing::debug!("{} {}", request.api_type(), request.url());

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        tracing::debug!("{} {} -> {}", request.api_type(), request.url(), status);

        Ok((status, body))
    }
}

fn build_form(request: &ApiRequest) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();

    match request.data() {
        Some(Value::Object(fields)) => {
            for (key, value) in fields {
                match value {
                    Value::Null => {}
                    Value::String(text) => form = form.text(key.clone(), text.clone()),
                    other => form = form.text(key.clone(), other.to_string()),
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => form = form.text("data", other.to_string()),
    }

    for file in request.files() {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
        }
        form = form.part(file.field.clone(), part);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::FormFile;
    use serde_json::json;

    #[test]
    fn relative_urls_resolve_against_base() {
        let client = Client::new("http://localhost:7001").unwrap();
        assert_eq!(
            client.resolve_url("/api/villa/3").unwrap().as_str(),
            "http://localhost:7001/api/villa/3"
        );
    }

    #[test]
    fn absolute_urls_are_kept() {
        let client = Client::new("http://localhost:7001").unwrap();
        assert_eq!(
            client.resolve_url("https://villas.example/api/villa").unwrap().as_str(),
            "https://villas.example/api/villa"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = Client::new("not a url");
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn request_carries_accept_and_bearer_headers() {
        let client = Client::new("http://localhost:7001").unwrap();
        let req = ApiRequest::get("/api/villa").with_token("secret");
        let built = client.build_request(&req).unwrap().build().unwrap();
        assert_eq!(built.headers()[ACCEPT], "application/json");
        assert_eq!(built.headers()[AUTHORIZATION], "Bearer secret");
        assert_eq!(built.method(), reqwest::Method::GET);
    }

    #[test]
    fn request_without_token_has_no_authorization() {
        let client = Client::new("http://localhost:7001").unwrap();
        let req = ApiRequest::delete("/api/villa/1");
        let built = client.build_request(&req).unwrap().build().unwrap();
        assert!(built.headers().get(AUTHORIZATION).is_none());
        assert_eq!(built.method(), reqwest::Method::DELETE);
    }

    #[test]
    fn multipart_request_gets_form_content_type() {
        let client = Client::new("http://localhost:7001").unwrap();
        let req = ApiRequest::post("/api/villa")
            .with_data(&json!({"name": "Royal", "occupancy": 4, "amenity": null}))
            .unwrap()
            .with_file(FormFile {
                field: "image".into(),
                file_name: "royal.png".into(),
                bytes: vec![0x89, 0x50],
                mime: Some("image/png".into()),
            });
        let built = client.build_request(&req).unwrap().build().unwrap();
        let content_type = built.headers()[reqwest::header::CONTENT_TYPE]
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn bad_mime_type_is_transport_error() {
        let req = ApiRequest::post("/api/villa").with_file(FormFile {
            field: "image".into(),
            file_name: "royal.png".into(),
            bytes: vec![],
            mime: Some("not a mime".into()),
        });
        assert!(build_form(&req).is_err());
    }
}
