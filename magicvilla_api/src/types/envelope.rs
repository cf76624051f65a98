//! The result envelope every `/api/villa` response is wrapped in.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// HTTP-style outcome code carried inside an [`ApiResponse`].
///
/// Serialized as its numeric code. Deserializes from either the number
/// (`400`) or the status name (`"BadRequest"`), since both forms show up on
/// the wire depending on how the producing server formats enums. Names
/// outside the standard HTTP set read as [`HttpStatusCode::Unset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpStatusCode {
    /// No status recorded yet. Serialized as `0`.
    #[default]
    Unset,
    Ok,
    Created,
    NoContent,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServerError,
    /// Any code without a dedicated variant.
    Other(u16),
}

impl HttpStatusCode {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Unset => 0,
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
            Self::Other(code) => code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            0 => Self::Unset,
            200 => Self::Ok,
            201 => Self::Created,
            204 => Self::NoContent,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::InternalServerError,
            other => Self::Other(other),
        }
    }

    /// Parses a status name such as `"NotFound"` or `"Conflict"`
    /// (case-insensitive) or a numeric string such as `"404"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Ok(code) = name.parse::<u16>() {
            return Some(Self::from_u16(code));
        }
        if name.eq_ignore_ascii_case("unset") {
            return Some(Self::Unset);
        }
        STATUS_NAMES
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(name))
            .map(|(code, _)| Self::from_u16(*code))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unset => "Unset",
            Self::Other(code) => STATUS_NAMES
                .iter()
                .find(|(known, _)| *known == code)
                .map(|(_, name)| *name)
                .unwrap_or("Other"),
            named => STATUS_NAMES
                .iter()
                .find(|(known, _)| *known == named.as_u16())
                .map(|(_, name)| *name)
                .unwrap_or("Other"),
        }
    }

    /// True for codes in the 2xx range.
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.as_u16())
    }
}

/// Status names as .NET's `HttpStatusCode` spells them. Where two names share
/// a code the first one is used for display.
const STATUS_NAMES: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "SwitchingProtocols"),
    (102, "Processing"),
    (103, "EarlyHints"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "NonAuthoritativeInformation"),
    (204, "NoContent"),
    (205, "ResetContent"),
    (206, "PartialContent"),
    (207, "MultiStatus"),
    (208, "AlreadyReported"),
    (226, "IMUsed"),
    (300, "MultipleChoices"),
    (300, "Ambiguous"),
    (301, "MovedPermanently"),
    (301, "Moved"),
    (302, "Found"),
    (302, "Redirect"),
    (303, "SeeOther"),
    (303, "RedirectMethod"),
    (304, "NotModified"),
    (305, "UseProxy"),
    (306, "Unused"),
    (307, "TemporaryRedirect"),
    (307, "RedirectKeepVerb"),
    (308, "PermanentRedirect"),
    (400, "BadRequest"),
    (401, "Unauthorized"),
    (402, "PaymentRequired"),
    (403, "Forbidden"),
    (404, "NotFound"),
    (405, "MethodNotAllowed"),
    (406, "NotAcceptable"),
    (407, "ProxyAuthenticationRequired"),
    (408, "RequestTimeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "LengthRequired"),
    (412, "PreconditionFailed"),
    (413, "RequestEntityTooLarge"),
    (414, "RequestUriTooLong"),
    (415, "UnsupportedMediaType"),
    (416, "RequestedRangeNotSatisfiable"),
    (417, "ExpectationFailed"),
    (421, "MisdirectedRequest"),
    (422, "UnprocessableEntity"),
    (422, "UnprocessableContent"),
    (423, "Locked"),
    (424, "FailedDependency"),
    (426, "UpgradeRequired"),
    (428, "PreconditionRequired"),
    (429, "TooManyRequests"),
    (431, "RequestHeaderFieldsTooLarge"),
    (451, "UnavailableForLegalReasons"),
    (500, "InternalServerError"),
    (501, "NotImplemented"),
    (502, "BadGateway"),
    (503, "ServiceUnavailable"),
    (504, "GatewayTimeout"),
    (505, "HttpVersionNotSupported"),
    (506, "VariantAlsoNegotiates"),
    (507, "InsufficientStorage"),
    (508, "LoopDetected"),
    (510, "NotExtended"),
    (511, "NetworkAuthenticationRequired"),
];

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        Self::from_u16(code)
    }
}

impl fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.name())
    }
}

impl Serialize for HttpStatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

impl<'de> Deserialize<'de> for HttpStatusCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(u16),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Ok(Self::from_u16(code)),
            Repr::Name(name) => Ok(Self::from_name(&name).unwrap_or_else(|| {
                tracing::warn!("Unknown status code name {:?}, reading as Unset", name);
                Self::Unset
            })),
        }
    }
}

/// Uniform success/failure wrapper for one operation's outcome.
///
/// `isSuccess` and `statusCode` are required when deserializing: a JSON
/// object without them is not treated as an envelope. `result` is generic
/// so call sites can name the payload shape they expect; it defaults to raw
/// JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<R = Value> {
    pub is_success: bool,
    pub status_code: HttpStatusCode,
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub result: Option<R>,
}

impl<R> Default for ApiResponse<R> {
    fn default() -> Self {
        Self {
            is_success: true,
            status_code: HttpStatusCode::Unset,
            error_messages: Vec::new(),
            result: None,
        }
    }
}

impl<R> ApiResponse<R> {
    /// A successful envelope with the given status and payload.
    pub fn success(status_code: HttpStatusCode, result: R) -> Self {
        Self {
            is_success: true,
            status_code,
            error_messages: Vec::new(),
            result: Some(result),
        }
    }

    /// A successful envelope with no payload, e.g. for `NoContent`.
    pub fn empty(status_code: HttpStatusCode) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// A failed envelope. `result` is always absent.
    pub fn failure<I, S>(status_code: HttpStatusCode, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_success: false,
            status_code,
            error_messages: messages.into_iter().map(Into::into).collect(),
            result: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success
    }

    /// Consumes the envelope, returning the payload only when it succeeded.
    pub fn into_result(self) -> Option<R> {
        if self.is_success {
            self.result
        } else {
            None
        }
    }
}
