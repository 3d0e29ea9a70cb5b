//! CJTP request and response shapes and their JSON field mapping

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::protocol::StatusCode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RequestBody {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            cid: None,
            name: Some(name.into()),
        }
    }

    /// Compact JSON text of the body, used by `echo`.
    pub fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_body"
    )]
    pub body: Option<RequestBody>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            path: Some(path.into()),
            date: Some(date.into()),
            body: None,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Decodes one request payload. `null`, truncated or otherwise malformed
    /// input is rejected as an illegal body.
    pub fn decode(payload: &[u8]) -> Result<Self, AppError> {
        match serde_json::from_slice::<Option<Request>>(payload) {
            Ok(Some(request)) => Ok(request),
            Ok(None) => Err(AppError::bad_request("illegal body")),
            Err(err) => {
                tracing::debug!(error = %err, "request payload failed to decode");
                Err(AppError::bad_request("illegal body"))
            }
        }
    }

    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }
}

/// The body travels either as an object or as a string holding an encoded object.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireBody {
    Fields(RequestBody),
    Encoded(String),
}

fn deserialize_body<'de, D>(deserializer: D) -> Result<Option<RequestBody>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<WireBody>::deserialize(deserializer)? {
        None => Ok(None),
        Some(WireBody::Fields(body)) => Ok(Some(body)),
        Some(WireBody::Encoded(text)) if text.trim().is_empty() => Ok(Some(RequestBody::default())),
        Some(WireBody::Encoded(text)) => serde_json::from_str::<RequestBody>(&text)
            .map(Some)
            .map_err(D::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self::status_only(status.as_str())
    }

    pub fn status_only(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_status_line(&self.status)
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
