//! Response envelope of the voice agent service
//!
//! Successful bodies look like `{"success": true, "data": ...}`. Failures
//! name their text inconsistently: `detail` (framework errors, sometimes a
//! list of validation items), `error`, or `message`. Everything here folds
//! those into [`Error::Api`] with one optional detail string.

use dispatch_core::{Error, Result, SessionGrant};
use serde::Deserialize;
use serde_json::Value;

/// Standard `{success, data | error}` envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Whether the service reports success; absent counts as success
    pub success: Option<bool>,
    /// Payload
    pub data: Option<T>,
    /// Failure text, any of the known field names
    #[serde(flatten)]
    pub failure: FailureText,
}

/// The fields a failure description may arrive in
#[derive(Debug, Default, Deserialize)]
pub struct FailureText {
    /// Framework-style detail; a string or a list of validation items
    pub detail: Option<Value>,
    /// Application-style error
    pub error: Option<Value>,
    /// Free-form message
    pub message: Option<Value>,
}

impl FailureText {
    /// First non-empty failure text, preferring `detail`, then `error`, then `message`
    pub fn text(&self) -> Option<String> {
        [&self.detail, &self.error, &self.message]
            .into_iter()
            .flatten()
            .find_map(value_text)
    }
}

impl<T> Envelope<T> {
    /// Payload of a successful envelope
    ///
    /// # Errors
    ///
    /// `success: false` becomes [`Error::Api`] with the failure text; a
    /// successful envelope without `data` is a contract violation.
    pub fn into_data(self, status: u16) -> Result<T> {
        if self.success == Some(false) {
            return Err(Error::api(status, self.failure.text()));
        }
        self.data
            .ok_or_else(|| Error::Other("response envelope carried no data".to_string()))
    }

    /// Accept an envelope whose payload is irrelevant
    ///
    /// # Errors
    ///
    /// `success: false` becomes [`Error::Api`] with the failure text.
    pub fn into_ack(self, status: u16) -> Result<()> {
        if self.success == Some(false) {
            return Err(Error::api(status, self.failure.text()));
        }
        Ok(())
    }
}

/// Body of `POST /calls/start`
///
/// The grant may sit at the top level or under `data`.
#[derive(Debug, Deserialize)]
pub struct StartCallBody {
    /// Whether the service reports success
    pub success: Option<bool>,
    /// Session token at the top level
    #[serde(alias = "access_token")]
    pub token: Option<String>,
    /// Agent identifier at the top level
    pub agent_id: Option<String>,
    /// Call record identifier at the top level
    pub call_id: Option<String>,
    /// Grant nested in the standard envelope
    pub data: Option<SessionGrant>,
    /// Failure text
    #[serde(flatten)]
    pub failure: FailureText,
}

impl StartCallBody {
    /// Session grant carried by the body
    ///
    /// # Errors
    ///
    /// `success: false` becomes [`Error::Api`]. A successful body without
    /// token and agent id is [`Error::SessionNotGranted`], since the call
    /// record already exists; anything else is [`Error::Other`].
    pub fn into_grant(self, status: u16) -> Result<SessionGrant> {
        if self.success == Some(false) {
            return Err(Error::api(status, self.failure.text()));
        }
        if let Some(grant) = self.data {
            return Ok(grant);
        }
        match (self.token, self.agent_id) {
            (Some(token), Some(agent_id)) => Ok(SessionGrant {
                token,
                agent_id,
                call_id: self.call_id,
            }),
            _ if self.success == Some(true) || self.call_id.is_some() => {
                Err(Error::SessionNotGranted {
                    call_id: self.call_id,
                })
            }
            _ => Err(Error::Other(
                "start-call response carried no session token".to_string(),
            )),
        }
    }
}

/// Failure text from a non-2xx response body, if it has one
pub fn failure_text_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<FailureText>(body)
        .ok()
        .and_then(|failure| failure.text())
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item.get("msg") {
                Some(msg) => value_text(msg),
                None => value_text(item),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
