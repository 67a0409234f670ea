//! Response envelope wire types.
//!
//! Every non-binary response is wrapped in `{ code, msg, data? }`. Two code
//! values are reserved: [`ResultCode::SUCCESS`] resolves with the payload,
//! [`ResultCode::OVERDUE`] marks an expired session. Every other code is a
//! generic application error; the façade surfaces the whole envelope as the
//! rejection value so callers can branch on `code`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Reserved result codes.
#[derive(Debug, Clone, Copy)]
pub struct ResultCode;

impl ResultCode {
    /// Successful operation; the payload is in `data`.
    pub const SUCCESS: &'static str = "200";
    /// Session expired; the caller must re-authenticate.
    pub const OVERDUE: &'static str = "401";
}

/// The wire-level response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// Result code reported by the remote service.
    pub code: String,
    /// Human-readable message.
    pub msg: String,
    /// Optional payload, present on success and sometimes on errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ResponseEnvelope<T> {
    /// True if the result code is [`ResultCode::SUCCESS`].
    pub fn is_success(&self) -> bool {
        self.code == ResultCode::SUCCESS
    }

    /// True if the result code is [`ResultCode::OVERDUE`].
    pub fn is_session_expired(&self) -> bool {
        self.code == ResultCode::OVERDUE
    }
}

impl ResponseEnvelope<Value> {
    /// Unwraps the payload of a success envelope.
    ///
    /// A missing `data` field on success resolves to JSON `null`. Any
    /// non-success code, session-expired included, rejects with the full
    /// envelope as the error value.
    pub fn into_data(self) -> Result<Value, Error> {
        if self.is_success() {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(self.into())
        }
    }
}

impl From<ResponseEnvelope<Value>> for Error {
    fn from(envelope: ResponseEnvelope<Value>) -> Self {
        match envelope.data {
            Some(data) => Error::api_with_data(envelope.code, envelope.msg, data),
            None => Error::api(envelope.code, envelope.msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_deserializes_without_data() {
        let envelope: ResponseEnvelope<Value> =
            serde_json::from_str(r#"{"code":"500","msg":"boom"}"#).unwrap();
        assert_eq!(envelope.code, "500");
        assert_eq!(envelope.msg, "boom");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_success_resolves_with_data_only() {
        let envelope: ResponseEnvelope<Value> =
            serde_json::from_str(r#"{"code":"200","msg":"ok","data":{"id":7}}"#).unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.into_data().unwrap(), json!({"id": 7}));
    }

    #[test]
    fn test_success_with_missing_data_is_null() {
        let envelope: ResponseEnvelope<Value> =
            serde_json::from_str(r#"{"code":"200","msg":"ok"}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), Value::Null);
    }

    #[test]
    fn test_overdue_rejects_with_full_envelope() {
        let envelope: ResponseEnvelope<Value> =
            serde_json::from_str(r#"{"code":"401","msg":"login expired","data":{"uid":1}}"#)
                .unwrap();
        assert!(envelope.is_session_expired());

        let err = envelope.into_data().unwrap_err();
        let details = err.as_api().expect("envelope surfaced as error");
        assert_eq!(details.code, "401");
        assert_eq!(details.message, "login expired");
        assert_eq!(details.data, Some(json!({"uid": 1})));
    }

    #[test]
    fn test_generic_error_code_rejects() {
        let envelope: ResponseEnvelope<Value> =
            serde_json::from_str(r#"{"code":"10042","msg":"quota exceeded"}"#).unwrap();
        assert!(!envelope.is_success());
        assert!(!envelope.is_session_expired());

        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.as_api().unwrap().code, "10042");
    }

    #[test]
    fn test_typed_envelope_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct User {
            id: u64,
            name: String,
        }

        let envelope: ResponseEnvelope<User> = serde_json::from_str(
            r#"{"code":"200","msg":"ok","data":{"id":1,"name":"ada"}}"#,
        )
        .unwrap();
        assert_eq!(
            envelope.data,
            Some(User {
                id: 1,
                name: "ada".to_string()
            })
        );
    }
}
