//! Shared API response types
//!
//! Every endpoint wraps its payload as `{ "data": ..., "message": ... }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;

/// Response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Write acknowledgement; `data` is whatever the server echoed back
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl WriteResponse {
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Decode a whole response body as an [`Envelope`]
pub fn decode_envelope<T: DeserializeOwned>(body: &Value) -> Result<Envelope<T>, ApiError> {
    if body.get("data").is_none() {
        return Err(ApiError::Decode("response has no 'data' field".to_string()));
    }
    serde_json::from_value(body.clone()).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull the `data` field out of a raw response body and decode it
pub fn decode_data<T: DeserializeOwned>(body: &Value) -> Result<T, ApiError> {
    decode_envelope(body).map(|envelope| envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_data() {
        let body = json!({ "data": [1, 2, 3], "message": "ok" });
        let values: Vec<i32> = decode_data(&body).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_data_missing_field() {
        let err = decode_data::<Vec<i32>>(&json!({ "message": "ok" })).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_envelope_keeps_message() {
        let body = json!({ "data": { "name": "fabel" }, "message": "Tag found" });
        let envelope: Envelope<Value> = decode_envelope(&body).unwrap();
        assert_eq!(envelope.data["name"], "fabel");
        assert_eq!(envelope.message.as_deref(), Some("Tag found"));

        let envelope: Envelope<Option<i32>> = decode_envelope(&json!({ "data": null })).unwrap();
        assert_eq!(envelope.data, None);
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_envelope_rejects_wrong_data_type() {
        let err = decode_data::<Vec<i32>>(&json!({ "data": "nope" })).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_write_response_tolerates_odd_bodies() {
        let response = WriteResponse::from_value(json!("deleted"));
        assert!(response.message.is_none());

        let response = WriteResponse::from_value(json!({ "message": "Delete successful" }));
        assert_eq!(response.message.as_deref(), Some("Delete successful"));
    }
}
