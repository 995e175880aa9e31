use crate::error::ApiError;
use crate::models::{
    DeviceRecord, OnuCommand, OnuCommandRequest, OnuKey, QueryOutcome, SearchRequest, UnlockResult,
};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Backend operations the console depends on.
#[async_trait::async_trait]
pub trait OltApi: Send + Sync + 'static {
    async fn query_status(&self, request: &SearchRequest) -> Result<QueryOutcome, ApiError>;

    async fn send_command(&self, command: OnuCommand, key: &OnuKey)
        -> Result<UnlockResult, ApiError>;
}

pub struct HttpOltClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpOltClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let resp = self.http.post(&url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: server_message(&text),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", path, e)))
    }
}

#[async_trait::async_trait]
impl OltApi for HttpOltClient {
    async fn query_status(&self, request: &SearchRequest) -> Result<QueryOutcome, ApiError> {
        let body = self.post_json("/olt/", request).await?;
        decode_status_body(body)
    }

    async fn send_command(
        &self,
        command: OnuCommand,
        key: &OnuKey,
    ) -> Result<UnlockResult, ApiError> {
        let body = self
            .post_json(command.path(), &OnuCommandRequest::from(key))
            .await?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::Decode(format!("{} response: {}", command.as_str(), e)))
    }
}

/// Classifies a status body: falsy values and `[]` are empty, arrays are
/// records, anything else is a protocol error.
pub fn decode_status_body(body: Value) -> Result<QueryOutcome, ApiError> {
    match body {
        Value::Null | Value::Bool(false) => Ok(QueryOutcome::Empty),
        Value::String(ref s) if s.is_empty() => Ok(QueryOutcome::Empty),
        Value::Number(ref n) if n.as_f64() == Some(0.0) => Ok(QueryOutcome::Empty),
        Value::Array(items) if items.is_empty() => Ok(QueryOutcome::Empty),
        Value::Array(items) => {
            let records = items
                .into_iter()
                .map(serde_json::from_value::<DeviceRecord>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ApiError::Decode(format!("device record: {}", e)))?;
            Ok(QueryOutcome::Records(records))
        }
        other => Err(ApiError::Decode(format!(
            "expected a list of devices, got {}",
            kind_of(&other)
        ))),
    }
}

// The backend reports failures as {"erro": "..."}
fn server_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("erro").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| text.to_string())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_bodies_are_empty() {
        for body in [json!(null), json!(false), json!(0), json!(""), json!([])] {
            assert_eq!(decode_status_body(body).unwrap(), QueryOutcome::Empty);
        }
    }

    #[test]
    fn array_body_yields_records() {
        let body = json!([{
            "description": "Maria Silva", "olt_ip": "10.0.0.1", "fsp": "0/1/2", "ont_id": 3,
            "run_state": "online", "rx_power": "-18.3", "alarm": null, "sn": "ABC123"
        }]);

        match decode_status_body(body).unwrap() {
            QueryOutcome::Records(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].key().legacy_id(), "10.0.0.1,0/1/2 3");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn truthy_non_array_is_a_protocol_error() {
        for body in [json!({"erro": "x"}), json!("Maria"), json!(1), json!(true)] {
            assert!(matches!(decode_status_body(body), Err(ApiError::Decode(_))));
        }
    }

    #[test]
    fn malformed_record_is_a_protocol_error() {
        let body = json!([{ "description": "no key fields" }]);
        assert!(matches!(decode_status_body(body), Err(ApiError::Decode(_))));
    }

    #[test]
    fn server_message_prefers_erro_field() {
        assert_eq!(server_message(r#"{"erro": "timeout"}"#), "timeout");
        assert_eq!(server_message("Internal Server Error"), "Internal Server Error");
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = HttpOltClient::new("http://127.0.0.1:169/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:169");
    }
}
