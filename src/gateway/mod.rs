pub mod error_body;

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::Config;
use crate::errors::FlowError;

pub use error_body::{
    first_failing_step, group_by_section, normalize, RemoteErrorBody, RemoteFieldError,
    GENERAL_FIELD, GENERAL_SECTION,
};

/// Outcome of a submission call, classified by status before any field-level
/// mapping happens.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// 2xx with the envelope payload.
    Accepted(Value),
    /// 401 short-circuits the field-error path entirely.
    AuthRequired,
    /// 403: generic denial, fatal to the attempt.
    Denied,
    /// Any other non-2xx; the body goes through error-shape decoding.
    Rejected { status: u16, errors: RemoteErrorBody },
    /// No response at all (connect/timeout); handled as a generic message.
    TransportFailed(String),
}

/// One entry of a reference-data lookup list (step choice population).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    pub value: String,
    pub label: String,
}

/// Async client for the remote banking gateway.
///
/// Carries the bearer credential and a generation counter: navigation bumps
/// the generation, and any lookup response issued under an older generation
/// is discarded rather than allowed to overwrite newer state.
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    generation: AtomicU64,
}

impl GatewayClient {
    pub fn new(config: &Config) -> Result<Self, FlowError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("onboard-core/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
            token: config.bearer_token(),
            generation: AtomicU64::new(0),
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidates in-flight lookups; returns the new generation.
    pub fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Posts a submission payload. Transport failures are reported as a
    /// [`SubmitResult::TransportFailed`] so callers can degrade gracefully
    /// instead of crashing the attempt.
    pub async fn submit(&self, path: &str, payload: &Value) -> Result<SubmitResult, FlowError> {
        tracing::debug!("submitting payload to {}", path);
        let request = self.authorize(self.client.post(self.url(path))).json(payload);
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("gateway unreachable: {}", err);
                return Ok(SubmitResult::TransportFailed(err.to_string()));
            }
        };
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(classify_response(status, &body))
    }

    /// Fetches a reference-data list. Returns `Ok(None)` when the response is
    /// stale, i.e. the generation moved on while the request was in flight.
    /// Independent lookups can run concurrently; each is awaited on its own.
    pub async fn fetch_reference(
        &self,
        path: &str,
        generation: u64,
    ) -> Result<Option<Vec<ReferenceItem>>, FlowError> {
        let request = self.authorize(self.client.get(self.url(path)));
        let response = request.send().await?;
        if generation != self.generation() {
            tracing::debug!("discarding stale lookup response for {}", path);
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            return Err(FlowError::Gateway(format!(
                "lookup {} failed with status {}",
                path, status
            )));
        }
        let body = response.text().await?;
        let envelope = Envelope::decode(&body);
        if !envelope.success {
            return Err(FlowError::Gateway(format!("lookup {} reported failure", path)));
        }
        Ok(Some(decode_reference_items(&envelope.payload)))
    }
}

/// Maps an HTTP status plus raw body to a [`SubmitResult`]. Pure, so the
/// classification is testable without a live gateway.
pub fn classify_response(status: u16, body: &str) -> SubmitResult {
    match status {
        200..=299 => {
            let envelope = Envelope::decode(body);
            if envelope.success {
                SubmitResult::Accepted(envelope.payload)
            } else {
                // 2xx with a failure envelope still goes through error mapping.
                SubmitResult::Rejected {
                    status,
                    errors: RemoteErrorBody::decode(body),
                }
            }
        }
        401 => SubmitResult::AuthRequired,
        403 => SubmitResult::Denied,
        _ => SubmitResult::Rejected {
            status,
            errors: RemoteErrorBody::decode(body),
        },
    }
}

/// Success envelope, normalized across the gateway's inconsistent naming
/// (`isSuccess`/`is_success`/`success`, `data`/`result`).
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub success: bool,
    pub payload: Value,
}

impl Envelope {
    pub fn decode(body: &str) -> Self {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(err) => {
                if !body.trim().is_empty() {
                    tracing::warn!("unparseable gateway envelope: {}", err);
                }
                Value::Null
            }
        };
        let success = ["isSuccess", "is_success", "success"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_bool))
            .unwrap_or(true);
        let payload = ["data", "result"]
            .iter()
            .find_map(|key| value.get(key).cloned())
            .unwrap_or(value);
        Self { success, payload }
    }
}

fn decode_reference_items(payload: &Value) -> Vec<ReferenceItem> {
    let Value::Array(items) = payload else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(label) => Some(ReferenceItem {
                value: label.clone(),
                label: label.clone(),
            }),
            Value::Object(map) => {
                let label = map.get("label").or_else(|| map.get("name"))?.as_str()?;
                let value = map
                    .get("value")
                    .or_else(|| map.get("id"))
                    .and_then(Value::as_str)
                    .unwrap_or(label);
                Some(ReferenceItem {
                    value: value.to_string(),
                    label: label.to_string(),
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_always_takes_the_auth_path() {
        for body in ["", "{}", r#"{ "errors": { "Email": ["Taken"] } }"#, "<html>"] {
            assert_eq!(classify_response(401, body), SubmitResult::AuthRequired);
        }
    }

    #[test]
    fn status_403_is_a_generic_denial() {
        assert_eq!(classify_response(403, "{}"), SubmitResult::Denied);
    }

    #[test]
    fn success_envelope_naming_is_normalized() {
        let camel = Envelope::decode(r#"{ "isSuccess": true, "data": {"id": 7} }"#);
        assert!(camel.success);
        assert_eq!(camel.payload["id"], 7);

        let snake = Envelope::decode(r#"{ "is_success": false, "result": [] }"#);
        assert!(!snake.success);

        let bare = Envelope::decode(r#"{ "id": 9 }"#);
        assert!(bare.success);
        assert_eq!(bare.payload["id"], 9);
    }

    #[test]
    fn unparseable_envelope_decodes_to_null_payload() {
        let envelope = Envelope::decode("<html>gateway timeout</html>");
        assert!(envelope.success);
        assert_eq!(envelope.payload, Value::Null);
    }

    #[test]
    fn failure_status_carries_decoded_error_body() {
        let result = classify_response(422, r#"{ "errors": { "Email": ["Taken"] } }"#);
        let SubmitResult::Rejected { status, errors } = result else {
            panic!("expected rejection");
        };
        assert_eq!(status, 422);
        assert!(matches!(errors, RemoteErrorBody::FieldMap(_)));
    }

    #[test]
    fn bumping_the_generation_invalidates_older_lookups() {
        let client = GatewayClient::new(&Config::default()).expect("client");
        let issued = client.generation();
        assert_eq!(client.bump_generation(), issued + 1);
        assert_ne!(client.generation(), issued);
    }

    #[test]
    fn reference_items_accept_both_wire_shapes() {
        let strings = decode_reference_items(&serde_json::json!(["Lagos", "Abuja"]));
        assert_eq!(strings[0].label, "Lagos");

        let objects = decode_reference_items(
            &serde_json::json!([{ "value": "NG-LA", "label": "Lagos" }]),
        );
        assert_eq!(objects[0].value, "NG-LA");
        assert_eq!(objects[0].label, "Lagos");
    }
}
