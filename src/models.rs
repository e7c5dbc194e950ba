use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// Options to use when creating a session, they will override default values if set.
///
/// The default value for host is http://localhost:5000
/// The default value for timeout is 10ms
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub host: Option<String>,
    pub timeout: Option<Duration>,
}

/// Visitor context forwarded on every request made by a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionParams {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Per-call knobs for `Session::participate`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipateOptions {
    /// Alternative to assign instead of letting the server pick one. Ignored
    /// unless it is one of the alternatives.
    pub force: Option<String>,
    pub traffic_fraction: TrafficFraction,
    /// Speculative participation, not counted towards conversions.
    pub prefetch: bool,
}

impl ParticipateOptions {
    pub fn forced(alternative: impl Into<String>) -> Self {
        Self {
            force: Some(alternative.into()),
            ..Self::default()
        }
    }

    pub fn prefetched() -> Self {
        Self {
            prefetch: true,
            ..Self::default()
        }
    }
}

/// Share of traffic eligible for enrollment. Accepts numbers or numeric text.
#[derive(Debug, Clone, PartialEq)]
pub enum TrafficFraction {
    Number(f64),
    Text(String),
}

impl Default for TrafficFraction {
    fn default() -> Self {
        TrafficFraction::Number(1.0)
    }
}

impl TrafficFraction {
    pub fn coerce(&self) -> Option<f64> {
        match self {
            TrafficFraction::Number(n) => Some(*n),
            TrafficFraction::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Coerces and range checks the fraction, returning the form sent on the wire.
    pub fn to_query_value(&self) -> Result<String> {
        match self.coerce() {
            Some(n) if (0.0..=1.0).contains(&n) => Ok(n.to_string()),
            _ => Err(Error::InvalidTrafficFraction(self.to_string())),
        }
    }
}

impl std::fmt::Display for TrafficFraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficFraction::Number(n) => write!(f, "{n}"),
            TrafficFraction::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f64> for TrafficFraction {
    fn from(n: f64) -> Self {
        TrafficFraction::Number(n)
    }
}

impl From<u32> for TrafficFraction {
    fn from(n: u32) -> Self {
        TrafficFraction::Number(n.into())
    }
}

impl From<&str> for TrafficFraction {
    fn from(s: &str) -> Self {
        TrafficFraction::Text(s.to_string())
    }
}

impl From<String> for TrafficFraction {
    fn from(s: String) -> Self {
        TrafficFraction::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Ok,
    Failed,
    Other(String),
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ok" => Status::Ok,
            "failed" => Status::Failed,
            _ => Status::Other(s),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => "ok".to_string(),
            Status::Failed => "failed".to_string(),
            Status::Other(s) => s,
        }
    }
}

/// Normalized result of every sixpack call.
///
/// Only `status` is typed. Everything else a successful server body carries
/// is kept untouched in `fields`, so it serializes back exactly as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SixpackResponse {
    pub status: Status,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SixpackResponse {
    /// Failed result carrying `response` as the diagnostic.
    pub fn failed(response: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("response".to_string(), Value::String(response.into()));
        Self {
            status: Status::Failed,
            fields,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Diagnostic of a failed call, or whatever the server sent under `response`.
    pub fn response(&self) -> Option<&Value> {
        self.get("response")
    }

    pub fn alternative_name(&self) -> Option<&str> {
        self.get("alternative")?.get("name")?.as_str()
    }

    /// Sets `alternative` to the control when the call failed.
    pub fn with_default_alternative(self, control: &str) -> Self {
        if self.status != Status::Failed {
            return self;
        }
        let mut fields = self.fields;
        fields.insert("alternative".to_string(), json!({ "name": control }));
        Self { fields, ..self }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_traffic_fraction_coercion() {
        assert_eq!(TrafficFraction::default().to_query_value(), Ok("1".to_string()));
        assert_eq!(TrafficFraction::from(0.5).to_query_value(), Ok("0.5".to_string()));
        assert_eq!(TrafficFraction::from(0u32).to_query_value(), Ok("0".to_string()));
        assert_eq!(
            TrafficFraction::from(" 0.25 ").to_query_value(),
            Ok("0.25".to_string())
        );
        assert_eq!(TrafficFraction::from("1.0").to_query_value(), Ok("1".to_string()));
    }

    #[test]
    fn test_traffic_fraction_out_of_range() {
        for fraction in [
            TrafficFraction::from(-0.01),
            TrafficFraction::from(1.5),
            TrafficFraction::from(2u32),
            TrafficFraction::from(f64::NAN),
            TrafficFraction::from("abc"),
            TrafficFraction::from(""),
            TrafficFraction::from("-1"),
        ] {
            assert!(
                matches!(
                    fraction.to_query_value(),
                    Err(Error::InvalidTrafficFraction(_))
                ),
                "{fraction} should be rejected"
            );
        }
    }

    #[test]
    fn test_participate_options_default() {
        let options = ParticipateOptions::default();
        assert_eq!(options.force, None);
        assert_eq!(options.traffic_fraction, TrafficFraction::Number(1.0));
        assert!(!options.prefetch);
    }

    #[test]
    fn test_response_keeps_unknown_fields() {
        let body = json!({
            "status": "ok",
            "alternative": {"name": "b"},
            "experiment": {"name": "button-color", "version": 0},
            "client_id": "1234"
        });
        let parsed: SixpackResponse = serde_json::from_value(body.clone()).unwrap();
        assert!(parsed.is_ok());
        assert_eq!(parsed.alternative_name(), Some("b"));
        assert_eq!(parsed.response(), None);
        assert_eq!(serde_json::to_value(&parsed).unwrap(), body);
    }

    #[test]
    fn test_response_keeps_unexpected_shapes() {
        for body in [
            json!({"status": "ok", "alternative": "b"}),
            json!({"status": "ok", "alternative": null}),
            json!({"status": "ok", "alternative": {"label": "b"}}),
            json!({"status": "ok", "response": {"detail": 1}}),
        ] {
            let parsed: SixpackResponse = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(parsed.alternative_name(), None);
            assert_eq!(serde_json::to_value(&parsed).unwrap(), body);
        }
    }

    #[test]
    fn test_response_other_status() {
        let parsed: SixpackResponse =
            serde_json::from_value(json!({"status": "pending"})).unwrap();
        assert_eq!(parsed.status, Status::Other("pending".to_string()));
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            json!({"status": "pending"})
        );
    }

    #[test]
    fn test_response_requires_status() {
        for body in [
            json!({"alternative": {"name": "a"}}),
            json!([1, 2]),
            json!({"status": 1}),
        ] {
            assert!(serde_json::from_value::<SixpackResponse>(body).is_err());
        }
    }

    #[test]
    fn test_default_alternative_only_on_failure() {
        let failed = SixpackResponse::failed("boom").with_default_alternative("a");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"status": "failed", "response": "boom", "alternative": {"name": "a"}})
        );

        let ok: SixpackResponse =
            serde_json::from_value(json!({"status": "ok", "alternative": "b"})).unwrap();
        assert_eq!(ok.clone().with_default_alternative("a"), ok);
    }

    #[test]
    fn test_default_alternative_replaces_server_alternative() {
        let failed: SixpackResponse = serde_json::from_value(
            json!({"status": "failed", "alternative": {"name": "c", "extra": true}, "message": "x"}),
        )
        .unwrap();
        let defaulted = failed.with_default_alternative("a");
        assert_eq!(
            serde_json::to_value(&defaulted).unwrap(),
            json!({"status": "failed", "alternative": {"name": "a"}, "message": "x"})
        );
    }
}
