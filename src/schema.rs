//! The gateway configuration document.
//!
//! Every field has a default, and unknown fields are ignored so that newer
//! configuration files still load on older gateways. Multi-word fields accept
//! both camelCase and snake_case keys.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway instance name.
    pub name: String,
    /// Hostnames the gateway answers for.
    pub hosts: Vec<String>,
    /// Middlewares applied to every endpoint.
    pub middlewares: Vec<Middleware>,
    /// Routed endpoints.
    pub endpoints: Vec<Endpoint>,
}

impl GatewayConfig {
    /// Find the endpoint serving `path` and `method`.
    ///
    /// An endpoint without a method matches any method.
    pub fn endpoint(&self, path: &str, method: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| {
            e.path == path && (e.method.is_empty() || e.method.eq_ignore_ascii_case(method))
        })
    }
}

/// A middleware reference with free-form options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Middleware {
    /// Registered middleware name, e.g. `cors` or `logging`.
    pub name: String,
    /// Options passed to the middleware factory untouched.
    pub options: serde_json::Value,
}

/// Wire protocol spoken towards backends.
///
/// Names this version does not know load as [`Protocol::Unspecified`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// Plain HTTP/1.1 or HTTP/2.
    Http,
    /// gRPC over HTTP/2.
    Grpc,
    /// Not set or not recognised; the gateway picks its default.
    #[default]
    #[serde(other)]
    Unspecified,
}

/// A routed endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    /// Request path, e.g. `/helloworld/*`.
    pub path: String,
    /// HTTP method; empty matches any.
    pub method: String,
    /// Free-form description.
    pub description: String,
    /// Backend protocol.
    pub protocol: Protocol,
    /// Overall request timeout.
    #[serde(deserialize_with = "duration::deserialize", serialize_with = "duration::serialize")]
    pub timeout: Option<Duration>,
    /// Host restriction for this endpoint.
    pub host: String,
    /// Arbitrary key/value metadata.
    pub metadata: BTreeMap<String, String>,
    /// Middlewares applied to this endpoint only.
    pub middlewares: Vec<Middleware>,
    /// Upstream backends.
    pub backends: Vec<Backend>,
    /// Retry policy.
    pub retry: Option<Retry>,
}

/// An upstream backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backend {
    /// Target address, e.g. `127.0.0.1:8000` or `discovery:///service`.
    pub target: String,
    /// Load balancing weight.
    pub weight: Option<i64>,
}

/// Retry policy for an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Retry {
    /// Maximum number of attempts, including the first.
    pub attempts: u32,
    /// Timeout applied to each attempt.
    #[serde(
        alias = "per_try_timeout",
        deserialize_with = "duration::deserialize",
        serialize_with = "duration::serialize"
    )]
    pub per_try_timeout: Option<Duration>,
    /// Conditions under which a request is retried.
    pub conditions: Vec<RetryCondition>,
}

/// A retry trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryCondition {
    /// Status codes or ranges, e.g. `500-504`.
    #[serde(alias = "by_status_code")]
    pub by_status_code: Option<String>,
    /// Header that must be present, with its expected value.
    #[serde(alias = "by_header")]
    pub by_header: Option<HeaderCondition>,
}

/// Header match used by [`RetryCondition`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderCondition {
    /// Header name.
    pub name: String,
    /// Expected header value.
    pub value: String,
}

/// Durations written as `"<seconds>s"`, e.g. `"1s"` or `"0.5s"`.
mod duration {
    use super::*;
    use serde::Serializer;
    use serde::de::Error;

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(&text).map(Some).map_err(D::Error::custom)
    }

    pub(super) fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&format!("{}s", d.as_secs_f64())),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn parse(text: &str) -> Result<Duration, String> {
        let seconds = text
            .trim()
            .strip_suffix('s')
            .ok_or_else(|| format!("invalid duration {:?}: missing 's' suffix", text))?;
        let seconds: f64 = seconds
            .parse()
            .map_err(|_| format!("invalid duration {:?}", text))?;
        Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid duration {:?}: {}", text, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{Format, translate};

    #[test]
    fn test_parse_duration() {
        assert_eq!(duration::parse("1s"), Ok(Duration::from_secs(1)));
        assert_eq!(duration::parse("0.5s"), Ok(Duration::from_millis(500)));
        assert!(duration::parse("5").is_err());
        assert!(duration::parse("-1s").is_err());
        assert!(duration::parse("abcs").is_err());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: GatewayConfig = translate(Format::Json, b"").unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_full_document() {
        let config: GatewayConfig = translate(
            Format::Json,
            br#"{
                "name": "edge",
                "hosts": ["api.example.com"],
                "middlewares": [{"name": "logging"}],
                "endpoints": [{
                    "path": "/helloworld/*",
                    "method": "GET",
                    "protocol": "GRPC",
                    "timeout": "1s",
                    "metadata": {"team": "core"},
                    "backends": [{"target": "127.0.0.1:9000", "weight": 10}],
                    "retry": {
                        "attempts": 3,
                        "perTryTimeout": "0.5s",
                        "conditions": [{"byStatusCode": "502-504"}]
                    }
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "edge");
        let endpoint = config.endpoint("/helloworld/*", "get").unwrap();
        assert_eq!(endpoint.protocol, Protocol::Grpc);
        assert_eq!(endpoint.timeout, Some(Duration::from_secs(1)));
        assert_eq!(endpoint.metadata["team"], "core");
        assert_eq!(endpoint.backends[0].weight, Some(10));

        let retry = endpoint.retry.as_ref().unwrap();
        assert_eq!(retry.attempts, 3);
        assert_eq!(retry.per_try_timeout, Some(Duration::from_millis(500)));
        assert_eq!(
            retry.conditions[0].by_status_code.as_deref(),
            Some("502-504")
        );
    }

    #[test]
    fn test_snake_case_aliases() {
        let config: GatewayConfig = translate(
            Format::Json,
            br#"{"endpoints": [{"path": "/a", "retry": {"per_try_timeout": "2s", "conditions": [{"by_header": {"name": "x-retry", "value": "1"}}]}}]}"#,
        )
        .unwrap();

        let retry = config.endpoints[0].retry.as_ref().unwrap();
        assert_eq!(retry.per_try_timeout, Some(Duration::from_secs(2)));
        assert_eq!(
            retry.conditions[0].by_header.as_ref().unwrap().name,
            "x-retry"
        );
    }

    #[test]
    fn test_endpoint_without_method_matches_any() {
        let config = GatewayConfig {
            endpoints: vec![Endpoint {
                path: "/any".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(config.endpoint("/any", "POST").is_some());
        assert!(config.endpoint("/other", "POST").is_none());
    }

    #[test]
    fn test_unknown_protocol_is_unspecified() {
        let config: GatewayConfig = translate(
            Format::Json,
            br#"{"endpoints": [{"path": "/ws", "protocol": "WEBSOCKET"}, {"path": "/rpc", "protocol": "GRPC"}]}"#,
        )
        .unwrap();
        assert_eq!(config.endpoints[0].protocol, Protocol::Unspecified);
        assert_eq!(config.endpoints[1].protocol, Protocol::Grpc);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_merged_endpoint_defaults() {
        let config: GatewayConfig = translate(
            Format::Yaml,
            b"defaults: &defaults\n  method: GET\n  timeout: 1s\nendpoints:\n  - <<: *defaults\n    path: /a\n",
        )
        .unwrap();
        let endpoint = config.endpoint("/a", "GET").unwrap();
        assert_eq!(endpoint.method, "GET");
        assert_eq!(endpoint.timeout, Some(Duration::from_secs(1)));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_comment_only_yaml_is_default() {
        let config: GatewayConfig =
            translate(Format::Yaml, b"# endpoints are added by the deploy job\n").unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_bad_duration_is_schema_error() {
        let err = translate::<GatewayConfig>(
            Format::Json,
            br#"{"endpoints": [{"timeout": "soon"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::ConfigError::SchemaError(_)));
    }
}
