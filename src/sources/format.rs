//! Translation from file bytes to a typed configuration document.
//!
//! Every format is first converted into a canonical `serde_json::Value` and
//! then deserialized into the target type. Unknown fields are dropped during
//! the second step, so newer configuration files keep loading on older
//! gateways.

use crate::error::{ConfigError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// YAML (`.yaml`, `.yml`). Requires the `yaml` feature.
    #[default]
    Yaml,
    /// JSON (`.json`).
    Json,
    /// TOML (`.toml`). Requires the `toml` feature.
    Toml,
}

impl Format {
    /// Detect the format from a file extension.
    ///
    /// - `.yaml`, `.yml` -> YAML
    /// - `.json` -> JSON
    /// - `.toml` -> TOML
    ///
    /// Any other or missing extension is treated as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    /// Short lowercase name of the format.
    pub fn name(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Convert raw file content into the canonical intermediate form.
    ///
    /// Empty input, and input holding no document at all (only comments, or a
    /// bare `null`), becomes an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FormatError`] if `raw` is not well-formed in this
    /// format, or [`ConfigError::FeatureNotEnabled`] if the format was compiled out.
    pub fn to_canonical(self, raw: &[u8]) -> Result<Value> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        let value = match self {
            Self::Yaml => yaml_to_canonical(raw)?,
            Self::Json => serde_json::from_slice(raw).map_err(|e| ConfigError::format("json", e))?,
            Self::Toml => toml_to_canonical(raw)?,
        };

        match value {
            Value::Null => Ok(Value::Object(serde_json::Map::new())),
            value => Ok(value),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "yaml")]
fn yaml_to_canonical(raw: &[u8]) -> Result<Value> {
    let mut value: serde_yaml::Value =
        serde_yaml::from_slice(raw).map_err(|e| ConfigError::format("yaml", e))?;
    // `<<: *anchor` merge keys are left as literal keys until applied.
    value
        .apply_merge()
        .map_err(|e| ConfigError::format("yaml", e))?;
    serde_json::to_value(value).map_err(|e| ConfigError::format("yaml", e))
}

#[cfg(not(feature = "yaml"))]
fn yaml_to_canonical(_raw: &[u8]) -> Result<Value> {
    Err(ConfigError::FeatureNotEnabled("yaml"))
}

#[cfg(feature = "toml")]
fn toml_to_canonical(raw: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(raw).map_err(|e| ConfigError::format("toml", e))?;
    let table: toml::Table = toml::from_str(text).map_err(|e| ConfigError::format("toml", e))?;
    serde_json::to_value(table).map_err(|e| ConfigError::format("toml", e))
}

#[cfg(not(feature = "toml"))]
fn toml_to_canonical(_raw: &[u8]) -> Result<Value> {
    Err(ConfigError::FeatureNotEnabled("toml"))
}

/// Deserialize the canonical form into the target configuration type.
///
/// Fields the target type does not know about are ignored.
///
/// # Errors
///
/// Returns [`ConfigError::SchemaError`] if the value cannot populate `T`.
pub fn from_canonical<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| ConfigError::SchemaError(e.to_string()))
}

/// Translate raw file content into a configuration document.
///
/// # Examples
///
/// ```rust
/// use gateway_config::sources::{Format, translate};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Doc {
///     a: i64,
/// }
///
/// let doc: Doc = translate(Format::Json, br#"{"a": 1, "extra": true}"#).unwrap();
/// assert_eq!(doc.a, 1);
/// ```
pub fn translate<T>(format: Format, raw: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_canonical(format.to_canonical(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Doc {
        a: i64,
        #[serde(default)]
        name: Option<String>,
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Format::from_path("config.yaml"), Format::Yaml);
        assert_eq!(Format::from_path("config.yml"), Format::Yaml);
        assert_eq!(Format::from_path("config.JSON"), Format::Json);
        assert_eq!(Format::from_path("config.toml"), Format::Toml);
        assert_eq!(Format::from_path("gateway.conf"), Format::Yaml);
        assert_eq!(Format::from_path("gateway"), Format::Yaml);
    }

    #[test]
    fn test_json_translate() {
        let doc: Doc = translate(Format::Json, br#"{"a": 2, "name": "edge"}"#).unwrap();
        assert_eq!(
            doc,
            Doc {
                a: 2,
                name: Some("edge".to_string())
            }
        );
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let doc: Doc = translate(Format::Json, br#"{"a": 1, "extra": true}"#).unwrap();
        assert_eq!(doc.a, 1);
    }

    #[test]
    fn test_malformed_json_is_format_error() {
        let err = translate::<Doc>(Format::Json, b"{\"a\": ").unwrap_err();
        assert!(matches!(err, ConfigError::FormatError { format: "json", .. }));
    }

    #[test]
    fn test_type_mismatch_is_schema_error() {
        let err = translate::<Doc>(Format::Json, br#"{"a": "one"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaError(_)));
    }

    #[test]
    fn test_missing_required_field_is_schema_error() {
        let err = translate::<Doc>(Format::Json, br#"{"name": "edge"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaError(_)));
    }

    #[test]
    fn test_empty_input_is_empty_mapping() {
        let value = Format::Json.to_canonical(b"  \n").unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_translate() {
        let doc: Doc = translate(Format::Yaml, b"a: 1\nextra: true\n").unwrap();
        assert_eq!(doc, Doc { a: 1, name: None });
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_flow_mapping() {
        let doc: Doc = translate(Format::Yaml, b"{a: 2}").unwrap();
        assert_eq!(doc.a, 2);
    }

    #[test]
    fn test_json_null_is_empty_mapping() {
        let value = Format::Json.to_canonical(b"null").unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_without_document_is_empty_mapping() {
        let documents: [&[u8]; 3] = [b"# gateway config, filled in later\n", b"---\n", b"~\n"];
        for raw in documents {
            let value = Format::Yaml.to_canonical(raw).unwrap();
            assert_eq!(value, serde_json::json!({}));
        }
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_merge_keys_are_resolved() {
        let raw = b"defaults: &defaults\n  method: GET\n  timeout: 1s\nendpoints:\n  - <<: *defaults\n    path: /a\n  - <<: *defaults\n    path: /b\n    method: POST\n";
        let value = Format::Yaml.to_canonical(raw).unwrap();
        assert_eq!(
            value["endpoints"],
            serde_json::json!([
                {"method": "GET", "timeout": "1s", "path": "/a"},
                {"method": "POST", "timeout": "1s", "path": "/b"}
            ])
        );
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_merge_of_scalar_is_format_error() {
        let err = Format::Yaml.to_canonical(b"a:\n  <<: 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::FormatError { format: "yaml", .. }));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_malformed_yaml_is_format_error() {
        let err = translate::<Doc>(Format::Yaml, b"a: [1, 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::FormatError { format: "yaml", .. }));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_translate() {
        let doc: Doc = translate(Format::Toml, b"a = 3\nname = \"edge\"\n").unwrap();
        assert_eq!(doc.a, 3);
        assert_eq!(doc.name.as_deref(), Some("edge"));
    }

    #[cfg(not(feature = "toml"))]
    #[test]
    fn test_toml_without_feature() {
        let err = translate::<Doc>(Format::Toml, b"a = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::FeatureNotEnabled("toml")));
    }
}
