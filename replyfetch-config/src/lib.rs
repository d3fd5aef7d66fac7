//! Loader for the reply endpoint configuration with file + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. files attached with [`EndpointConfigLoader::with_file`] or inline YAML
//! 2. `TWITTER_`-prefixed environment variables (`TWITTER_API_URL`,
//!    `TWITTER_API_KEY`, `TWITTER_TIMEOUT_SECS`, `TWITTER_OUTPUT_DIR`)
//!
//! Missing values are not an error: the url and key default to empty strings
//! and requests made with them fail at the transport layer.
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "TWITTER";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the replies endpoint. Immutable once loaded.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointConfig {
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(
        default = "default_timeout_secs",
        deserialize_with = "deserialize_secs"
    )]
    pub timeout_secs: u64,
    /// Directory for auto-named output files; the working directory when unset.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl EndpointConfig {
    /// ```
    /// use replyfetch_config::EndpointConfig;
    /// use std::time::Duration;
    ///
    /// let cfg = EndpointConfig::new("https://api.example.com/replies", "key");
    /// assert_eq!(cfg.timeout(), Duration::from_secs(10));
    /// assert!(cfg.output_dir.is_none());
    /// ```
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("EndpointConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &key)
            .field("timeout_secs", &self.timeout_secs)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// Environment values always arrive as strings.
fn deserialize_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Secs {
        Num(u64),
        Text(String),
    }

    match Secs::deserialize(deserializer)? {
        Secs::Num(n) => Ok(n),
        Secs::Text(s) => s
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid timeout_secs {s:?}: {e}"))),
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (files + env overrides).
pub struct EndpointConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for EndpointConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file) but silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use replyfetch_config::EndpointConfigLoader;
    ///
    /// let cfg = EndpointConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// api_url: "https://api.example.com/replies"
    /// api_key: "example"
    /// timeout_secs: 3
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.timeout_secs, 3);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into [`EndpointConfig`].
    ///
    /// `${VAR}` placeholders in any string value are expanded before the typed
    /// struct is built.
    pub fn load(self) -> Result<EndpointConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("RF_KEY", Some("bar"), || {
            let mut v = json!("prefix-${RF_KEY}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("RF_HOST", Some("api.example.com")),
                ("RF_URL", Some("https://${RF_HOST}/replies")),
            ],
            || {
                let mut v = json!({ "api_url": "${RF_URL}" });
                expand_env_in_value(&mut v);
                assert_eq!(v, json!({ "api_url": "https://api.example.com/replies" }));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("RF_A", Some("${RF_B}")), ("RF_B", Some("${RF_A}"))], || {
            let mut v = json!("x=${RF_A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${RF_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${RF_DOES_NOT_EXIST}"));
    }

    #[test]
    fn timeout_accepts_numeric_strings() {
        let cfg: EndpointConfig =
            serde_json::from_value(json!({ "timeout_secs": " 7 " })).unwrap();
        assert_eq!(cfg.timeout_secs, 7);

        let err = serde_json::from_value::<EndpointConfig>(json!({ "timeout_secs": "soon" }))
            .unwrap_err();
        assert!(err.to_string().contains("invalid timeout_secs"));
    }

    #[test]
    fn debug_output_hides_key() {
        let cfg = EndpointConfig::new("https://api.example.com", "super-secret");
        let shown = format!("{cfg:?}");
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn empty_object_gives_empty_credentials() {
        let cfg: EndpointConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg, EndpointConfig::new("", ""));
    }
}
