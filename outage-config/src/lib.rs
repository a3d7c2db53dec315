//! Loader for batch configuration with YAML + environment overlays.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults ([`DEFAULTS_YAML`]): the utility and internet company lists
//! 2. an optional YAML/TOML/JSON file (`outage.yaml` for the binary)
//! 3. `OUTAGE_`-prefixed environment variables, `__` between nested keys
//!    (`OUTAGE_TWITTER__MAX_RESULTS=50`)
//!
//! Every string value then goes through `${VAR}` expansion, which is how the
//! bearer credential reaches the process: the default `twitter.bearer_token` is
//! `${TWITTER_BEARER_TOKEN}`.
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Built-in defaults, merged underneath every other source.
pub const DEFAULTS_YAML: &str = r##"
twitter:
  bearer_token: "${TWITTER_BEARER_TOKEN}"
  api_base: "https://api.twitter.com"
  max_results: 100
  timeout_secs: 15
output:
  directory: "."
  audit_dir: "json_files"
  write_audit: true
  timezone: "America/New_York"
pipeline:
  on_fetch_error: "skip"
  prune_orphan_annotations: false
groups:
  - name: "utility"
    filter: "power OR out OR #outage"
    handles:
      - "TorontoHydro"
      - "HydroOne"
      - "OakvilleHydro"
      - "LondonHydro"
      - "hydroottawa"
      - "burlingtonHydro"
      - "GuelphHydro"
      - "Festival_Hydro"
  - name: "internet"
    filter: "disconnect OR wifi OR internet down OR wifi down"
    handles:
      - "RogersHelps"
      - "Bell_Support"
      - "FidoSolutions"
      - "VMCcare"
"##;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bearer token is empty or still holds an unexpanded `${VAR}`.
    #[error("missing Twitter bearer token (set TWITTER_BEARER_TOKEN or twitter.bearer_token)")]
    MissingCredential,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutageConfig {
    pub twitter: TwitterConfig,
    pub output: OutputConfig,
    pub pipeline: PipelineConfig,
    pub groups: Vec<CompanyGroupConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterConfig {
    pub bearer_token: String,
    pub api_base: String,
    pub max_results: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub audit_dir: PathBuf,
    pub write_audit: bool,
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub on_fetch_error: FetchErrorPolicy,
    pub prune_orphan_annotations: bool,
}

/// What the batch does when one company's fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// Log the failure and move on to the next company.
    Skip,
    /// Stop the whole run.
    Abort,
}

/// Companies sharing one keyword filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyGroupConfig {
    pub name: String,
    pub filter: String,
    pub handles: Vec<String>,
}

impl OutageConfig {
    /// Bearer token, rejected when it never resolved to a real value.
    pub fn bearer_token(&self) -> Result<&str, LoadError> {
        let token = self.twitter.bearer_token.trim();
        if token.is_empty() || token.contains("${") || token.starts_with('$') {
            return Err(LoadError::MissingCredential);
        }
        Ok(token)
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

/// Builder hides the `config` crate wiring (defaults + files + env overrides).
pub struct OutageConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: &'static str,
}

impl Default for OutageConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl OutageConfigLoader {
    /// Start from the built-in defaults.
    ///
    /// ```
    /// use outage_config::OutageConfigLoader;
    ///
    /// let config = OutageConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config.groups.len(), 2);
    /// assert_eq!(config.groups[0].handles.len(), 8);
    /// assert_eq!(config.groups[1].handles.len(), 4);
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(File::from_str(DEFAULTS_YAML, FileFormat::Yaml));
        Self {
            builder,
            env_prefix: "OUTAGE",
        }
    }

    /// Attach a required YAML/TOML/JSON file; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only when it exists.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests to merge inline YAML snippets.
    ///
    /// ```
    /// use outage_config::{FetchErrorPolicy, OutageConfigLoader};
    ///
    /// let cfg = OutageConfigLoader::new()
    ///     .with_yaml_str("pipeline:\n  on_fetch_error: abort\n")
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.pipeline.on_fetch_error, FetchErrorPolicy::Abort);
    /// assert!(!cfg.pipeline.prune_orphan_annotations);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// Environment overrides are layered last, then `${VAR}` placeholders are
    /// expanded before materialising strongly typed structs.
    pub fn load(self) -> Result<OutageConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
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
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Toronto")), ("PROV", Some("ON"))], || {
            let mut v = json!(["hello-$CITY", { "loc": "${CITY}-${PROV}" }, 42, true, null]);
            expand_env_in_value(&mut v);
            assert_eq!(v, json!(["hello-Toronto", { "loc": "Toronto-ON" }, 42, true, null]));
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unresolved_token_is_missing_credential() {
        let cfg = OutageConfigLoader::new()
            .with_yaml_str("twitter:\n  bearer_token: \"${OUTAGE_TEST_UNSET_TOKEN}\"\n")
            .load()
            .unwrap();
        assert!(matches!(cfg.bearer_token(), Err(LoadError::MissingCredential)));
    }

    #[test]
    fn empty_token_is_missing_credential() {
        let cfg = OutageConfigLoader::new()
            .with_yaml_str("twitter:\n  bearer_token: \"  \"\n")
            .load()
            .unwrap();
        assert!(matches!(cfg.bearer_token(), Err(LoadError::MissingCredential)));
    }
}
