//! penmark configuration and proofer factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use penmark_core::error::ProofError;
use penmark_core::model::ProofLanguage;
use penmark_core::traits::Proofer;

use crate::languagetool::{parse_language, LanguageToolProofer, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Remote proofing settings.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProofingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Premium account name; only sent together with `api_key`.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProofingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofingConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_true() -> bool {
    true
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ProofingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            username: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Top-level penmark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenmarkConfig {
    /// Language variant sent to the proofing service (e.g. "en-GB").
    #[serde(default = "default_language")]
    pub language: String,
    /// Max concurrent assessments in a batch.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Catalog file or directory used instead of the built-in tasks.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Word list for unknown-word detection.
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
    #[serde(default)]
    pub proofing: ProofingConfig,
}

fn default_language() -> String {
    ProofLanguage::default().code().to_string()
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./penmark-results")
}

impl Default for PenmarkConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
            catalog: None,
            dictionary: None,
            proofing: ProofingConfig::default(),
        }
    }
}

impl PenmarkConfig {
    /// The configured language, failing fast on unsupported codes.
    pub fn language(&self) -> Result<ProofLanguage, ProofError> {
        parse_language(&self.language)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Apply `PENMARK_*` overrides using `lookup` to read variables.
fn apply_env_overrides(config: &mut PenmarkConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(endpoint) = lookup("PENMARK_PROOF_ENDPOINT") {
        config.proofing.endpoint = endpoint;
    }
    if let Some(key) = lookup("PENMARK_PROOF_API_KEY") {
        config.proofing.api_key = Some(key);
    }
    if let Some(language) = lookup("PENMARK_LANGUAGE") {
        config.language = language;
    }
}

fn resolve_proofing_config(config: &ProofingConfig) -> ProofingConfig {
    ProofingConfig {
        endpoint: resolve_env_vars(&config.endpoint),
        username: config.username.as_ref().map(|u| resolve_env_vars(u)),
        api_key: config
            .api_key
            .as_ref()
            .map(|k| resolve_env_vars(k))
            .filter(|k| !k.is_empty()),
        ..config.clone()
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `penmark.toml` in the current directory
/// 2. `~/.config/penmark/config.toml`
///
/// Environment variable overrides: `PENMARK_PROOF_ENDPOINT`,
/// `PENMARK_PROOF_API_KEY`, `PENMARK_LANGUAGE`.
pub fn load_config() -> Result<PenmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PenmarkConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("penmark.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<PenmarkConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PenmarkConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config.proofing = resolve_proofing_config(&config.proofing);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("penmark"))
}

/// Create a proofer from its configuration, or `None` when proofing is disabled.
pub fn create_proofer(config: &ProofingConfig) -> Result<Option<Arc<dyn Proofer>>, ProofError> {
    if !config.enabled {
        return Ok(None);
    }
    let mut proofer =
        LanguageToolProofer::new(Some(&config.endpoint))?.with_timeout(config.timeout_secs);
    if let (Some(username), Some(api_key)) = (&config.username, &config.api_key) {
        proofer = proofer.with_credentials(username, api_key);
    }
    Ok(Some(Arc::new(proofer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_PENMARK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_PENMARK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_PENMARK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no refs"), "no refs");
        assert_eq!(resolve_env_vars("${UNCLOSED"), "${UNCLOSED");
        std::env::remove_var("_PENMARK_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = PenmarkConfig::default();
        assert_eq!(config.language, "en-GB");
        assert_eq!(config.parallelism, 4);
        assert!(config.proofing.enabled);
        assert_eq!(config.proofing.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
language = "en-US"
parallelism = 2
dictionary = "words.txt"

[proofing]
endpoint = "http://localhost:8081/v2/check"
username = "me@example.com"
api_key = "secret"
timeout_secs = 5
"#;
        let config: PenmarkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.language().unwrap(), ProofLanguage::EnUs);
        assert_eq!(config.parallelism, 2);
        assert_eq!(config.dictionary, Some(PathBuf::from("words.txt")));
        assert_eq!(config.proofing.timeout_secs, 5);
        assert!(create_proofer(&config.proofing).unwrap().is_some());
    }

    #[test]
    fn env_overrides_win() {
        let vars: HashMap<&str, &str> = [
            ("PENMARK_PROOF_ENDPOINT", "http://lt.internal/v2/check"),
            ("PENMARK_PROOF_API_KEY", "from-env"),
            ("PENMARK_LANGUAGE", "en-AU"),
        ]
        .into_iter()
        .collect();
        let mut config = PenmarkConfig::default();
        apply_env_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.proofing.endpoint, "http://lt.internal/v2/check");
        assert_eq!(config.proofing.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.language().unwrap(), ProofLanguage::EnAu);
    }

    #[test]
    fn empty_resolved_key_is_dropped() {
        let proofing = ProofingConfig {
            api_key: Some("${_PENMARK_UNSET_VAR_FOR_TEST}".into()),
            ..ProofingConfig::default()
        };
        assert!(resolve_proofing_config(&proofing).api_key.is_none());
    }

    #[test]
    fn debug_masks_api_key() {
        let proofing = ProofingConfig {
            api_key: Some("sk-very-secret".into()),
            ..ProofingConfig::default()
        };
        let dbg = format!("{proofing:?}");
        assert!(!dbg.contains("sk-very-secret"));
        assert!(dbg.contains("***"));
    }

    #[test]
    fn unsupported_language_fails_fast() {
        let config = PenmarkConfig {
            language: "fr-FR".into(),
            ..PenmarkConfig::default()
        };
        assert!(config.language().unwrap_err().is_configuration());
    }

    #[test]
    fn disabled_or_invalid_proofing() {
        let disabled = ProofingConfig {
            enabled: false,
            ..ProofingConfig::default()
        };
        assert!(create_proofer(&disabled).unwrap().is_none());

        let invalid = ProofingConfig {
            endpoint: "localhost:8081".into(),
            ..ProofingConfig::default()
        };
        let err = create_proofer(&invalid).err().unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("penmark.toml");
        std::fs::write(&path, "parallelism = 8\n[proofing]\nenabled = false\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.parallelism, 8);
        assert!(!config.proofing.enabled);

        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
