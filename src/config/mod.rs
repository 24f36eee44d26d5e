pub mod cli;
pub mod dotenv;
pub mod toml_config;

pub use cli::CliConfig;
pub use dotenv::load_env_file;
pub use toml_config::TomlConfig;

use crate::adapters::openai::{DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::adapters::solana::Commitment;
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::{self, Validate};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3003;
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A string that never shows up in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub api_key: Secret,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SolanaConfig {
    pub rpc_url: String,
    pub pool_private_key: Option<Secret>,
    pub commitment: Commitment,
    pub request_timeout: Duration,
    pub confirm_timeout: Duration,
    pub poll_interval: Duration,
}

/// Fully resolved settings.
///
/// Priority order: CLI args > ENV vars > config file > defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// `None` runs verification in demo mode.
    pub verifier: Option<VerifierConfig>,
    pub solana: SolanaConfig,
    pub catalog_path: Option<String>,
}

impl AppConfig {
    /// Resolves against the process environment and the file named by `--config`.
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        Self::resolve(cli, file, |name| std::env::var(name).ok())
    }

    pub fn resolve<F>(cli: &CliConfig, file: TomlConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空字串視同未設定
        let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let host = cli
            .host
            .clone()
            .or_else(|| env("HOST"))
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let env_port = env("PORT")
            .map(|raw| {
                raw.trim()
                    .parse::<u16>()
                    .map_err(|e| MarketError::InvalidConfigValueError {
                        field: "PORT".to_string(),
                        value: raw.clone(),
                        reason: e.to_string(),
                    })
            })
            .transpose()?;
        let port = cli
            .port
            .or(env_port)
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        let verifier = env("OPENAI_API_KEY")
            .or(file.verifier.api_key)
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| VerifierConfig {
                api_key: Secret::new(api_key.trim()),
                api_base: env("OPENAI_API_BASE")
                    .or(file.verifier.api_base.clone())
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                model: env("OPENAI_MODEL")
                    .or(file.verifier.model.clone())
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens: file.verifier.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                timeout: Duration::from_secs(file.verifier.timeout_seconds.unwrap_or(60)),
            });

        let commitment = file
            .solana
            .commitment
            .as_deref()
            .unwrap_or("confirmed")
            .parse::<Commitment>()?;

        let solana = SolanaConfig {
            rpc_url: env("HELIUS_RPC")
                .or(file.solana.rpc_url)
                .unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            pool_private_key: env("POOL_PRIVATE_KEY")
                .or(file.solana.pool_private_key)
                .filter(|key| !key.trim().is_empty())
                .map(Secret::new),
            commitment,
            request_timeout: Duration::from_secs(file.solana.request_timeout_seconds.unwrap_or(30)),
            confirm_timeout: Duration::from_secs(file.solana.confirm_timeout_seconds.unwrap_or(60)),
            poll_interval: Duration::from_millis(file.solana.poll_interval_ms.unwrap_or(500)),
        };

        Ok(Self {
            host,
            port,
            max_upload_bytes: file
                .server
                .max_upload_bytes
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            verifier,
            solana,
            catalog_path: env("CATALOG_PATH").or(file.catalog.path),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Human-readable lines for `--check` and startup logs. Secrets are
    /// reported as configured / not configured only.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Listen address: {}", self.bind_address()),
            format!("Upload limit: {} bytes", self.max_upload_bytes),
            format!(
                "Catalog: {}",
                self.catalog_path.as_deref().unwrap_or("built-in")
            ),
        ];
        match &self.verifier {
            Some(v) => lines.push(format!(
                "Verifier: {} via {} (max_tokens {})",
                v.model, v.api_base, v.max_tokens
            )),
            None => lines.push("Verifier: not configured (demo mode)".to_string()),
        }
        lines.push(format!(
            "Solana RPC: {} (commitment {})",
            self.solana.rpc_url,
            self.solana.commitment.as_str()
        ));
        lines.push(format!(
            "Pool wallet: {}",
            if self.solana.pool_private_key.is_some() {
                "configured"
            } else {
                "not configured (payments disabled)"
            }
        ));
        lines
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_positive_number("server.port", self.port as u64, 1)?;
        validation::validate_positive_number(
            "server.max_upload_bytes",
            self.max_upload_bytes as u64,
            1024,
        )?;

        if let Some(verifier) = &self.verifier {
            validation::validate_url("verifier.api_base", &verifier.api_base)?;
            validation::validate_non_empty_string("verifier.model", &verifier.model)?;
            validation::validate_range("verifier.max_tokens", verifier.max_tokens, 1, 4096)?;
            validation::validate_positive_number(
                "verifier.timeout_seconds",
                verifier.timeout.as_secs(),
                1,
            )?;
        }

        validation::validate_url("solana.rpc_url", &self.solana.rpc_url)?;
        validation::validate_positive_number(
            "solana.request_timeout_seconds",
            self.solana.request_timeout.as_secs(),
            1,
        )?;
        validation::validate_positive_number(
            "solana.confirm_timeout_seconds",
            self.solana.confirm_timeout.as_secs(),
            1,
        )?;
        validation::validate_positive_number(
            "solana.poll_interval_ms",
            self.solana.poll_interval.as_millis() as u64,
            1,
        )?;

        if let Some(path) = &self.catalog_path {
            validation::validate_non_empty_string("catalog.path", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env_or_file() {
        let config =
            AppConfig::resolve(&CliConfig::default(), TomlConfig::default(), env_of(&[])).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3003");
        assert!(config.verifier.is_none());
        assert!(config.solana.pool_private_key.is_none());
        assert_eq!(config.solana.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.solana.commitment, Commitment::Confirmed);
        assert_eq!(config.solana.request_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let mut file = TomlConfig::default();
        file.server.port = Some(4000);
        file.server.host = Some("10.0.0.1".to_string());
        file.solana.rpc_url = Some("https://file.example".to_string());

        let env = env_of(&[("PORT", "5000"), ("HELIUS_RPC", "https://env.example")]);
        let cli = CliConfig {
            port: Some(6000),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, file, env).unwrap();
        assert_eq!(config.port, 6000);
        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.solana.rpc_url, "https://env.example");
    }

    #[test]
    fn test_empty_env_values_count_as_unset() {
        let env = env_of(&[("OPENAI_API_KEY", ""), ("POOL_PRIVATE_KEY", "  ")]);
        let config = AppConfig::resolve(&CliConfig::default(), TomlConfig::default(), env).unwrap();

        assert!(config.verifier.is_none());
        assert!(config.solana.pool_private_key.is_none());
    }

    #[test]
    fn test_verifier_enabled_by_api_key() {
        let env = env_of(&[("OPENAI_API_KEY", "sk-live"), ("OPENAI_MODEL", "gpt-4o-mini")]);
        let config = AppConfig::resolve(&CliConfig::default(), TomlConfig::default(), env).unwrap();

        let verifier = config.verifier.as_ref().unwrap();
        assert_eq!(verifier.api_key.expose(), "sk-live");
        assert_eq!(verifier.model, "gpt-4o-mini");
        assert_eq!(verifier.api_base, DEFAULT_API_BASE);
        assert!(!format!("{:?}", config).contains("sk-live"));
    }

    #[test]
    fn test_bad_port_and_commitment_are_rejected() {
        let env = env_of(&[("PORT", "http")]);
        assert!(AppConfig::resolve(&CliConfig::default(), TomlConfig::default(), env).is_err());

        let mut file = TomlConfig::default();
        file.solana.commitment = Some("max".to_string());
        assert!(AppConfig::resolve(&CliConfig::default(), file, env_of(&[])).is_err());
    }

    #[test]
    fn test_zero_rpc_request_timeout_is_rejected() {
        let mut file = TomlConfig::default();
        file.solana.request_timeout_seconds = Some(0);
        let config = AppConfig::resolve(&CliConfig::default(), file, env_of(&[])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_rpc_url() {
        let mut file = TomlConfig::default();
        file.solana.rpc_url = Some("wss://api.mainnet-beta.solana.com".to_string());
        let config = AppConfig::resolve(&CliConfig::default(), file, env_of(&[])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_hides_secrets() {
        let env = env_of(&[("OPENAI_API_KEY", "sk-live"), ("POOL_PRIVATE_KEY", "[1,2,3]")]);
        let config = AppConfig::resolve(&CliConfig::default(), TomlConfig::default(), env).unwrap();
        let summary = config.summary().join("\n");

        assert!(summary.contains("Pool wallet: configured"));
        assert!(!summary.contains("sk-live"));
        assert!(!summary.contains("[1,2,3]"));
    }
}
