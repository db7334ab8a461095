//! Network and record configuration, read once at startup.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::commitment::Commitment;
use crate::keypair::RecordKeypair;
use crate::keypair::SharedRecordRef;
use crate::pubkey::Pubkey;
use crate::ApiError;

/// The configuration bundled into the build.
const EMBEDDED_CONFIG: &str = include_str!("../../config/portal.json");

const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 30;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(String),
    #[error("invalid record keypair: {0}")]
    Keypair(String),
    #[error("unknown commitment level: {0}")]
    Commitment(String),
}

/// The ledger cluster to talk to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    /// Any other JSON-RPC endpoint.
    Custom(String),
}

impl Cluster {
    pub fn url(&self) -> &str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
            Self::Custom(url) => url,
        }
    }
}

impl FromStr for Cluster {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let cluster = match trimmed.to_ascii_lowercase().as_str() {
            "devnet" => Self::Devnet,
            "testnet" => Self::Testnet,
            "mainnet" | "mainnet-beta" => Self::MainnetBeta,
            "localnet" | "localhost" => Self::Localnet,
            lower if lower.starts_with("http://") || lower.starts_with("https://") => {
                Self::Custom(trimmed.to_string())
            }
            _ => return Err(ConfigError::Parse(format!("unknown cluster `{s}`"))),
        };
        Ok(cluster)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Devnet => f.write_str("devnet"),
            Self::Testnet => f.write_str("testnet"),
            Self::MainnetBeta => f.write_str("mainnet-beta"),
            Self::Localnet => f.write_str("localnet"),
            Self::Custom(url) => f.write_str(url),
        }
    }
}

impl<'de> Deserialize<'de> for Cluster {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything needed to reach the ledger, independent of who is signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub cluster: Cluster,
    pub commitment: Commitment,
    pub program_id: Pubkey,
    pub confirm_timeout: Duration,
}

impl NetworkConfig {
    pub fn endpoint_url(&self) -> &str {
        self.cluster.url()
    }
}

/// Full startup configuration: the network plus the shared record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub network: NetworkConfig,
    pub record: SharedRecordRef,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    cluster: Cluster,
    #[serde(default)]
    commitment: Commitment,
    program_id: Pubkey,
    record_keypair: Vec<u8>,
    #[serde(default = "default_confirm_timeout_secs")]
    confirm_timeout_secs: u64,
}

fn default_confirm_timeout_secs() -> u64 {
    DEFAULT_CONFIRM_TIMEOUT_SECS
}

impl PortalConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let keypair = RecordKeypair::from_bytes(&raw.record_keypair)?;

        Ok(Self {
            network: NetworkConfig {
                cluster: raw.cluster,
                commitment: raw.commitment,
                program_id: raw.program_id,
                confirm_timeout: Duration::from_secs(raw.confirm_timeout_secs.max(1)),
            },
            record: SharedRecordRef::new(keypair),
        })
    }

    /// Applies overrides, e.g. from build-time environment variables.
    pub fn with_overrides(
        mut self,
        cluster: Option<&str>,
        commitment: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(cluster) = cluster.filter(|s| !s.is_empty()) {
            self.network.cluster = cluster.parse()?;
        }
        if let Some(commitment) = commitment.filter(|s| !s.is_empty()) {
            self.network.commitment = commitment
                .parse()
                .map_err(|_| ConfigError::Commitment(commitment.to_string()))?;
        }
        Ok(self)
    }

    /// Loads the configuration compiled into the binary.
    ///
    /// # Build-time environment variables
    /// - `PORTAL_CLUSTER`: a named cluster (`devnet`, `testnet`,
    ///   `mainnet-beta`, `localnet`) or an RPC URL.
    /// - `PORTAL_COMMITMENT`: `processed`, `confirmed` or `finalized`.
    pub fn embedded() -> Result<Self, ApiError> {
        let config = Self::from_json(EMBEDDED_CONFIG).context("loading config/portal.json")?;
        let config = config
            .with_overrides(option_env!("PORTAL_CLUSTER"), option_env!("PORTAL_COMMITMENT"))
            .context("applying PORTAL_* overrides")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_loads() {
        let config = PortalConfig::from_json(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.network.cluster, Cluster::Devnet);
        assert_eq!(config.network.commitment, Commitment::Processed);
        assert_eq!(config.network.confirm_timeout, Duration::from_secs(30));
        assert_eq!(
            config.record.address().to_string(),
            "9ed6GHSJmWcsft8R9n7YQM9KnWXYWRrvBnrC1xWQWHQQ"
        );
    }

    #[test]
    fn named_clusters_resolve_to_public_endpoints() {
        assert_eq!(
            "devnet".parse::<Cluster>().unwrap().url(),
            "https://api.devnet.solana.com"
        );
        assert_eq!("Mainnet".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert_eq!(
            "http://10.0.0.5:8899".parse::<Cluster>().unwrap().url(),
            "http://10.0.0.5:8899"
        );
        assert!("moon".parse::<Cluster>().is_err());
    }

    #[test]
    fn padded_or_upper_case_urls_are_accepted() {
        assert_eq!(
            " https://rpc.example ".parse::<Cluster>().unwrap(),
            Cluster::Custom("https://rpc.example".to_string())
        );
        assert_eq!(
            "HTTPS://rpc.example".parse::<Cluster>().unwrap().url(),
            "HTTPS://rpc.example"
        );
        assert_eq!(
            " Moon ".parse::<Cluster>().unwrap_err(),
            ConfigError::Parse("unknown cluster ` Moon `".to_string())
        );
    }

    #[test]
    fn overrides_replace_cluster_and_commitment() {
        let config = PortalConfig::from_json(EMBEDDED_CONFIG)
            .unwrap()
            .with_overrides(Some("localnet"), Some("Finalized"))
            .unwrap();
        assert_eq!(config.network.endpoint_url(), "http://127.0.0.1:8899");
        assert_eq!(config.network.commitment, Commitment::Finalized);
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let config = PortalConfig::from_json(EMBEDDED_CONFIG)
            .unwrap()
            .with_overrides(Some(""), None)
            .unwrap();
        assert_eq!(config.network.cluster, Cluster::Devnet);
    }

    #[test]
    fn bad_commitment_override_is_an_error() {
        let err = PortalConfig::from_json(EMBEDDED_CONFIG)
            .unwrap()
            .with_overrides(None, Some("eventually"))
            .unwrap_err();
        assert_eq!(err, ConfigError::Commitment("eventually".to_string()));
    }

    #[test]
    fn missing_program_id_is_a_parse_error() {
        let err = PortalConfig::from_json(r#"{ "record_keypair": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
