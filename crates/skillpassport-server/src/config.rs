//! Configuration loaded from environment variables.

use std::env;

use anyhow::{bail, Context, Result};
use skillpassport_chain::{Network, DEFAULT_METADATA_TEMPLATE};

/// Site-wide plugin settings.
#[derive(Debug, Clone)]
pub struct PassportSettings {
    /// Network credentials are verified on.
    pub network: Network,

    /// RPC node a real anchorer would talk to.
    pub demo_node_url: String,

    /// JSON template for NFT metadata.
    pub nft_metadata_template: String,

    pub show_course_completions: bool,
    pub show_activity_completions: bool,
    pub show_badges: bool,

    /// Whether issuance requests a learning recommendation.
    pub recommendations_enabled: bool,
}

impl Default for PassportSettings {
    fn default() -> Self {
        Self {
            network: Network::default(),
            demo_node_url: "https://sepolia.infura.io/v3/YOUR_INFURA_PROJECT_ID".to_string(),
            nft_metadata_template: DEFAULT_METADATA_TEMPLATE.to_string(),
            show_course_completions: true,
            show_activity_completions: true,
            show_badges: true,
            recommendations_enabled: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Key for anti-forgery tokens.
    pub sesskey_secret: String,

    /// Users holding the manager role.
    pub managers: Vec<i64>,

    /// Users holding the editing-teacher role.
    pub teachers: Vec<i64>,

    pub settings: PassportSettings,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            lookup("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let sesskey_secret =
            lookup("SESSKEY_SECRET").context("SESSKEY_SECRET environment variable is required")?;
        if sesskey_secret.len() < 16 {
            bail!("SESSKEY_SECRET must be at least 16 characters");
        }

        let managers = parse_id_list(lookup("PASSPORT_MANAGERS").as_deref())
            .context("PASSPORT_MANAGERS must be a comma-separated list of user ids")?;
        let teachers = parse_id_list(lookup("PASSPORT_TEACHERS").as_deref())
            .context("PASSPORT_TEACHERS must be a comma-separated list of user ids")?;

        let defaults = PassportSettings::default();

        let network = match lookup("BLOCKCHAIN_NETWORK") {
            Some(value) => value
                .parse()
                .with_context(|| format!("BLOCKCHAIN_NETWORK '{}' is not supported", value))?,
            None => defaults.network,
        };

        let settings = PassportSettings {
            network,
            demo_node_url: lookup("DEMO_NODE_URL").unwrap_or(defaults.demo_node_url),
            nft_metadata_template: lookup("NFT_METADATA_TEMPLATE")
                .unwrap_or(defaults.nft_metadata_template),
            show_course_completions: flag(&lookup, "SHOW_COURSE_COMPLETIONS", true)?,
            show_activity_completions: flag(&lookup, "SHOW_ACTIVITY_COMPLETIONS", true)?,
            show_badges: flag(&lookup, "SHOW_BADGES", true)?,
            recommendations_enabled: flag(&lookup, "RECOMMENDATIONS_ENABLED", false)?,
        };

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            sesskey_secret,
            managers,
            teachers,
            settings,
        })
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => parse_bool(&value).with_context(|| format!("{} must be a boolean", key)),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("'{}' is not a boolean", other),
    }
}

fn parse_id_list(value: Option<&str>) -> Result<Vec<i64>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().with_context(|| format!("'{}' is not a user id", s)))
        .collect()
}
