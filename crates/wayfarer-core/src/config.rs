use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CACHE_MAX_AGE, DEFAULT_CACHE_SWR, DEFAULT_COLLECTION, DEFAULT_FALLBACK_SLUG,
    DEFAULT_LOOKUP_TIMEOUT_MS, DEFAULT_MAX_SUFFIX_ATTEMPTS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub lookup: LookupConfig,
    pub slug: SlugConfig,
    #[serde(default = "default_collections")]
    pub collections: Vec<CollectionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the `http://host:port` origin built from the bind address.
    #[must_use]
    pub fn serve_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.serve_origin()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Where the redirect middleware resolves records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Query the record store in-process.
    Store,
    /// Call the lookup endpoints of a Wayfarer instance over HTTP.
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    pub mode: LookupMode,
    /// Origin of the lookup API. Required for `LookupMode::Http`.
    pub base_url: Option<String>,
    pub timeout_ms: u64,
    pub cache_max_age: u32,
    pub cache_swr: u32,
}

impl LookupConfig {
    /// ## Summary
    /// `Cache-Control` value for slug lookup responses.
    #[must_use]
    pub fn cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.cache_max_age, self.cache_swr
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlugConfig {
    /// Numeric suffixes tried before falling back to a timestamp suffix.
    pub max_suffix_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionConfig {
    pub name: String,
    #[serde(default = "default_fallback_slug")]
    pub fallback_slug: String,
}

fn default_collections() -> Vec<CollectionConfig> {
    vec![CollectionConfig {
        name: DEFAULT_COLLECTION.to_string(),
        fallback_slug: default_fallback_slug(),
    }]
}

fn default_fallback_slug() -> String {
    DEFAULT_FALLBACK_SLUG.to_string()
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `config.toml` into a `Settings`.
    /// Environment variables use the `WAYFARER_` prefix and `__` between
    /// sections, e.g. `WAYFARER_DATABASE__URL`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::builder_with_defaults()?
            // Env file
            .add_source(
                config::Environment::with_prefix("WAYFARER")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds `Settings` from the defaults plus a TOML document.
    ///
    /// ## Errors
    /// Returns an error if the document is invalid or misses required keys.
    pub fn from_toml(toml: &str) -> Result<Self> {
        Ok(Self::builder_with_defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "debug")?
            .set_default("lookup.mode", "store")?
            .set_default("lookup.timeout_ms", DEFAULT_LOOKUP_TIMEOUT_MS)?
            .set_default("lookup.cache_max_age", DEFAULT_CACHE_MAX_AGE)?
            .set_default("lookup.cache_swr", DEFAULT_CACHE_SWR)?
            .set_default("slug.max_suffix_attempts", DEFAULT_MAX_SUFFIX_ATTEMPTS)?)
    }

    /// ## Summary
    /// Returns the configuration of a monitored collection.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn is_monitored(&self, name: &str) -> bool {
        self.collection(name).is_some()
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(
        collections = settings.collections.len(),
        lookup_mode = ?settings.lookup.mode,
        "Configuration parsed"
    );
    Ok(settings)
}
