use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Defaults compiled into the binary so the service starts without any
/// configuration file.
const DEFAULTS: &str = r#"
    [server]
    host = "0.0.0.0"
    port = 8080
    request_timeout_secs = 30

    [database]
    url = ""
    max_connections = 20
    min_connections = 5
    connect_timeout_secs = 10
    idle_timeout_secs = 600
    run_migrations = false

    [logging]
    level = "info"
    format = "json"

    [cors]
    allowed_origins = []

    [custom_domains]
    cache_ttl_secs = 300
    cache_capacity = 10000
    lookup_timeout_ms = 2000

    [identity]
    jwt_secret = ""
    jwt_public_key = ""
    audience = ""
    leeway_secs = 30
    remote_url = ""
    remote_api_key = ""
    timeout_ms = 2000
"#;

/// Plain environment variables accepted alongside the `GROOM__` ones.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("PORT", "server.port"),
    ("CUSTOM_DOMAIN_CACHE_TTL_SECONDS", "custom_domains.cache_ttl_secs"),
    ("SUPABASE_URL", "identity.remote_url"),
    ("SUPABASE_SERVICE_ROLE_KEY", "identity.remote_api_key"),
    ("SUPABASE_JWT_SECRET", "identity.jwt_secret"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub custom_domains: CustomDomainsConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Empty disables every database-backed gate component.
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Exact origins, exact hostnames, `*.suffix` wildcards or `*`.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomDomainsConfig {
    pub cache_ttl_secs: u64,
    /// Maximum cached hostnames; 0 means unbounded.
    pub cache_capacity: usize,
    /// 0 disables the lookup timeout.
    pub lookup_timeout_ms: u64,
}

/// Bearer token verification settings.
///
/// Precedence when several are set: remote provider, RS256 public key,
/// HS256 shared secret.
#[derive(Clone, Deserialize)]
pub struct IdentityConfig {
    pub jwt_secret: String,
    pub jwt_public_key: String,
    pub audience: String,
    pub leeway_secs: u64,
    pub remote_url: String,
    pub remote_api_key: String,
    /// Bound on token verification plus membership lookup; 0 disables it.
    pub timeout_ms: u64,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("jwt_secret", &redacted(&self.jwt_secret))
            .field("jwt_public_key", &redacted(&self.jwt_public_key))
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .field("remote_url", &self.remote_url)
            .field("remote_api_key", &redacted(&self.remote_api_key))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "[redacted]"
    }
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl CustomDomainsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl IdentityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn has_remote(&self) -> bool {
        !self.remote_url.trim().is_empty() && !self.remote_api_key.is_empty()
    }

    pub fn is_configured(&self) -> bool {
        self.has_remote() || !self.jwt_public_key.is_empty() || !self.jwt_secret.is_empty()
    }
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. embedded defaults
    /// 2. config/default.toml (optional)
    /// 3. config/local.toml (optional, not in git)
    /// 4. Environment variables with GROOM__ prefix
    /// 5. Legacy plain variables such as ALLOWED_ORIGINS and DATABASE_URL
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("GROOM")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            );

        let builder = apply_legacy_aliases(builder, |name| std::env::var(name).ok())?;

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Builds a configuration from the embedded defaults and `overrides`
    /// only, without touching files or the environment.
    pub fn with_overrides(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    ///
    /// An empty database URL is accepted: it selects degraded mode.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

/// Layers the legacy plain environment variables over `builder`.
fn apply_legacy_aliases<F>(
    mut builder: config::ConfigBuilder<config::builder::DefaultState>,
    lookup: F,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (name, key) in LEGACY_ALIASES {
        if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
            builder = builder.set_override(*key, value)?;
        }
    }

    if let Some(csv) = lookup("ALLOWED_ORIGINS") {
        builder = builder.set_override("cors.allowed_origins", split_origins(&csv))?;
    }

    Ok(builder)
}

/// Splits a comma separated origin list, trimming and dropping blanks.
pub fn split_origins(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
