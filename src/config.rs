use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub rooms: RoomConfig,

    #[command(flatten)]
    pub uploads: UploadConfig,

    #[command(flatten)]
    pub storage: StorageConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[arg(long, env = "DROPROOM_DATABASE_URL")]
    pub url: String,

    /// Maximum number of pooled connections
    #[arg(long, env = "DROPROOM_DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Minimum number of pooled connections to keep open
    #[arg(long, env = "DROPROOM_DB_MIN_CONNECTIONS", default_value_t = 1)]
    pub min_connections: u32,

    /// Timeout when acquiring a connection from the pool
    #[arg(long, env = "DROPROOM_DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    pub acquire_timeout_secs: u64,

    /// How long an idle connection may sit in the pool
    #[arg(long, env = "DROPROOM_DB_IDLE_TIMEOUT_SECS", default_value_t = 600)]
    pub idle_timeout_secs: u64,

    /// Maximum lifetime of a pooled connection
    #[arg(long, env = "DROPROOM_DB_MAX_LIFETIME_SECS", default_value_t = 1800)]
    pub max_lifetime_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "DROPROOM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the public API
    #[arg(long, env = "DROPROOM_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management endpoints (health probes)
    #[arg(long, env = "DROPROOM_MGMT_PORT", default_value_t = 3001)]
    pub mgmt_port: u16,

    /// How long to wait for background tasks during shutdown
    #[arg(long, env = "DROPROOM_SHUTDOWN_TIMEOUT_SECS", default_value_t = 30)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct RoomConfig {
    /// Room lifetime in minutes; rooms expire this long after creation
    #[arg(long, env = "DROPROOM_ROOM_TTL_MINUTES", default_value_t = 30)]
    pub ttl_minutes: i64,

    /// How often the in-process sweeper reaps expired rooms (0 disables it)
    #[arg(long, env = "DROPROOM_SWEEP_INTERVAL_SECS", default_value_t = 300)]
    pub sweep_interval_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct UploadConfig {
    /// Maximum upload size in bytes (default: 10 MiB)
    #[arg(long, env = "DROPROOM_UPLOAD_MAX_SIZE_BYTES", default_value_t = 10_485_760)]
    pub max_size_bytes: usize,

    /// Lifetime of signed download URLs in seconds
    #[arg(long, env = "DROPROOM_SIGNED_URL_TTL_SECS", default_value_t = 1800)]
    pub signed_url_ttl_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct StorageConfig {
    /// S3 bucket name
    #[arg(long, env = "DROPROOM_S3_BUCKET")]
    pub bucket: String,

    /// S3 region
    #[arg(long, env = "DROPROOM_S3_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom S3 endpoint (useful for MinIO)
    #[arg(long, env = "DROPROOM_S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// S3 access key
    #[arg(long, env = "DROPROOM_S3_ACCESS_KEY")]
    pub access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "DROPROOM_S3_SECRET_KEY")]
    pub secret_key: Option<String>,

    /// Force path style (required for many MinIO setups: http://host/bucket/key)
    #[arg(long, env = "DROPROOM_S3_FORCE_PATH_STYLE", default_value_t = false)]
    pub force_path_style: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed per client IP
    #[arg(long, env = "DROPROOM_RATE_LIMIT_PER_SECOND", default_value_t = 10)]
    pub per_second: u32,

    /// Burst allowance per client IP
    #[arg(long, env = "DROPROOM_RATE_LIMIT_BURST", default_value_t = 20)]
    pub burst: u32,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the readiness database check
    #[arg(long, env = "DROPROOM_HEALTH_DB_TIMEOUT_MS", default_value_t = 500)]
    pub db_timeout_ms: u64,

    /// Timeout for the readiness storage check
    #[arg(long, env = "DROPROOM_HEALTH_STORAGE_TIMEOUT_MS", default_value_t = 1000)]
    pub storage_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP endpoint for traces and metrics; telemetry export is disabled when unset
    #[arg(long, env = "DROPROOM_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "DROPROOM_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
