pub mod chart;
pub mod dashboard;
pub mod domain;
pub mod storage;
pub mod transform;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    pub const DEFAULT_DB_PORT: u16 = 4000;
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub db_host: Option<String>,
        pub db_port: u16,
        pub db_user: Option<String>,
        pub db_password: Option<String>,
        pub db_name: Option<String>,
        pub db_ssl_ca: Option<String>,
        pub db_max_connections: u32,
        pub cache_ttl: Duration,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                db_host: non_empty_var("TIDB_HOST"),
                db_port: parse_var("TIDB_PORT")?.unwrap_or(DEFAULT_DB_PORT),
                db_user: non_empty_var("TIDB_USER"),
                db_password: std::env::var("TIDB_PASSWORD").ok(),
                db_name: non_empty_var("TIDB_DATABASE"),
                db_ssl_ca: non_empty_var("TIDB_SSL_CA"),
                db_max_connections: parse_var("DB_MAX_CONNECTIONS")?
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS),
                cache_ttl: Duration::from_secs(
                    parse_var("TABLE_CACHE_TTL_SECS")?.unwrap_or(DEFAULT_CACHE_TTL_SECS),
                ),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_db_host(&self) -> anyhow::Result<&str> {
            self.db_host.as_deref().context("TIDB_HOST is required")
        }

        pub fn require_db_user(&self) -> anyhow::Result<&str> {
            self.db_user.as_deref().context("TIDB_USER is required")
        }

        pub fn require_db_name(&self) -> anyhow::Result<&str> {
            self.db_name.as_deref().context("TIDB_DATABASE is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match non_empty_var(key) {
            Some(v) => v
                .parse::<T>()
                .map(Some)
                .with_context(|| format!("{key} has an invalid value: {v}")),
            None => Ok(None),
        }
    }
}
