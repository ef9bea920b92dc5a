pub mod cache;
pub mod tables;

use crate::config::Settings;
use anyhow::Context;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlSslMode};
use std::time::Duration;

pub async fn connect(settings: &Settings) -> anyhow::Result<MySqlPool> {
    let host = settings.require_db_host()?;
    let mut opts = MySqlConnectOptions::new()
        .host(host)
        .port(settings.db_port)
        .username(settings.require_db_user()?)
        .database(settings.require_db_name()?);
    if let Some(password) = settings.db_password.as_deref() {
        opts = opts.password(password);
    }
    // TiDB Cloud requires TLS; with a CA bundle we also verify the server certificate.
    opts = match settings.db_ssl_ca.as_deref() {
        Some(ca) => opts.ssl_mode(MySqlSslMode::VerifyCa).ssl_ca(ca),
        None => opts.ssl_mode(MySqlSslMode::Preferred),
    };

    let pool = MySqlPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(opts)
        .await
        .with_context(|| format!("connect to database at {host}:{} failed", settings.db_port))?;

    tracing::info!(%host, port = settings.db_port, "database pool ready");
    Ok(pool)
}
