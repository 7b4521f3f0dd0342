use std::env;

use anyhow::{bail, Context, Result};
use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::NoTls;
use tokio_postgres::config::Host;

const DEFAULT_PORT: u16 = 3001;
const POOL_MAX_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store_backend: StoreBackend,
    /// Empty means any origin is accepted.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let store_backend = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("STORE_BACKEND must be \"postgres\" or \"memory\", got {other:?}"),
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            port,
            store_backend,
            allowed_origins,
        })
    }
}

pub fn get_pg_pool() -> Result<Pool> {
    pg_config(|key| env::var(key).ok())?
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}

/// `DATABASE_URL` wins; otherwise the connection is assembled from `PG_*` parts.
fn pg_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let mut cfg = Config::new();
    if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
        apply_database_url(&mut cfg, url.trim())?;
    } else {
        cfg.host = Some(lookup("PG_HOST").context("neither DATABASE_URL nor PG_HOST is set")?);
        cfg.user = Some(lookup("PG_USER").context("PG_USER not set")?);
        cfg.password = lookup("PG_PASS");
        cfg.dbname = Some(lookup("PG_DB").context("PG_DB not set")?);
        cfg.port = lookup("PG_PORT")
            .map(|raw| raw.trim().parse::<u16>())
            .transpose()
            .context("PG_PORT is not a valid port")?;
    }

    let mut pool = cfg.pool.take().unwrap_or_default();
    pool.max_size = POOL_MAX_SIZE;
    cfg.pool = Some(pool);
    Ok(cfg)
}

/// Copies the parts of a `postgres://` connection string into the pool config.
/// Only the first host and port are used.
fn apply_database_url(cfg: &mut Config, url: &str) -> Result<()> {
    let parsed: tokio_postgres::Config = url.parse().context("DATABASE_URL is not a valid connection string")?;

    cfg.host = match parsed.get_hosts().first() {
        Some(Host::Tcp(host)) => Some(host.clone()),
        #[cfg(unix)]
        Some(Host::Unix(path)) => Some(path.to_string_lossy().into_owned()),
        None => bail!("DATABASE_URL has no host"),
    };
    cfg.port = parsed.get_ports().first().copied();
    cfg.user = parsed.get_user().map(String::from);
    cfg.password = parsed
        .get_password()
        .map(|raw| String::from_utf8(raw.to_vec()))
        .transpose()
        .context("DATABASE_URL password is not valid UTF-8")?;
    cfg.dbname = parsed.get_dbname().map(String::from);
    Ok(())
}
