use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/catalog.db?mode=rwc";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Upper bound on RPC calls handled at the same time.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
    #[serde(default = "default_true")]
    pub reflection: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(default_worker_threads()),
            concurrency_limit: default_concurrency_limit(),
            reflection: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self { Self { enabled: true } }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 50051 }
fn default_worker_threads() -> usize { 10 }
fn default_concurrency_limit() -> usize { 10 }
fn default_true() -> bool { true }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults plus
    /// environment variables when the file is absent.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) => match e.downcast_ref::<std::io::Error>() {
                Some(io) if io.kind() == std::io::ErrorKind::NotFound => Self::from_env(),
                _ => return Err(e),
            },
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `SERVER_HOST`, `SERVER_PORT` and `DATABASE_URL`.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(default_worker_threads()),
            Some(_) => {}
        }
        if self.concurrency_limit == 0 {
            return Err(anyhow!("server.concurrency_limit must be >= 1"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl DatabaseConfig {
    /// Fill the URL from `DATABASE_URL`, then from the built-in SQLite default.
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            self.url = std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        let supported = lower.starts_with("sqlite:")
            || lower.starts_with("postgresql://")
            || lower.starts_with("postgres://");
        if !supported {
            return Err(anyhow!("database.url must start with sqlite:, postgres:// or postgresql://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.port, 50051);
        assert_eq!(cfg.server.concurrency_limit, 10);
        assert!(cfg.server.reflection);
        assert!(cfg.seed.enabled);
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 6000

            [database]
            url = "sqlite::memory:"

            [seed]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 6000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.min_connections, 1);
        assert!(!cfg.seed.enabled);
    }

    #[test]
    fn normalize_fills_worker_threads() {
        let mut cfg = AppConfig::default();
        cfg.server.worker_threads = Some(0);
        cfg.database.url = "sqlite::memory:".into();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.worker_threads, Some(10));
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let db = DatabaseConfig { url: "mysql://localhost/catalog".into(), ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let db = DatabaseConfig {
            url: "postgres://localhost/catalog".into(),
            min_connections: 5,
            max_connections: 2,
            ..Default::default()
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_zero_concurrency_limit() {
        let mut cfg = AppConfig::default();
        cfg.server.concurrency_limit = 0;
        cfg.database.url = "sqlite::memory:".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn bind_addr_parses() {
        let server = ServerConfig { host: "127.0.0.1".into(), port: 7000, ..Default::default() };
        assert_eq!(server.bind_addr().unwrap().port(), 7000);
    }
}
