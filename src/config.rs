use axum::http::HeaderValue;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

/// Process-wide configuration, resolved from the environment on first access.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

const ENV_KEYS: [&str; 6] = [
    "database_url",
    "listen_addr",
    "loglevel",
    "cors_origins",
    "crm_endpoint",
    "crm_timeout_secs",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Comma-separated list of dashboard origins allowed by CORS.
    pub cors_origins: String,
    /// Real CRM integration. `None` selects the mock gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crm_endpoint: Option<Url>,
    pub crm_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:donation_tracker.db".to_string(),
            listen_addr: "0.0.0.0:5003".to_string(),
            loglevel: "info".to_string(),
            cors_origins: "http://localhost:3000,http://127.0.0.1:5173,http://localhost:5173"
                .to_string(),
            crm_endpoint: None,
            crm_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Defaults, overridden by raw environment variables (`DATABASE_URL`, ...).
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(&ENV_KEYS))
    }

    pub fn crm_timeout(&self) -> Duration {
        Duration::from_secs(self.crm_timeout_secs.max(1))
    }

    /// Parsed CORS origins. Entries that are not valid header values are skipped.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origins_cover_local_dashboards() {
        let origins = Config::default().cors_origins();
        assert_eq!(origins.len(), 3);
        assert_eq!(origins[0], "http://localhost:3000");
    }

    #[test]
    fn origins_ignore_blank_entries() {
        let cfg = Config {
            cors_origins: " http://a.example , ,http://b.example,".to_string(),
            ..Config::default()
        };
        let origins = cfg.cors_origins();
        assert_eq!(origins, vec!["http://a.example", "http://b.example"]);
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite::memory:");
            jail.set_env("CRM_ENDPOINT", "http://crm.local/sync");
            jail.set_env("CRM_TIMEOUT_SECS", "3");

            let cfg = Config::load()?;
            assert_eq!(cfg.database_url, "sqlite::memory:");
            assert_eq!(
                cfg.crm_endpoint.as_ref().map(Url::as_str),
                Some("http://crm.local/sync")
            );
            assert_eq!(cfg.crm_timeout(), Duration::from_secs(3));
            assert_eq!(cfg.listen_addr, "0.0.0.0:5003");
            Ok(())
        });
    }
}
