use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs};

#[derive(Deserialize)]
pub struct SSLConfig {
    pub private_key_file: PathBuf,
    pub certificate_chain_file: PathBuf,
}

/// Seed account created at startup if it does not exist yet.
#[derive(Deserialize, Clone)]
pub struct DefaultUserConfig {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Deserialize, Clone, Copy)]
pub struct SessionConfig {
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            ttl_hours: default_ttl_hours(),
            sweep_interval_minutes: default_sweep_interval_minutes(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_sweep_interval_minutes() -> u64 {
    15
}

#[derive(Deserialize)]
pub struct Config {
    pub database_url: String,
    pub signups_enabled: bool,
    #[serde(default)]
    pub cors_allowed_origin: Option<String>,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub default_user: Option<DefaultUserConfig>,
    #[serde(default)]
    pub ssl: Option<SSLConfig>,
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path).context("Unable to read config file")?;
        let config: Config =
            toml::from_str(config.as_str()).with_context(|| "Unable to parse config")?;
        Ok(config)
    }

    pub fn from_env() -> Result<Config, anyhow::Error> {
        let database_url = read_env("DATABASE_URL")?;
        let signups_enabled = read_env("SIGNUPS_ENABLED")?
            .parse()
            .context("Unable to parse SIGNUPS_ENABLED value")?;
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN").ok();

        let config = Config {
            database_url,
            signups_enabled,
            cors_allowed_origin,
            session: SessionConfig::default(),
            default_user: None,
            ssl: None,
        };
        Ok(config)
    }
}

fn read_env(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).with_context(|| format!("Unable to read env var: {}", key))
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn parses_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            database_url = "sqlite://tally.db"
            signups_enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(config.database_url, "sqlite://tally.db");
        assert!(config.signups_enabled);
        assert!(config.cors_allowed_origin.is_none());
        assert_eq!(config.session.ttl_hours, 24);
        assert_eq!(config.session.sweep_interval_minutes, 15);
        assert!(config.default_user.is_none());
        assert!(config.ssl.is_none());
    }

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            database_url = "sqlite://tally.db"
            signups_enabled = false
            cors_allowed_origin = "http://localhost:5173"

            [session]
            ttl_hours = 8
            sweep_interval_minutes = 5

            [default_user]
            username = "admin"
            password = "change-me"
            email = "admin@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.cors_allowed_origin.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(config.session.ttl_hours, 8);
        assert_eq!(config.default_user.unwrap().username, "admin");
    }
}
