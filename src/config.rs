use std::env;

use cookie::SameSite;
use dotenv::dotenv;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Token signing material and lifetimes. Loaded once, never mutated.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

#[derive(Clone, Debug)]
pub struct CookieConfig {
    pub secure: bool,
    pub same_site: SameSite,
    /// Lifetime of non-blank cookies unless a caller shortens it.
    pub max_age_secs: i64,
}

#[derive(Clone, Debug)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cookies: CookieConfig,
    pub bcrypt_cost: u32,
    pub init_admin: Option<AdminBootstrap>,
}

const ONE_YEAR_SECS: i64 = 365 * 24 * 60 * 60;

impl AppConfig {
    /// Reads configuration from the environment (and `.env` if present).
    ///
    /// | Variable                 | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `BIND_ADDR`              | `127.0.0.1:3000`                 |
    /// | `DATABASE_URL`           | `sqlite:storefront.db?mode=rwc`  |
    /// | `JWT_SECRET`             | required                         |
    /// | `ACCESS_TOKEN_TTL_SECS`  | `1200`                           |
    /// | `REFRESH_TOKEN_TTL_SECS` | `604800`                         |
    /// | `BCRYPT_COST`            | `bcrypt::DEFAULT_COST`           |
    /// | `COOKIE_SECURE`          | `true`                           |
    /// | `COOKIE_SAME_SITE`       | `strict`                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let init_admin = match (
            env::var("INIT_ADMIN_USERNAME").ok(),
            env::var("INIT_ADMIN_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { username, password })
            }
            _ => None,
        };

        let config = Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:storefront.db?mode=rwc".to_string()),
            jwt: JwtConfig {
                secret,
                access_ttl_secs: parse_var("ACCESS_TOKEN_TTL_SECS", 20 * 60)?,
                refresh_ttl_secs: parse_var("REFRESH_TOKEN_TTL_SECS", 7 * 24 * 60 * 60)?,
            },
            cookies: CookieConfig {
                secure: parse_var("COOKIE_SECURE", true)?,
                same_site: parse_same_site()?,
                max_age_secs: ONE_YEAR_SECS,
            },
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            init_admin,
        };

        info!(
            bind_addr = %config.bind_addr,
            access_ttl = config.jwt.access_ttl_secs,
            refresh_ttl = config.jwt.refresh_ttl_secs,
            "Configuration loaded"
        );
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_same_site() -> Result<SameSite, ConfigError> {
    match env::var("COOKIE_SAME_SITE") {
        Err(_) => Ok(SameSite::Strict),
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            _ => Err(ConfigError::Invalid {
                name: "COOKIE_SAME_SITE",
                value,
            }),
        },
    }
}
