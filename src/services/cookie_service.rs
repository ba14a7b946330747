use cookie::SameSite;
use time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::config::CookieConfig;
use crate::error::AppError;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const API_KEY_COOKIE: &str = "apiKey";

/// Attributes for a single outgoing cookie.
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_secs: i64,
}

impl CookieOptions {
    pub fn from_config(config: &CookieConfig) -> Self {
        Self {
            http_only: true,
            secure: config.secure,
            same_site: config.same_site,
            max_age_secs: config.max_age_secs,
        }
    }
}

/// Request-scoped view over the cookie jar: reads what the client sent and
/// queues `Set-Cookie` headers on the response.
pub struct CookieService<'a> {
    cookies: &'a Cookies,
    defaults: CookieOptions,
}

impl<'a> CookieService<'a> {
    pub fn new(cookies: &'a Cookies, config: &CookieConfig) -> Self {
        Self {
            cookies,
            defaults: CookieOptions::from_config(config),
        }
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.set_cookie_with(name, value, self.defaults.clone());
    }

    /// A blank value expires the cookie immediately.
    pub fn set_cookie_with(&self, name: &str, value: &str, options: CookieOptions) {
        let max_age = if value.trim().is_empty() {
            Duration::ZERO
        } else {
            Duration::seconds(options.max_age_secs)
        };

        let cookie = Cookie::build((name.to_string(), value.to_string()))
            .path("/")
            .http_only(options.http_only)
            .secure(options.secure)
            .same_site(options.same_site)
            .max_age(max_age)
            .build();

        self.cookies.add(cookie);
    }

    pub fn delete_cookie(&self, name: &str) {
        self.set_cookie(name, "");
    }

    /// First non-blank value for `name`, else `default`.
    pub fn get_cookie_value(&self, name: &str, default: &str) -> String {
        self.cookies
            .get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn set_auth_cookies(&self, access_token: &str, refresh_token: &str, api_key: &str) {
        self.set_cookie(ACCESS_TOKEN_COOKIE, access_token);
        self.set_cookie(REFRESH_TOKEN_COOKIE, refresh_token);
        self.set_cookie(API_KEY_COOKIE, api_key);
    }

    pub fn clear_auth_cookies(&self) {
        self.delete_cookie(ACCESS_TOKEN_COOKIE);
        self.delete_cookie(REFRESH_TOKEN_COOKIE);
        self.delete_cookie(API_KEY_COOKIE);
    }

    /// Cookie side effects of a failed refresh-token exchange. A mismatch may
    /// mean the token was stolen, so every auth cookie goes.
    pub fn clear_after_refresh_failure(&self, err: &AppError) {
        match err {
            AppError::RefreshTokenMismatch => self.clear_auth_cookies(),
            AppError::RefreshTokenExpired | AppError::RefreshUserNotFound => {
                self.delete_cookie(REFRESH_TOKEN_COOKIE)
            }
            _ => {}
        }
    }
}
