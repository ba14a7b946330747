use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;
use tracing::{debug, warn};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{jwt::IdentityClaims, user::{Role, User}},
    services::cookie_service::{
        ACCESS_TOKEN_COOKIE, API_KEY_COOKIE, CookieService, REFRESH_TOKEN_COOKIE,
    },
    utils::headers::{get_header, set_header},
};

/// Identity rebuilt straight from access-token claims. Nothing here was
/// read from the database, so it may lag behind the stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsPrincipal {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub role: Role,
}

impl From<IdentityClaims> for ClaimsPrincipal {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            nickname: claims.nickname,
            role: claims.role,
        }
    }
}

/// The authenticated caller, attached to request extensions.
#[derive(Debug, Clone)]
pub enum Principal {
    /// Resolved from a valid access token.
    Claims(ClaimsPrincipal),
    /// Loaded from the store via the refresh-token or API-key path.
    Stored(User),
}

impl Principal {
    pub fn id(&self) -> i64 {
        match self {
            Principal::Claims(c) => c.id,
            Principal::Stored(u) => u.id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Principal::Claims(c) => &c.username,
            Principal::Stored(u) => &u.username,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Principal::Claims(c) => c.role,
            Principal::Stored(u) => u.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

/// Extractor for handlers that need a caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Raw credential strings found on a request. Blank means absent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    /// `Authorization: Bearer <apiKey>[ <accessToken>]` wins over the
    /// `apiKey`/`accessToken` cookies. The refresh token only ever comes
    /// from its cookie.
    pub fn extract(headers: &HeaderMap, cookies: &CookieService<'_>) -> AppResult<Self> {
        let authorization = get_header(headers, AUTHORIZATION.as_str(), "");
        let refresh_token = cookies.get_cookie_value(REFRESH_TOKEN_COOKIE, "");

        if authorization.is_empty() {
            return Ok(Self {
                api_key: cookies.get_cookie_value(API_KEY_COOKIE, ""),
                access_token: cookies.get_cookie_value(ACCESS_TOKEN_COOKIE, ""),
                refresh_token,
            });
        }

        let (api_key, access_token) = parse_authorization(&authorization)?;
        Ok(Self {
            api_key,
            access_token,
            refresh_token,
        })
    }

    fn is_empty(&self) -> bool {
        self.api_key.trim().is_empty()
            && self.access_token.trim().is_empty()
            && self.refresh_token.trim().is_empty()
    }
}

/// Splits a Bearer header into `(apiKey, accessToken)`; the access token
/// segment is optional.
pub fn parse_authorization(header: &str) -> AppResult<(String, String)> {
    let rest = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::MalformedAuthorization)?;

    let mut bits = rest.splitn(2, ' ');
    let api_key = bits.next().unwrap_or_default().to_string();
    let access_token = bits.next().unwrap_or_default().to_string();
    Ok((api_key, access_token))
}

#[derive(Debug)]
pub enum Resolution {
    /// No usable credential; the access policy decides what that means.
    Anonymous,
    Authenticated {
        principal: Principal,
        /// Set when the refresh token was traded for a new access token.
        renewed_access_token: Option<String>,
    },
}

/// Resolves who is calling: access token, then refresh token, then API key.
pub async fn resolve(state: &AppState, credentials: &Credentials) -> AppResult<Resolution> {
    if credentials.is_empty() {
        return Ok(Resolution::Anonymous);
    }

    if !credentials.access_token.trim().is_empty() {
        match state.jwt.parse_access(&credentials.access_token) {
            Some(claims) => {
                debug!(user_id = claims.id, "Access token is valid");
                return Ok(Resolution::Authenticated {
                    principal: Principal::Claims(claims.into()),
                    renewed_access_token: None,
                });
            }
            None => debug!("Access token is invalid or expired"),
        }
    }

    let auth = state.auth_service();

    if !credentials.refresh_token.trim().is_empty() {
        debug!("Attempting to renew access token from refresh token");
        let (user, access_token) = auth.exchange_refresh_token(&credentials.refresh_token).await?;
        return Ok(Resolution::Authenticated {
            principal: Principal::Stored(user),
            renewed_access_token: Some(access_token),
        });
    }

    if !credentials.api_key.trim().is_empty() {
        let user = auth
            .find_by_api_key(&credentials.api_key)
            .await?
            .ok_or(AppError::InvalidApiKey)?;
        debug!(user_id = user.id, "Authenticated with API key");
        return Ok(Resolution::Authenticated {
            principal: Principal::Stored(user),
            renewed_access_token: None,
        });
    }

    Ok(Resolution::Anonymous)
}

pub async fn authenticate(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state
        .policy
        .bypasses_authentication(request.method(), request.uri().path())
    {
        return Ok(next.run(request).await);
    }

    let cookie_service = CookieService::new(&cookies, &state.config.cookies);
    let credentials = Credentials::extract(request.headers(), &cookie_service)?;

    let resolution = match resolve(&state, &credentials).await {
        Ok(resolution) => resolution,
        Err(err) => {
            cookie_service.clear_after_refresh_failure(&err);
            return Err(err);
        }
    };

    let (principal, renewed_access_token) = match resolution {
        Resolution::Anonymous => {
            debug!(path = %request.uri().path(), "No credentials, continuing unauthenticated");
            return Ok(next.run(request).await);
        }
        Resolution::Authenticated {
            principal,
            renewed_access_token,
        } => (principal, renewed_access_token),
    };

    if let Some(token) = &renewed_access_token {
        cookie_service.set_cookie(ACCESS_TOKEN_COOKIE, token);
    }
    debug!(user_id = principal.id(), username = principal.username(), "Request authenticated");
    request.extensions_mut().insert(principal);

    let mut response = next.run(request).await;
    if let Some(token) = renewed_access_token {
        let bearer = format!("Bearer {token}");
        set_header(response.headers_mut(), AUTHORIZATION, Some(&bearer));
    }
    if response.status().is_server_error() {
        warn!(status = %response.status(), "Authenticated request failed");
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_with_api_key_only() {
        assert_eq!(
            parse_authorization("Bearer key-1").unwrap(),
            ("key-1".to_string(), String::new())
        );
    }

    #[test]
    fn bearer_with_api_key_and_access_token() {
        assert_eq!(
            parse_authorization("Bearer key-1 tok.en.x").unwrap(),
            ("key-1".to_string(), "tok.en.x".to_string())
        );
    }

    #[test]
    fn non_bearer_scheme_is_malformed() {
        let err = parse_authorization("Basic dXNlcjpwYXNz").unwrap_err();
        assert_eq!(err.code(), "400-2");
    }

    #[test]
    fn claims_principal_keeps_claim_fields() {
        let principal = Principal::Claims(
            IdentityClaims {
                id: 3,
                username: "bob".into(),
                nickname: "Bobby".into(),
                role: Role::Admin,
            }
            .into(),
        );
        assert_eq!(principal.id(), 3);
        assert_eq!(principal.username(), "bob");
        assert!(principal.is_admin());
    }
}
