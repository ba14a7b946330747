use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError, middleware::auth::Principal};

/// Routes reachable with no credentials at all. Authentication is skipped
/// for them and the access policy always allows them.
pub const PUBLIC_ROUTES: &[(&str, &str)] = &[
    ("GET", "/api/*/products"),
    ("GET", "/api/*/products/{id}"),
    ("GET", "/api/*/products/{id}/images"),
    ("GET", "/api/*/products/{id}/images/{id}"),
    ("GET", "/api/*/users/check-username"),
    ("GET", "/api/*/users/check-email"),
    ("POST", "/api/*/users"),
    ("POST", "/api/*/users/login"),
    ("POST", "/api/*/users/token/refresh"),
    ("DELETE", "/api/*/users/logout"),
];

const API_PATTERN: &str = "/api/**";
const ADMIN_PATTERN: &str = "/api/*/adm/**";

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    /// `*`: exactly one segment.
    Any,
    /// `{name}`: one all-digit segment.
    Numeric,
    /// `**`: the rest of the path, possibly empty. Only valid last.
    Rest,
}

/// A path pattern, optionally bound to one HTTP method.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    method: Option<Method>,
    segments: Vec<Segment>,
}

impl RouteMatcher {
    pub fn new(method: Option<Method>, pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|s| match s {
                "*" => Segment::Any,
                "**" => Segment::Rest,
                s if s.starts_with('{') && s.ends_with('}') => Segment::Numeric,
                s => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { method, segments }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return false;
        }

        let parts: Vec<&str> = split_path(path).collect();
        let mut i = 0;
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                _ if i >= parts.len() => return false,
                Segment::Any => {}
                Segment::Numeric if !parts[i].bytes().all(|b| b.is_ascii_digit()) => return false,
                Segment::Numeric => {}
                Segment::Literal(lit) if lit != parts[i] => return false,
                Segment::Literal(_) => {}
            }
            i += 1;
        }
        i == parts.len()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Path-based allow/deny decisions, evaluated most specific first: public
/// routes, then the admin namespace, then the rest of the API.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    public: Vec<RouteMatcher>,
    api: RouteMatcher,
    admin: RouteMatcher,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(PUBLIC_ROUTES)
    }
}

impl AccessPolicy {
    pub fn new(public_routes: &[(&str, &str)]) -> Self {
        let public = public_routes
            .iter()
            .map(|(method, pattern)| {
                let method = match *method {
                    "*" => None,
                    m => Method::from_bytes(m.as_bytes()).ok(),
                };
                RouteMatcher::new(method, pattern)
            })
            .collect();

        Self {
            public,
            api: RouteMatcher::new(None, API_PATTERN),
            admin: RouteMatcher::new(None, ADMIN_PATTERN),
        }
    }

    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        self.public.iter().any(|m| m.matches(method, path))
    }

    pub fn is_api(&self, path: &str) -> bool {
        self.api.matches(&Method::GET, path)
    }

    pub fn is_admin(&self, path: &str) -> bool {
        self.admin.matches(&Method::GET, path)
    }

    /// Requests the authentication resolver does not look at.
    pub fn bypasses_authentication(&self, method: &Method, path: &str) -> bool {
        !self.is_api(path) || self.is_public(method, path)
    }

    pub fn check(&self, method: &Method, path: &str, principal: Option<&Principal>) -> Result<(), AppError> {
        if self.is_public(method, path) || !self.is_api(path) {
            return Ok(());
        }

        let principal = principal.ok_or(AppError::Unauthenticated)?;

        if self.is_admin(path) && !principal.is_admin() {
            return Err(AppError::Forbidden("Administrator role required".into()));
        }

        Ok(())
    }
}

pub async fn authorize(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.policy.check(
        request.method(),
        request.uri().path(),
        request.extensions().get::<Principal>(),
    )?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::ClaimsPrincipal;
    use crate::models::user::Role;

    fn principal(role: Role) -> Principal {
        Principal::Claims(ClaimsPrincipal {
            id: 1,
            username: "alice".into(),
            nickname: "Alice".into(),
            role,
        })
    }

    #[test]
    fn matcher_handles_wildcards_and_numeric_ids() {
        let m = RouteMatcher::new(Some(Method::GET), "/api/*/products/{id}/images");
        assert!(m.matches(&Method::GET, "/api/v1/products/12/images"));
        assert!(!m.matches(&Method::GET, "/api/v1/products/abc/images"));
        assert!(!m.matches(&Method::POST, "/api/v1/products/12/images"));
        assert!(!m.matches(&Method::GET, "/api/v1/products/12"));

        let rest = RouteMatcher::new(None, "/api/*/adm/**");
        assert!(rest.matches(&Method::DELETE, "/api/v1/adm/users/3"));
        assert!(rest.matches(&Method::GET, "/api/v1/adm"));
        assert!(!rest.matches(&Method::GET, "/api/v1/users"));
    }

    #[test]
    fn public_routes_are_method_qualified() {
        let policy = AccessPolicy::default();
        assert!(policy.is_public(&Method::POST, "/api/v1/users/login"));
        assert!(policy.is_public(&Method::POST, "/api/v1/users/token/refresh"));
        assert!(policy.is_public(&Method::GET, "/api/v1/products/5"));
        assert!(!policy.is_public(&Method::DELETE, "/api/v1/products/5"));
        assert!(!policy.is_public(&Method::GET, "/api/v1/users/me"));
    }

    #[test]
    fn non_api_paths_are_always_allowed() {
        let policy = AccessPolicy::default();
        assert!(policy.bypasses_authentication(&Method::GET, "/"));
        assert!(policy.check(&Method::GET, "/favicon.ico", None).is_ok());
    }

    #[test]
    fn api_paths_need_an_identity() {
        let policy = AccessPolicy::default();
        let err = policy.check(&Method::GET, "/api/v1/orders", None).unwrap_err();
        assert_eq!(err.code(), "401-1");
        assert!(policy
            .check(&Method::GET, "/api/v1/orders", Some(&principal(Role::User)))
            .is_ok());
    }

    #[test]
    fn admin_namespace_needs_admin_role() {
        let policy = AccessPolicy::default();
        let err = policy
            .check(&Method::GET, "/api/v1/adm/users", Some(&principal(Role::User)))
            .unwrap_err();
        assert_eq!(err.code(), "403-1");
        assert!(policy
            .check(&Method::GET, "/api/v1/adm/users", Some(&principal(Role::Admin)))
            .is_ok());
    }
}
