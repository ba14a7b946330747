// src/services/jwt_service.rs
use crate::config::JwtConfig;
use crate::models::jwt::{IdentityClaims, TokenClaims, TokenKind};

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Signs and verifies the access/refresh token pair with a process-wide HS256
/// secret. Parsing never errors: any failure means "no identity".
#[derive(Clone)]
pub struct JwtService {
    enc_key: EncodingKey,
    dec_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let enc_key = EncodingKey::from_secret(config.secret.as_bytes());
        let dec_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            enc_key,
            dec_key,
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /* ---------- PUBLIC API ---------- */

    pub fn issue_access(&self, claims: &IdentityClaims) -> Result<String, JwtError> {
        self.issue(claims, TokenKind::Access, self.access_ttl_secs)
    }

    pub fn issue_refresh(&self, claims: &IdentityClaims) -> Result<String, JwtError> {
        self.issue(claims, TokenKind::Refresh, self.refresh_ttl_secs)
    }

    pub fn parse_access(&self, token: &str) -> Option<IdentityClaims> {
        self.parse(token, TokenKind::Access)
    }

    pub fn parse_refresh(&self, token: &str) -> Option<IdentityClaims> {
        self.parse(token, TokenKind::Refresh)
    }

    /// Sign `claims` with an absolute expiry `ttl_secs` from now.
    #[instrument(skip(self, claims), fields(user_id = claims.id))]
    pub fn issue(
        &self,
        claims: &IdentityClaims,
        kind: TokenKind,
        ttl_secs: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let token_claims = TokenClaims {
            identity: claims.clone(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: kind,
        };
        encode(&Header::new(Algorithm::HS256), &token_claims, &self.enc_key)
    }

    /// Verify signature, expiry and token kind. Bad signature, malformed
    /// payload, expiry and kind mismatch all collapse to `None`.
    pub fn parse(&self, token: &str, kind: TokenKind) -> Option<IdentityClaims> {
        match self.decode_jwt(token) {
            Ok(claims) if claims.token_type == kind => Some(claims.identity),
            Ok(claims) => {
                debug!(expected = ?kind, actual = ?claims.token_type, "Token kind mismatch");
                None
            }
            Err(e) => {
                debug!(error = %e, kind = ?kind, "Token rejected");
                None
            }
        }
    }

    /* ---------- PRIVATE HELPERS ---------- */

    fn decode_jwt(&self, token: &str) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.dec_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "unit-test-secret".into(),
            access_ttl_secs: 60,
            refresh_ttl_secs: 3600,
        })
    }

    fn alice() -> IdentityClaims {
        IdentityClaims {
            id: 7,
            username: "alice".into(),
            nickname: "Alice".into(),
            role: Role::User,
        }
    }

    #[test]
    fn parse_returns_issued_claims_before_expiry() {
        let jwt = service();
        let token = jwt.issue_access(&alice()).unwrap();
        assert_eq!(jwt.parse_access(&token), Some(alice()));
    }

    #[test]
    fn expired_token_is_invalid() {
        let jwt = service();
        let token = jwt.issue(&alice(), TokenKind::Access, -10).unwrap();
        assert_eq!(jwt.parse_access(&token), None);
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let other = JwtService::new(&JwtConfig {
            secret: "another-secret".into(),
            access_ttl_secs: 60,
            refresh_ttl_secs: 3600,
        });
        let token = other.issue_access(&alice()).unwrap();
        assert_eq!(service().parse_access(&token), None);
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(service().parse_access("not.a.jwt"), None);
        assert_eq!(service().parse_refresh(""), None);
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let jwt = service();
        let refresh = jwt.issue_refresh(&alice()).unwrap();
        assert_eq!(jwt.parse_access(&refresh), None);
        assert_eq!(jwt.parse_refresh(&refresh), Some(alice()));
    }

    #[test]
    fn tokens_issued_back_to_back_differ() {
        let jwt = service();
        let first = jwt.issue_refresh(&alice()).unwrap();
        let second = jwt.issue_refresh(&alice()).unwrap();
        assert_ne!(first, second);
    }
}
