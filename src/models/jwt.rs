// src/models/jwt.rs
use serde::{Deserialize, Serialize};

use crate::models::user::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity fields embedded in a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub role: Role,
}

impl From<&User> for IdentityClaims {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            role: user.role,
        }
    }
}

/// Wire shape of both access and refresh tokens; only `token_type` and the
/// expiry differ between the two.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub identity: IdentityClaims,
    pub exp: i64,        // expiration time
    pub iat: i64,        // issued at
    pub jti: String,     // makes tokens issued in the same second distinct
    pub token_type: TokenKind,
}
