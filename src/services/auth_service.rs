use bcrypt::{hash, verify};
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};
use crate::models::jwt::IdentityClaims;
use crate::models::user::{NewUser, Role, User};
use crate::services::jwt_service::JwtService;

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    jwt: JwtService,
    bcrypt_cost: u32,
}

pub struct JoinRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub nickname: &'a str,
    pub email: &'a str,
    pub address: &'a str,
}

/// Result of a successful password login.
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthService {
    pub fn new(pool: SqlitePool, jwt: JwtService, bcrypt_cost: u32) -> Self {
        Self {
            pool,
            jwt,
            bcrypt_cost,
        }
    }

    /* ---------- credential store ---------- */

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    pub async fn find_by_api_key(&self, api_key: &str) -> AppResult<Option<User>> {
        Ok(User::find_by_api_key(&self.pool, api_key).await?)
    }

    pub fn check_password(&self, user: &User, raw: &str) -> AppResult<()> {
        // A corrupt stored hash is reported as a mismatch, not a crash.
        match verify(raw, &user.password_hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::PasswordMismatch),
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                Err(AppError::PasswordMismatch)
            }
        }
    }

    pub async fn update_refresh_token(&self, user: &User, token: Option<&str>) -> AppResult<()> {
        User::update_refresh_token(&self.pool, user.id, token).await?;
        Ok(())
    }

    pub fn issue_access_token(&self, user: &User) -> AppResult<String> {
        Ok(self.jwt.issue_access(&IdentityClaims::from(user))?)
    }

    /* ---------- flows ---------- */

    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn join(&self, req: JoinRequest<'_>) -> AppResult<User> {
        self.create_user(req, Role::User).await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or(AppError::UnknownUsername)?;

        self.check_password(&user, password)?;

        let claims = IdentityClaims::from(&user);
        let access_token = self.jwt.issue_access(&claims)?;
        let refresh_token = self.jwt.issue_refresh(&claims)?;

        // Overwrite: any previously issued refresh token stops matching.
        self.update_refresh_token(&user, Some(&refresh_token)).await?;

        info!(user_id = user.id, "User logged in");
        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Trade a refresh token for a fresh access token. The token must verify
    /// and be byte-identical to the one stored for its owner.
    #[instrument(skip(self, refresh_token))]
    pub async fn exchange_refresh_token(&self, refresh_token: &str) -> AppResult<(User, String)> {
        let claims = self
            .jwt
            .parse_refresh(refresh_token)
            .ok_or(AppError::RefreshTokenExpired)?;

        let user = match self.find_by_id(claims.id).await? {
            Some(user) => user,
            None => {
                warn!(user_id = claims.id, "Refresh token owner not found");
                return Err(AppError::RefreshUserNotFound);
            }
        };

        if user.refresh_token.as_deref() != Some(refresh_token) {
            warn!(user_id = user.id, "Refresh token mismatch");
            return Err(AppError::RefreshTokenMismatch);
        }

        let access_token = self.issue_access_token(&user)?;
        info!(user_id = user.id, "Access token renewed from refresh token");
        Ok((user, access_token))
    }

    /// Invalidate the stored refresh token if the presented one is still the
    /// active one. Unknown or stale tokens are ignored.
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let Some(claims) = self.jwt.parse_refresh(refresh_token) else {
            return Ok(());
        };
        if let Some(user) = self.find_by_id(claims.id).await? {
            if user.refresh_token.as_deref() == Some(refresh_token) {
                self.update_refresh_token(&user, None).await?;
                info!(user_id = user.id, "Refresh token invalidated");
            }
        }
        Ok(())
    }

    pub async fn is_username_available(&self, username: &str) -> AppResult<bool> {
        Ok(!User::exists_by_username(&self.pool, username).await?)
    }

    pub async fn is_email_available(&self, email: &str) -> AppResult<bool> {
        Ok(!User::exists_by_email(&self.pool, email).await?)
    }

    /// Create the configured admin account unless the username already exists.
    #[instrument(skip(self, bootstrap), fields(username = %bootstrap.username))]
    pub async fn ensure_admin(&self, bootstrap: &AdminBootstrap) -> AppResult<()> {
        if self.find_by_username(&bootstrap.username).await?.is_some() {
            return Ok(());
        }
        let email = format!("{}@localhost", bootstrap.username);
        self.create_user(
            JoinRequest {
                username: &bootstrap.username,
                password: &bootstrap.password,
                nickname: &bootstrap.username,
                email: &email,
                address: "",
            },
            Role::Admin,
        )
        .await?;
        info!("Bootstrap admin created");
        Ok(())
    }

    pub(crate) async fn create_user(&self, req: JoinRequest<'_>, role: Role) -> AppResult<User> {
        if User::exists_by_username(&self.pool, req.username).await? {
            return Err(AppError::UsernameTaken);
        }
        if User::exists_by_email(&self.pool, req.email).await? {
            return Err(AppError::EmailTaken);
        }

        let password_hash = hash(req.password, self.bcrypt_cost)?;
        let api_key = Uuid::new_v4().to_string();

        let user = User::create(
            &self.pool,
            NewUser {
                username: req.username,
                password_hash: &password_hash,
                nickname: req.nickname,
                email: req.email,
                address: req.address,
                role,
                api_key: &api_key,
            },
        )
        .await?;

        info!(user_id = user.id, role = user.role.as_str(), "User created");
        Ok(user)
    }
}
