use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, LoginRequest, Role, User};
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl_secs: i64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, token_ttl_secs: i64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl_secs,
        }
    }

    /// Registers a regular account. Self-registration never grants admin.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: CreateUser) -> Result<(User, String)> {
        self.register_with_role(req, Role::User).await
    }

    /// Startup bootstrap for the admin account; not reachable from any route.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register_admin(&self, req: CreateUser) -> Result<(User, String)> {
        self.register_with_role(req, Role::Admin).await
    }

    async fn register_with_role(&self, req: CreateUser, role: Role) -> Result<(User, String)> {
        trace!("Starting user registration");
        req.validate()?;

        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!(email = %req.email, "Registration rejected, email already taken");
            return Err(DomainError::DuplicateAccount(req.email).into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            email: req.email,
            password_hash,
            role,
        };

        debug!(user_id = %user.id, email = %user.email, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        let token = self.issue_token(&user)?;

        info!(
            user_id = %user.id,
            email = %user.email,
            role = %user.role,
            "User registered successfully"
        );

        Ok((user, token))
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<(User, String)> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::InvalidCredentials
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, email = %user.email, "Invalid password during login");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = self.issue_token(&user)?;

        info!(user_id = %user.id, email = %user.email, "Login successful");

        Ok((user, token))
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        generate_token(&user.id, user.role, &self.jwt_secret, self.token_ttl_secs).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e)).into()
        })
    }
}
