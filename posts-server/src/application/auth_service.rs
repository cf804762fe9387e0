use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{NewUser, UserProfile};
use crate::infrastructure::security::{Claims, JwtKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<UserProfile, DomainError> {
        let email = email.trim().to_lowercase();
        if self.repo.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "signup with registered email");
            return Err(DomainError::UserAlreadyExists(email));
        }

        let hash =
            hash_password(&password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self.repo.create(NewUser::new(name, email, hash)).await?;

        info!(user_id = user.id, "user registered");
        Ok(UserProfile::from(user))
    }

    #[instrument(skip(self, password))]
    pub async fn signin(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let user = self
            .repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(DomainError::Unauthorized("Invalid credentials"))?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized("Invalid credentials"))?;
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials"));
        }

        self.keys
            .generate_token(&UserProfile::from(user))
            .map_err(|err| DomainError::Internal(err.to_string()))
    }

    /// Claims of a presented session token, verbatim.
    pub fn current_user(&self, token: Option<&str>) -> Result<Claims, DomainError> {
        let token = token.ok_or(DomainError::Unauthorized("Missing bearer token"))?;
        self.keys
            .verify_token(token)
            .map_err(|_| DomainError::Unauthorized("Invalid or expired token"))
    }
}
