//! Signup, login and admin provisioning

use std::sync::Arc;

use serde::Deserialize;

use travelhub_core::models::{Nickname, Password, Username};

use super::ServiceError;
use crate::auth::PasswordHasher;
use crate::store::{NewUser, Store, StoreError, User, UserSummary};

/// Signup form as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub nickname: String,
    pub password: String,
}

/// Result of `provision-admin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    Promoted,
    Unchanged,
}

impl ProvisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Promoted => "promoted",
            Self::Unchanged => "unchanged",
        }
    }
}

#[derive(Clone)]
pub struct Accounts {
    store: Arc<dyn Store>,
    hasher: PasswordHasher,
}

impl Accounts {
    pub fn new(store: Arc<dyn Store>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    async fn hash(&self, password: &Password) -> Result<String, ServiceError> {
        let hasher = self.hasher.clone();
        let plain = password.expose().to_owned();
        Ok(tokio::task::spawn_blocking(move || hasher.hash(&plain)).await??)
    }

    async fn insert(
        &self,
        username: Username,
        nickname: Nickname,
        password: &Password,
        is_admin: bool,
    ) -> Result<User, ServiceError> {
        let password_hash = self.hash(password).await?;
        self.store
            .create_user(NewUser {
                username,
                nickname,
                password_hash,
                is_admin,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => ServiceError::UsernameTaken,
                other => other.into(),
            })
    }

    /// Register a regular user.
    pub async fn signup(&self, form: &SignupForm) -> Result<User, ServiceError> {
        let username = Username::new(&form.username)?;
        let nickname = Nickname::new(&form.nickname)?;
        let password = Password::new(&form.password)?;

        let user = self.insert(username, nickname, &password, false).await?;
        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Check credentials. Unknown user and wrong password fail identically.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let user = self.store.user_by_username(username.trim()).await?;
        let hasher = self.hasher.clone();
        let plain = password.to_owned();

        let (user, ok) = match user {
            Some(user) => {
                let stored = user.password_hash.clone();
                let ok =
                    tokio::task::spawn_blocking(move || hasher.verify(&plain, &stored)).await??;
                (Some(user), ok)
            }
            None => {
                tokio::task::spawn_blocking(move || hasher.verify_dummy(&plain)).await??;
                (None, false)
            }
        };

        match user {
            Some(user) if ok => {
                tracing::info!(user_id = user.id, "login succeeded");
                Ok(user)
            }
            _ => {
                tracing::info!("login rejected");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    /// Create or promote an administrator. An existing user keeps their
    /// password.
    pub async fn provision_admin(
        &self,
        username: &str,
        nickname: &str,
        password: &str,
    ) -> Result<(User, ProvisionOutcome), ServiceError> {
        let username = Username::new(username)?;

        if let Some(mut user) = self.store.user_by_username(username.as_str()).await? {
            if user.is_admin {
                return Ok((user, ProvisionOutcome::Unchanged));
            }
            self.store.set_admin(user.id, true).await?;
            user.is_admin = true;
            tracing::info!(user_id = user.id, "user promoted to admin");
            return Ok((user, ProvisionOutcome::Promoted));
        }

        let nickname = Nickname::new(nickname)?;
        let password = Password::new(password)?;
        let user = self.insert(username, nickname, &password, true).await?;
        tracing::info!(user_id = user.id, "admin created");
        Ok((user, ProvisionOutcome::Created))
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError> {
        let users = self.store.list_users().await?;
        Ok(users.iter().map(UserSummary::from).collect())
    }
}
