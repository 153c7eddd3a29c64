use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::JwtKeys;
use crate::database::models::{NewAccount, PublicAccount};
use crate::database::{DatabaseError, Store};

use super::{non_blank, ServiceError};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_in: i64,
    pub user: PublicAccount,
}

/// Local administrator registry that issues bearer tokens
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    keys: Arc<JwtKeys>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, keys: Arc<JwtKeys>) -> Self {
        Self { store, keys }
    }

    pub async fn signup(
        &self,
        email: Option<String>,
        password: Option<String>,
        name: Option<String>,
    ) -> Result<PublicAccount, ServiceError> {
        let (email, password, name) = match (non_blank(email), non_blank(password), non_blank(name)) {
            (Some(e), Some(p), Some(n)) => (normalize_email(&e), p, n.trim().to_string()),
            _ => {
                return Err(ServiceError::InvalidInput(
                    "Email, password, and name are required".to_string(),
                ))
            }
        };
        if !email.contains('@') {
            return Err(ServiceError::InvalidInput("Email address is not valid".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ServiceError::Internal(format!("password hashing task failed: {e}")))?
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;

        let account = self
            .store
            .insert_account(NewAccount { email, name, password_hash })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => {
                    ServiceError::Conflict("An account with this email already exists".to_string())
                }
                other => ServiceError::Store(other),
            })?;

        info!("Registered administrator {} ({})", account.id, account.email);
        Ok(account.into())
    }

    pub async fn login(&self, email: Option<String>, password: Option<String>) -> Result<LoginOutcome, ServiceError> {
        let (email, password) = match (non_blank(email), password.filter(|p| !p.is_empty())) {
            (Some(e), Some(p)) => (normalize_email(&e), p),
            _ => return Err(ServiceError::InvalidInput("Email and password are required".to_string())),
        };

        let Some(account) = self.store.find_account_by_email(&email).await? else {
            warn!("Login failed for unknown email {}", email);
            return Err(ServiceError::InvalidCredentials);
        };

        let hash = account.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::Internal(format!("password verification task failed: {e}")))?;
        if !verified {
            warn!("Login failed for {}: wrong password", account.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self
            .keys
            .issue(account.id, Some(account.email.clone()))
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(LoginOutcome {
            token,
            expires_in: self.keys.expires_in_secs(),
            user: account.into(),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
