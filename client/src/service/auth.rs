use crate::api::ApiClient;
use fireflightcore::model::Credentials;
use fireflightcore::storage::Storage;
use fireflightcore::telemetry::{log_outcome, CallMetrics};
use fireflightcore::{FireError, FireResult};
use log::info;
use std::sync::Arc;

/// Registration, login and the stored session token.
pub struct AuthService {
    api: ApiClient,
    storage: Arc<Storage>,
    metrics: Arc<CallMetrics>,
}

impl AuthService {
    pub fn new(api: ApiClient, storage: Arc<Storage>, metrics: Arc<CallMetrics>) -> Self {
        Self {
            api,
            storage,
            metrics,
        }
    }

    /// Creates an account. The confirmation never leaves the client.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> FireResult<()> {
        let credentials = validated(username, password)?;
        if password != confirmation {
            return Err(FireError::field("password", "Passwords must match"));
        }
        let result = self.api.register(&credentials).await;
        log_outcome(&self.metrics, "POST /auth/register", &result);
        result
    }

    pub async fn login(&self, username: &str, password: &str) -> FireResult<()> {
        let credentials = validated(username, password)?;
        let result = self.api.login(&credentials).await;
        log_outcome(&self.metrics, "POST /auth/login", &result);
        self.storage.set_token(&result?)?;
        info!("logged in as {}", credentials.username);
        Ok(())
    }

    pub fn logout(&self) -> FireResult<()> {
        self.storage.clear_token()
    }

    pub fn is_authenticated(&self) -> FireResult<bool> {
        Ok(self.storage.token()?.is_some())
    }
}

fn validated(username: &str, password: &str) -> FireResult<Credentials> {
    let username = username.trim();
    if username.is_empty() {
        return Err(FireError::field("username", "Username is required"));
    }
    if password.is_empty() {
        return Err(FireError::field("password", "Password is required"));
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}
