use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{InMemoryUserRepository, UserRepository};
use crate::auth::services::AuthService;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let users = Arc::new(InMemoryUserRepository::seeded(&config.seed_password)?);
        tracing::info!(users = users.len(), "credential store seeded");
        Self::from_parts(Arc::new(config), users)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
    ) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(&config.jwt);
        let auth = Arc::new(AuthService::new(users.clone(), keys)?);
        Ok(Self {
            config,
            users,
            auth,
        })
    }

    /// Seeded state with a fixed test secret.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig::for_tests());
        let users = Arc::new(
            InMemoryUserRepository::seeded(&config.seed_password).expect("seed store ok"),
        );
        Self::from_parts(config, users).expect("state ok")
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.keys().clone()
    }
}
