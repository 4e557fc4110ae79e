//! Client-held login state and the login form contract.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::{ApiError, AuthApi, SessionStorage};
use crate::auth::dto::PublicUser;

/// Storage key holding the issued token.
pub const TOKEN_KEY: &str = "skillswap_token";

/// Storage key holding the remembered username or email.
pub const REMEMBERED_KEY: &str = "skillswap_user_email";

/// Values entered in the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub identifier: String,
    pub password: String,
    pub remember_me: bool,
}

/// `current_user` is set iff `token` is set and was accepted by the server.
#[derive(Debug, Clone, Default)]
pub struct ClientSession {
    pub token: Option<String>,
    pub current_user: Option<PublicUser>,
    pub remembered_identifier: Option<String>,
}

/// Where the application goes after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
}

/// User-facing reasons a login attempt did not complete.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginFailure {
    #[error("Email or username is required")]
    IdentifierRequired,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Invalid username/email or password")]
    InvalidCredentials,

    #[error("Both username/email and password are required")]
    MissingFields,

    #[error("Login failed. Please try again.")]
    Rejected,

    #[error("An unexpected error occurred. Please try again.")]
    Unexpected,
}

impl From<&ApiError> for LoginFailure {
    fn from(e: &ApiError) -> Self {
        match e.status() {
            Some(401) => LoginFailure::InvalidCredentials,
            Some(400) => LoginFailure::MissingFields,
            Some(_) => LoginFailure::Rejected,
            None => LoginFailure::Unexpected,
        }
    }
}

pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn SessionStorage>,
    session: ClientSession,
}

impl SessionManager {
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn SessionStorage>) -> Self {
        let remembered_identifier = storage.get(REMEMBERED_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "could not read remembered identifier");
            None
        });
        Self {
            api,
            storage,
            session: ClientSession {
                remembered_identifier,
                ..ClientSession::default()
            },
        }
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    pub fn current_user(&self) -> Option<&PublicUser> {
        self.session.current_user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.current_user.is_some()
    }

    /// Initial form state: pre-filled when an identifier was remembered.
    pub fn restore_form(&self) -> LoginForm {
        match &self.session.remembered_identifier {
            Some(identifier) => LoginForm {
                identifier: identifier.clone(),
                password: String::new(),
                remember_me: true,
            },
            None => LoginForm::default(),
        }
    }

    /// A rejected attempt also ends any session that was already active.
    pub async fn submit_login(&mut self, form: &LoginForm) -> Result<View, LoginFailure> {
        let identifier = form.identifier.trim();
        if identifier.is_empty() {
            return Err(LoginFailure::IdentifierRequired);
        }
        if form.password.trim().is_empty() {
            return Err(LoginFailure::PasswordRequired);
        }

        let response = match self.api.login(identifier, &form.password).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "login request failed");
                self.clear_token();
                return Err(LoginFailure::from(&e));
            }
        };

        if let Err(e) = self.storage.set(TOKEN_KEY, &response.token) {
            warn!(error = %e, "could not persist token");
            return Err(LoginFailure::Unexpected);
        }

        let remembered = if form.remember_me {
            self.storage
                .set(REMEMBERED_KEY, identifier)
                .map(|_| Some(identifier.to_string()))
        } else {
            self.storage.remove(REMEMBERED_KEY).map(|_| None)
        };
        match remembered {
            Ok(r) => self.session.remembered_identifier = r,
            Err(e) => warn!(error = %e, "could not update remembered identifier"),
        }

        info!(user_id = %response.user.id, "logged in");
        self.session.token = Some(response.token);
        self.session.current_user = Some(response.user);
        Ok(View::Home)
    }

    /// Re-validates a token left in storage by an earlier run. Returns
    /// whether a session was restored; a rejected token is discarded.
    pub async fn resume(&mut self) -> Result<bool, ApiError> {
        let stored = self.storage.get(TOKEN_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "could not read stored token");
            None
        });
        let Some(token) = stored else {
            return Ok(false);
        };

        match self.api.me(&token).await {
            Ok(user) => {
                self.session.token = Some(token);
                self.session.current_user = Some(user);
                Ok(true)
            }
            Err(e) if e.status() == Some(401) => {
                info!("stored token rejected; clearing it");
                self.clear_token();
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Drops the token and current user. The remembered identifier stays.
    pub fn logout(&mut self) {
        self.clear_token();
        info!("logged out");
    }

    fn clear_token(&mut self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %e, "could not remove stored token");
        }
        self.session.token = None;
        self.session.current_user = None;
    }
}
