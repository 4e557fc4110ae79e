use std::sync::Arc;

use tracing::{info, warn};

use super::dto::PublicUser;
use super::error::AuthError;
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo::UserRepository;

/// Successful login: a signed token and the caller's public profile.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: PublicUser,
}

/// Validates credentials against the injected repository and issues tokens.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
    // verified against when the identifier is unknown, so both 401 paths
    // run one argon2 verification
    dummy_hash: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys) -> anyhow::Result<Self> {
        let dummy_hash = hash_password("skillswap-dummy-password")?;
        Ok(Self {
            users,
            keys,
            dummy_hash,
        })
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.trim().is_empty() {
            warn!("login missing username/email or password");
            return Err(AuthError::Validation);
        }

        let Some(user) = self.users.find_by_identifier(identifier).await? else {
            let _ = verify_password(password, &self.dummy_hash);
            warn!(identifier = %identifier, "login unknown identifier");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(identifier = %identifier, user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.sign(&user)?;
        info!(user_id = %user.id, username = %user.username, "user logged in");
        Ok(LoginOutcome {
            token,
            user: user.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::auth::claims::Identity;
    use crate::auth::jwt::tests::make_keys;
    use crate::auth::repo::InMemoryUserRepository;
    use crate::auth::repo_types::User;

    /// Counts lookups so tests can prove validation short-circuits.
    struct CountingRepo {
        inner: InMemoryUserRepository,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl UserRepository for CountingRepo {
        async fn find_by_identifier(&self, identifier: &str) -> anyhow::Result<Option<User>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_identifier(identifier).await
        }

        async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
            self.inner.find_by_id(id).await
        }
    }

    struct FailingRepo;

    #[async_trait]
    impl UserRepository for FailingRepo {
        async fn find_by_identifier(&self, _identifier: &str) -> anyhow::Result<Option<User>> {
            anyhow::bail!("connection reset")
        }

        async fn find_by_id(&self, _id: &str) -> anyhow::Result<Option<User>> {
            anyhow::bail!("connection reset")
        }
    }

    fn service() -> (AuthService, Arc<CountingRepo>) {
        let repo = Arc::new(CountingRepo {
            inner: InMemoryUserRepository::seeded("password123").unwrap(),
            lookups: AtomicUsize::new(0),
        });
        let svc = AuthService::new(repo.clone(), make_keys("dev-secret", "iss", "aud")).unwrap();
        (svc, repo)
    }

    #[tokio::test]
    async fn login_with_username_issues_token() {
        let (svc, _) = service();
        let out = svc.login("johndoe", "password123").await.expect("login");
        assert!(!out.token.is_empty());
        assert_eq!(out.user.username, "johndoe");
    }

    #[tokio::test]
    async fn login_with_email_issues_token() {
        let (svc, _) = service();
        let out = svc.login("john@example.com", "password123").await.expect("login");
        assert_eq!(out.user.id, "1");
    }

    #[tokio::test]
    async fn token_claims_match_user_record() {
        let (svc, repo) = service();
        let out = svc.login("janedoe", "password123").await.unwrap();
        let claims = svc.keys().verify(&out.token).unwrap();
        let record = repo.inner.find_by_id("2").await.unwrap().unwrap();
        assert_eq!(claims.user, Identity::from(&record));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let (svc, _) = service();
        let wrong = svc.login("johndoe", "wrongpassword").await.unwrap_err();
        let unknown = svc.login("nonexistentuser", "password123").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(wrong.public_message(), unknown.public_message());
        assert_eq!(wrong.status_code(), unknown.status_code());
    }

    #[tokio::test]
    async fn blank_fields_fail_validation_without_lookup() {
        let (svc, repo) = service();
        let blanks = [
            ("john@example.com", ""),
            ("", "password123"),
            ("   ", "password123"),
            ("johndoe", "  "),
        ];
        for (id, pw) in blanks {
            let err = svc.login(id, pw).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation), "{id:?}/{pw:?}");
        }
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn identifier_is_trimmed_before_lookup() {
        let (svc, _) = service();
        assert!(svc.login("  johndoe ", "password123").await.is_ok());
    }

    #[tokio::test]
    async fn repository_fault_is_internal() {
        let svc = AuthService::new(Arc::new(FailingRepo), make_keys("s", "i", "a")).unwrap();
        let err = svc.login("johndoe", "password123").await.unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
        assert_eq!(err.public_message(), "Server error during login");
    }
}
