use std::collections::HashSet;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::password::hash_password;
use crate::auth::repo_types::{Role, User};

/// Read access to user records. Implementations must treat "not found" as
/// `Ok(None)`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive match against username or email.
    async fn find_by_identifier(&self, identifier: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>>;
}

/// Fixed set of accounts built once at startup.
pub struct InMemoryUserRepository {
    users: Vec<User>,
}

impl InMemoryUserRepository {
    pub fn new(users: Vec<User>) -> anyhow::Result<Self> {
        let mut usernames = HashSet::new();
        let mut emails = HashSet::new();
        for u in &users {
            anyhow::ensure!(
                usernames.insert(u.username.as_str()),
                "duplicate username {}",
                u.username
            );
            anyhow::ensure!(emails.insert(u.email.as_str()), "duplicate email {}", u.email);
        }
        Ok(Self { users })
    }

    /// Demo accounts, all sharing one hash of `password`.
    pub fn seeded(password: &str) -> anyhow::Result<Self> {
        let hash = hash_password(password)?;
        let now = OffsetDateTime::now_utc();
        let seed = |id: &str, username: &str, email: &str, full_name: &str| User {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            password_hash: hash.clone(),
            full_name: full_name.into(),
            role: Role::User,
            created_at: now,
        };
        Self::new(vec![
            seed("1", "johndoe", "john@example.com", "John Doe"),
            seed("2", "janedoe", "jane@example.com", "Jane Doe"),
        ])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_identifier(&self, identifier: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}
