//! In-memory user directory backing the identity resolver.

use async_trait::async_trait;
use jwt_auth::{IdentityResolver, ResolverError};
use moka::future::Cache;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
}

#[derive(Clone)]
pub struct UserDirectory {
    cache: Cache<String, User>,
}

impl UserDirectory {
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::new(capacity),
        }
    }

    /// Directory pre-populated with a few demo accounts.
    pub async fn seeded() -> Self {
        let directory = Self::new(1_000);
        for (id, name, role) in [
            ("user-42", "Alice", "admin"),
            ("user-7", "Bob", "member"),
        ] {
            directory
                .insert(User {
                    id: id.to_string(),
                    name: name.to_string(),
                    role: role.to_string(),
                })
                .await;
        }
        directory
    }

    pub async fn insert(&self, user: User) {
        self.cache.insert(user.id.clone(), user).await;
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.cache.get(id).await
    }
}

#[async_trait]
impl IdentityResolver for UserDirectory {
    type Identity = User;

    async fn resolve(&self, subject: &str) -> Result<Option<User>, ResolverError> {
        Ok(self.get(subject).await)
    }
}
