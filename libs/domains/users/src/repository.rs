use async_trait::async_trait;

use crate::error::UserResult;
use crate::models::RegisterUser;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert `user` unless a user with the same email exists.
    ///
    /// Returns the new id, or `None` when the email was already taken.
    /// Must be atomic: concurrent calls with one email insert at most once.
    async fn insert_if_absent(&self, user: RegisterUser) -> UserResult<Option<String>>;
}
