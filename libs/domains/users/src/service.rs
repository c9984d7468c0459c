use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::UserResult;
use crate::models::{RegisterUser, RegistrationOutcome};
use crate::repository::UserRepository;

pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Idempotent by email: a second registration is acknowledged without writing.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterUser) -> UserResult<RegistrationOutcome> {
        input.validate()?;

        match self.repository.insert_if_absent(input).await? {
            Some(id) => {
                tracing::info!(user_id = %id, "User registered");
                Ok(RegistrationOutcome::created(id))
            }
            None => {
                tracing::info!("Registration skipped, email already present");
                Ok(RegistrationOutcome::already_exists())
            }
        }
    }
}
