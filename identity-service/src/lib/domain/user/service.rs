use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Identity service orchestrator.
///
/// Composes the password hasher, token issuer, and user record store to
/// implement the login and account-mutation use cases. Holds no mutable
/// state of its own; everything shared lives behind the repository port.
pub struct UserService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_issuer` - Credential issuer built from configuration
    pub fn new(repository: Arc<R>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            token_issuer,
        }
    }
}

#[async_trait]
impl<R> UserServicePort for UserService<R>
where
    R: UserRepository,
{
    async fn login(&self, username: &str, password: &str) -> Result<String, UserError> {
        // A username that fails validation cannot exist in the store, so it
        // takes the same rejection path as an unknown one.
        let username =
            Username::new(username.to_string()).map_err(|_| UserError::InvalidCredentials)?;

        let user = self
            .repository
            .find_by_username(&username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.password_hasher.verify(password, &user.password_hash) {
            return Err(UserError::InvalidCredentials);
        }

        let token = self
            .token_issuer
            .issue(user.username.as_str(), &user.name)?;

        Ok(token)
    }

    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        // The identifier is caller-supplied, so uniqueness is checked
        // explicitly before insert; the store's constraints remain the
        // backstop against concurrent creates.
        if self.repository.find_by_id(command.id).await?.is_some() {
            return Err(UserError::AlreadyExists(command.id.0));
        }
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: command.id,
            name: command.name,
            last_name: command.last_name,
            username: command.username,
            password_hash,
            email: command.email,
            phone_number: command.phone_number,
            version: 0,
        };

        self.repository.create(user).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.0))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_user(
        &self,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.0))?;

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id,
            name: command.name,
            last_name: command.last_name,
            username: command.username,
            password_hash,
            email: command.email,
            phone_number: command.phone_number,
            version: existing.version,
        };

        // The version read above is the concurrency token; the repository
        // rejects the write if another request moved it in the meantime.
        self.repository.update(user, existing.version).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserError> {
        self.repository.delete(id).await
    }
}
