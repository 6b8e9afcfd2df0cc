use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for identity service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a signed token.
    ///
    /// Unknown username and wrong password are deliberately collapsed into
    /// the same error so callers cannot probe which accounts exist.
    ///
    /// # Arguments
    /// * `username` - Raw login name from the request
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user or password mismatch
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, username: &str, password: &str) -> Result<String, UserError>;

    /// Create a new user record with a caller-supplied identifier.
    ///
    /// # Arguments
    /// * `command` - Validated command with plaintext password
    ///
    /// # Returns
    /// Created user entity (password already hashed)
    ///
    /// # Errors
    /// * `AlreadyExists` - Identifier is already taken
    /// * `UsernameAlreadyExists` - Login name is already taken
    /// * `PasswordHashing` - Hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn get_user(&self, id: UserId) -> Result<User, UserError>;

    /// Retrieve all user records.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Replace an existing user record (full-record semantics).
    ///
    /// The record read before the write supplies the concurrency token; a
    /// modification in between the two fails the update.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `ConcurrentModification` - Record changed between read and write
    /// * `UsernameAlreadyExists` - New login name is already taken
    /// * `PasswordHashing` - Hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn update_user(&self, id: UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete an existing user record.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn delete_user(&self, id: UserId) -> Result<(), UserError>;
}

/// Persistence operations for user records.
///
/// All mutating operations are durable before they return; a failed commit
/// leaves no partial write visible to subsequent reads.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user record.
    ///
    /// # Errors
    /// * `AlreadyExists` - Identifier is already taken
    /// * `UsernameAlreadyExists` - Login name is already taken
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by login name.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve all user records.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Replace an existing record, guarded by its concurrency token.
    ///
    /// The write only applies if the stored version still equals
    /// `expected_version`; the returned entity carries the bumped version.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `ConcurrentModification` - Stored version moved past `expected_version`
    /// * `UsernameAlreadyExists` - New login name is already taken
    /// * `DatabaseError` - Store operation failed
    async fn update(&self, user: User, expected_version: i64) -> Result<User, UserError>;

    /// Remove a user record.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn delete(&self, id: UserId) -> Result<(), UserError>;
}
