use std::fmt;
use std::str::FromStr;

use crate::user::errors::EmailError;
use crate::user::errors::FieldError;
use crate::user::errors::UsernameError;

/// User identity record.
///
/// `password_hash` always holds an Argon2 PHC string, never a plaintext
/// password; hashing happens in the domain service before the record is
/// handed to the repository. `version` is the optimistic-concurrency token
/// and never leaves the service boundary.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub last_name: String,
    pub username: Username,
    pub password_hash: String,
    pub email: EmailAddress,
    pub phone_number: i64,
    pub version: i64,
}

/// User unique identifier type.
///
/// Caller-supplied on creation, immutable afterwards. The store never
/// auto-assigns identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login name value type
///
/// Ensures the name is non-empty and at most 20 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 20;

    /// Create a new valid username.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `TooLong` - Username longer than 20 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.is_empty() {
            return Err(UsernameError::Empty);
        }
        let length = username.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(username))
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates format with an RFC 5322 compliant parser and caps length at
/// 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 100;

    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `TooLong` - Email longer than 100 characters
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Maximum display name length.
pub const NAME_MAX_LENGTH: usize = 30;
/// Maximum last name length.
pub const LAST_NAME_MAX_LENGTH: usize = 50;
/// Maximum plaintext password length. An explicit input rule: the stored
/// column is sized by the hash, not the plaintext.
pub const PASSWORD_MAX_LENGTH: usize = 200;

fn required(field: &'static str, value: String, max: usize) -> Result<String, FieldError> {
    if value.is_empty() {
        return Err(FieldError::Empty { field });
    }
    let length = value.chars().count();
    if length > max {
        return Err(FieldError::TooLong {
            field,
            max,
            actual: length,
        });
    }
    Ok(value)
}

/// Command to create a new user record.
///
/// Carries the caller-supplied identifier and the plaintext password; the
/// service hashes the password before anything is persisted.
#[derive(Debug)]
pub struct CreateUserCommand {
    pub id: UserId,
    pub name: String,
    pub last_name: String,
    pub username: Username,
    pub password: String,
    pub email: EmailAddress,
    pub phone_number: i64,
}

impl CreateUserCommand {
    /// Construct a create command, validating the plain string fields.
    ///
    /// # Errors
    /// * `FieldError` - A field is empty or exceeds its length limit
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: UserId,
        name: String,
        last_name: String,
        username: Username,
        password: String,
        email: EmailAddress,
        phone_number: i64,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            id,
            name: required("name", name, NAME_MAX_LENGTH)?,
            last_name: required("lastName", last_name, LAST_NAME_MAX_LENGTH)?,
            username,
            password: required("password", password, PASSWORD_MAX_LENGTH)?,
            email,
            phone_number,
        })
    }
}

/// Command to replace an existing user record.
///
/// Full-replace semantics: every field is required, the password is always
/// re-hashed. The target identifier travels separately (from the path).
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub name: String,
    pub last_name: String,
    pub username: Username,
    pub password: String,
    pub email: EmailAddress,
    pub phone_number: i64,
}

impl UpdateUserCommand {
    /// Construct an update command, validating the plain string fields.
    ///
    /// # Errors
    /// * `FieldError` - A field is empty or exceeds its length limit
    pub fn new(
        name: String,
        last_name: String,
        username: Username,
        password: String,
        email: EmailAddress,
        phone_number: i64,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            name: required("name", name, NAME_MAX_LENGTH)?,
            last_name: required("lastName", last_name, LAST_NAME_MAX_LENGTH)?,
            username,
            password: required("password", password, PASSWORD_MAX_LENGTH)?,
            email,
            phone_number,
        })
    }
}
