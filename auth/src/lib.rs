//! Authentication utilities library
//!
//! Provides the credential infrastructure for the point-of-sale backend:
//! - Password hashing (Argon2id)
//! - Signed, time-bounded token issuance (JWT, HS256)
//!
//! The service defines its own domain traits and adapts these implementations,
//! keeping crypto concerns out of the domain layer.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Token Issuance
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     "pos-backend".to_string(),
//!     "pos-clients".to_string(),
//! );
//! let token = issuer.issue("ana", "Ana").unwrap();
//! let claims = issuer.decode(&token).unwrap();
//! assert_eq!(claims.sub, "ana");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenIssuer;
pub use token::TOKEN_TTL_MINUTES;
