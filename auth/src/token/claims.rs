use serde::Deserialize;
use serde::Serialize;

/// Claim set carried by an issued credential.
///
/// Standard RFC 7519 claims plus the `name` claim asserting the holder's
/// display name. Every field is populated at issuance; nothing is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (login name)
    pub sub: String,

    /// Display name of the subject
    pub name: String,

    /// JWT ID (unique per issued token)
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl Claims {
    /// Check if the claim set is expired at the given instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Claims {
        Claims {
            sub: "ana".to_string(),
            name: "Ana".to_string(),
            jti: "b3b0c440-9c1b-4b4f-8d89-3a3f5c1f0001".to_string(),
            iat: 900,
            exp: 1000,
            iss: "pos-backend".to_string(),
            aud: "pos-clients".to_string(),
        }
    }

    #[test]
    fn test_is_expired() {
        let claims = sample();

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001));
    }
}
