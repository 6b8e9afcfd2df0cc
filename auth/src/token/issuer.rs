use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::Claims;
use super::errors::TokenError;

/// Lifetime of an issued credential.
pub const TOKEN_TTL_MINUTES: i64 = 120;

/// Issues signed, time-bounded identity credentials.
///
/// Built once at startup from configuration (signing secret, issuer and
/// audience identifiers) and shared immutably across requests.
/// Uses HS256 (HMAC with SHA-256).
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    audience: String,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `issuer` - Value for the `iss` claim
    /// * `audience` - Value for the `aud` claim
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], issuer: String, audience: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer,
            audience,
        }
    }

    /// Issue a signed credential for the given subject.
    ///
    /// Each call generates a fresh random `jti`, so two tokens issued for
    /// the same subject in the same instant remain distinguishable in logs.
    /// Expiry is fixed at [`TOKEN_TTL_MINUTES`] after issuance.
    ///
    /// # Arguments
    /// * `subject` - Login name asserted by the credential
    /// * `display_name` - Display name carried in the `name` claim
    ///
    /// # Returns
    /// Signed JWT string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, display_name: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            name: display_name.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a credential.
    ///
    /// Checks signature, expiry, issuer, and audience. Issuance is this
    /// component's only responsibility in the request path; decoding exists
    /// for downstream consumers and tests.
    ///
    /// # Arguments
    /// * `token` - JWT string to decode
    ///
    /// # Returns
    /// Decoded claim set
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `DecodingFailed` - Signature invalid, wrong issuer/audience, or malformed
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::DecodingFailed(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}
