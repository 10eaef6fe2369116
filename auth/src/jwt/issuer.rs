use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::TokenError;

/// Session token issuer.
///
/// Signs and validates compact HS256 tokens carrying a subject and an
/// absolute expiry. The secret is only used to derive the signing keys and is
/// never embedded in a token.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenIssuer {
    /// Create a new token issuer with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key, shared by every instance of the service
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Anyone holding the secret can forge tokens for any subject
    pub fn new(secret: &[u8]) -> Self {
        let algorithm = Algorithm::HS256;

        // Expiry is checked by `validate_at` against an explicit clock, with
        // no leeway.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
        }
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    ///
    /// # Errors
    /// * `Signing` - Token encoding failed
    pub fn issue(&self, subject: impl ToString, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// Identical subject, ttl and `now` produce identical tokens.
    pub fn issue_at(
        &self,
        subject: impl ToString,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims::new(subject, ttl, now);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token against the current clock and return its subject.
    ///
    /// # Errors
    /// * `Malformed` - Token structure, encoding, algorithm or payload is invalid
    /// * `InvalidSignature` - Signature does not match the secret
    /// * `Expired` - Expiry is at or before the current time
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate a token against `now` (Unix timestamp) and return its subject.
    ///
    /// Structure and signature are checked before expiry, so an expired token
    /// with a bad signature reports `InvalidSignature`.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<String, TokenError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;

        if token_data.claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims.sub)
    }
}
