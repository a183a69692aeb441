//! JWT token verification
//!
//! Tokens are issued by the account service; the gateway only verifies them
//! and extracts the authenticated user ID.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use relay_core::Snowflake;
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as string)
    pub sub: String,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
    /// Optional role claim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    /// Parse the subject claim as a user ID
    ///
    /// # Errors
    /// Returns an error if the subject is not a valid numeric ID
    pub fn user_id(&self) -> Result<Snowflake, AuthError> {
        self.sub
            .parse::<i64>()
            .map(Snowflake::new)
            .map_err(|_| AuthError::InvalidSubject)
    }
}

/// JWT verification service
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create a new JWT service from a shared secret
    #[must_use]
    pub fn new(secret: &str, leeway: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return its claims
    ///
    /// # Errors
    /// Returns `AuthError::TokenExpired` for expired tokens,
    /// `AuthError::InvalidToken` for anything else that fails validation
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Verify a token and extract the authenticated user ID in one step
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or carries a
    /// non-numeric subject
    pub fn authenticate(&self, token: &str) -> Result<Snowflake, AuthError> {
        self.verify(token)?.user_id()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService").finish_non_exhaustive()
    }
}

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token subject is not a valid user ID")]
    InvalidSubject,

    #[error("Missing authentication token")]
    MissingToken,
}
