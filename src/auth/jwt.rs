//! JWT token codec
//!
//! Encodes a `(uid, level)` pair into a signed token and decodes it back.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::auth::types::JwtClaims;
use crate::config::AuthConfig;
use crate::error::{PortalError, Result};

/// JWT token codec
pub struct TokenCodec {
    /// Encoding key
    encoding_key: EncodingKey,
    /// Decoding key
    decoding_key: DecodingKey,
    /// Validation configuration
    validation: Validation,
    issuer: String,
    expires_in: i64,
}

impl TokenCodec {
    /// Create a codec from the auth configuration
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(PortalError::config("JWT secret must not be empty"));
        }
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: config.issuer.clone(),
            expires_in: config.token_expires_in,
        })
    }

    /// Encode `(uid, level)` into a signed token
    pub fn encode(&self, user_id: i32, level: i32) -> Result<String> {
        let claims = JwtClaims::new(user_id, level, &self.issuer, self.expires_in);
        self.encode_claims(&claims)
    }

    pub(crate) fn encode_claims(&self, claims: &JwtClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| PortalError::internal_with_source("Token generation failed", e))
    }

    /// Validate and parse a token into its claims
    pub fn validate(&self, token: &str) -> Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => PortalError::auth("Token expired"),
                _ => PortalError::auth_with_source("Token validation failed", e),
            })?;

        let claims = token_data.claims;
        if claims.is_expired() {
            return Err(PortalError::auth("Token expired"));
        }
        Ok(claims)
    }

    /// Decode a token back into `(uid, level)`
    pub fn decode(&self, token: &str) -> Result<(i32, i32)> {
        let claims = self.validate(token)?;
        Ok((claims.user_id()?, claims.level))
    }
}
