//!
//! # Token Service
//!
//! Issues and verifies the signed bearer tokens that represent sessions.
//! A token embeds the user id and expires 7 days after issuance. Issuing
//! appends the token to the user's list; the caller persists the user.
//! Revocation is not this service's concern: the authorization layer checks
//! list membership separately, so a structurally valid token can still be
//! dead.

use crate::error::AppError;
use crate::models::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_TTL_DAYS: i64 = 7;

/// Claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's unique identifier.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Fresh per-token id, so tokens issued in the same second are still
    /// distinct entries in the user's token list.
    pub jti: Uuid,
}

/// HS256 signer/verifier, built once from the configured secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for the user and appends it to their token list. There is
    /// no upper bound on concurrent sessions.
    pub fn issue(&self, user: &mut User) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::days(TOKEN_TTL_DAYS))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            exp: expiration,
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

        user.tokens.push(token.clone());
        Ok(token)
    }

    /// Checks signature and expiry and returns the embedded user id. Any
    /// failure converts to `AppError::Internal` via the `From` impl in
    /// `error.rs` (see the note there on the 500 mapping).
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims.sub)
    }
}
