use crate::utils::AuthError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub id: String,
}

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user: TokenSubject,
    pub iat: i64, // issued at
}

/// Signs and verifies bearer tokens with the process-wide secret.
///
/// Tokens carry no `exp`: a valid signature is the only check.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, user_id: &ObjectId) -> Result<String, AuthError> {
        let claims = Claims {
            user: TokenSubject { id: user_id.to_hex() },
            iat: Utc::now().timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Returns the user id embedded in a token signed by this signer.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.user.id)
            .map_err(|e| AuthError::Unauthorized(format!("Invalid token: {}", e)))
    }
}
