use crate::{
    config::AuthConfig,
    database::UserStore,
    models::User,
    services::{password, token_signer::TokenSigner},
    utils::AuthError,
};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

// Request/Response structures
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// No field rules: an unknown email is 404 and any mismatching password is 422.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub token: String,
    pub email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub first_name: String,
    pub email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UpdateProfileResponse {
    pub token: String,
}

/// Register / login / profile update over a user store.
pub struct CredentialService {
    store: Arc<dyn UserStore>,
    signer: TokenSigner,
    bcrypt_cost: u32,
    update_requires_token: bool,
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserStore>, config: &AuthConfig) -> Self {
        Self {
            store,
            signer: TokenSigner::new(&config.jwt_secret),
            bcrypt_cost: config.bcrypt_cost,
            update_requires_token: config.update_requires_token,
        }
    }

    #[cfg(test)]
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub async fn store_available(&self) -> bool {
        self.store.ping().await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError> {
        request.validate()?;

        if self.store.find_by_email(&request.email).await?.is_some() {
            log::warn!("❌ Registration rejected, email already in use: {}", request.email);
            return Err(AuthError::Conflict);
        }

        let hashed_password = password::hash_password(&request.password, self.bcrypt_cost).await?;
        let new_user = User::new(
            &request.email,
            &request.first_name,
            &request.last_name,
            hashed_password,
        );

        // A concurrent register for the same email surfaces here as StoreError::Duplicate
        let user_id = self.store.insert(&new_user).await?;
        let token = self.signer.sign(&user_id)?;

        log::info!("✅ User registered successfully: {}", request.email);

        Ok(RegisterResponse {
            token,
            email: new_user.email,
        })
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = self
            .store
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !password::verify_password(&request.password, &user.password).await? {
            log::warn!("❌ Wrong password for: {}", request.email);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.signer.sign(&record_id(&user)?)?;

        Ok(LoginResponse {
            token,
            first_name: user.first_name,
            email: user.email,
        })
    }

    /// `email` comes from the request's `email` header and is trusted as-is unless
    /// `update_requires_token` is enabled, in which case `bearer` must belong to the same user.
    pub async fn update_profile(
        &self,
        email: Option<&str>,
        bearer: Option<&str>,
        request: &UpdateProfileRequest,
    ) -> Result<UpdateProfileResponse, AuthError> {
        request.validate()?;

        let email = email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AuthError::BadRequest("Email not found in the request headers".to_string()))?;

        let token_subject = if self.update_requires_token {
            let token = bearer
                .ok_or_else(|| AuthError::Unauthorized("Missing authorization token".to_string()))?;
            Some(self.signer.verify(token)?)
        } else {
            None
        };

        let existing = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if let Some(subject) = token_subject {
            if record_id(&existing)?.to_hex() != subject {
                log::warn!("❌ Token subject does not own profile: {}", email);
                return Err(AuthError::Unauthorized(
                    "Token does not belong to this user".to_string(),
                ));
            }
        }

        let updated = self
            .store
            .update_first_name(email, &request.name, BsonDateTime::now())
            .await?
            // Deleted between lookup and update
            .ok_or(AuthError::NotFound)?;

        let token = self.signer.sign(&record_id(&updated)?)?;

        log::info!("✅ Profile updated: {}", email);

        Ok(UpdateProfileResponse { token })
    }
}

fn record_id(user: &User) -> Result<ObjectId, AuthError> {
    user.id
        .ok_or_else(|| AuthError::Internal(format!("User record without _id: {}", user.email)))
}
