use super::MongoDB;
use crate::models::User;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            StoreError::Duplicate(err.to_string())
        } else {
            StoreError::Database(err.to_string())
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// Persistence for user records, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a new record and returns its generated id.
    /// Fails with `StoreError::Duplicate` when the email is already taken.
    async fn insert(&self, user: &User) -> Result<ObjectId, StoreError>;

    /// Atomically sets `firstName`/`updatedAt` and returns the document after the update.
    async fn update_first_name(
        &self,
        email: &str,
        first_name: &str,
        updated_at: BsonDateTime,
    ) -> Result<Option<User>, StoreError>;

    async fn ping(&self) -> bool;
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = self.users().find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn insert(&self, user: &User) -> Result<ObjectId, StoreError> {
        let result = self.users().insert_one(user).await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Database("inserted _id is not an ObjectId".to_string()))
    }

    async fn update_first_name(
        &self,
        email: &str,
        first_name: &str,
        updated_at: BsonDateTime,
    ) -> Result<Option<User>, StoreError> {
        let update = doc! {
            "$set": {
                "firstName": first_name,
                "updatedAt": updated_at,
            }
        };

        let user = self
            .users()
            .find_one_and_update(doc! { "email": email }, update)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(user)
    }

    async fn ping(&self) -> bool {
        self.health_check().await
    }
}
