use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Documento da collection "users"
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// bcrypt hash (salt embedded), never the raw password
    pub password: String,
    pub created_at: BsonDateTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<BsonDateTime>,
}

impl User {
    pub fn new(email: &str, first_name: &str, last_name: &str, password_hash: String) -> Self {
        Self {
            id: None,
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password: password_hash,
            created_at: BsonDateTime::now(),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn serializes_with_document_field_names() {
        let user = User::new("a@x.com", "A", "B", "$2b$04$hash".to_string());
        let doc = bson::to_document(&user).unwrap();

        assert!(!doc.contains_key("_id"));
        assert!(!doc.contains_key("updatedAt"));
        assert_eq!(doc.get_str("firstName").unwrap(), "A");
        assert_eq!(doc.get_str("lastName").unwrap(), "B");
        assert!(doc.get_datetime("createdAt").is_ok());
    }
}
