use std::env;
use thiserror::Error;

const DEFAULT_DATABASE_NAME: &str = "giftdb";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Settings the credential service needs at construction time.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    /// When set, `PUT /update` also demands a bearer token for the addressed user.
    pub update_requires_token: bool,
}

// Manual impl so the secret never shows up in logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("update_requires_token", &self.update_requires_token)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub cors_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => 3002,
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_name = database_name_from_uri(&database_url);

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => return Err(ConfigError::Invalid { key: "BCRYPT_COST", value: raw }),
            },
            None => 10,
        };

        let update_requires_token = match lookup("UPDATE_REQUIRES_TOKEN") {
            Some(raw) => parse_flag(&raw)
                .ok_or(ConfigError::Invalid { key: "UPDATE_REQUIRES_TOKEN", value: raw })?,
            None => false,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            database_name,
            cors_origins,
            auth: AuthConfig {
                jwt_secret,
                bcrypt_cost,
                update_requires_token,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Extract database name from the URI path, e.g. `mongodb://host/giftdb?retryWrites=true`
fn database_name_from_uri(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or(""))
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DATABASE_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost:27017"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3002);
        assert_eq!(config.database_name, "giftdb");
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert!(!config.auth.update_requires_token);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);
    }

    #[test]
    fn requires_secret_and_database() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "mongodb://db")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));

        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://db"),
            ("JWT_SECRET", ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn rejects_out_of_range_cost() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://db"),
            ("JWT_SECRET", "x"),
            ("BCRYPT_COST", "2"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BCRYPT_COST", .. }));
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb+srv://user:pw@cluster.example.net/gifts?retryWrites=true"),
            ("JWT_SECRET", "x"),
            ("PORT", "8080"),
            ("BCRYPT_COST", "4"),
            ("UPDATE_REQUIRES_TOKEN", "yes"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_name, "gifts");
        assert_eq!(config.auth.bcrypt_cost, 4);
        assert!(config.auth.update_requires_token);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn debug_output_hides_secret() {
        let auth = AuthConfig {
            jwt_secret: "top-secret".to_string(),
            bcrypt_cost: 4,
            update_requires_token: false,
        };
        assert!(!format!("{:?}", auth).contains("top-secret"));
    }
}
