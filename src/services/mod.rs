pub mod auth_service;
pub mod password;
pub mod token_signer;

pub use auth_service::CredentialService;
