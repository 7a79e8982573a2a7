pub mod health;
pub mod auth;
pub mod swagger;
