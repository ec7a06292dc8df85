pub mod auth;
pub mod repair;
