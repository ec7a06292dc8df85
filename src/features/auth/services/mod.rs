pub mod auth_service;
pub mod session_store;
pub mod token_provider;

pub use auth_service::AuthService;
pub use session_store::{SessionCredentials, SessionStore};
pub use token_provider::{
    AccessTokenProvider, RefreshTokenProvider, ServiceAccountProvider, SessionTokenProvider,
};
