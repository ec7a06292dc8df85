mod google_oauth_client;

pub use google_oauth_client::{GoogleOAuthClient, TokenResponse, GOOGLE_API_SCOPES};
