mod auth_dto;

pub use auth_dto::{
    AuthCallbackQuery, AuthCallbackResponse, AuthStatusResponse, AuthUrlResponse, LogoutResponse,
};
