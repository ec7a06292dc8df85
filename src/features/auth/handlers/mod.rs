pub mod auth_handler;

pub use auth_handler::{auth_callback, auth_status, auth_url, logout};
