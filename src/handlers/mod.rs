pub mod auth;
pub mod credential;
