pub mod auth;
pub mod boxes;
pub mod suggestions;
