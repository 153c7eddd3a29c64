pub mod auth;
pub mod boxes;
pub mod health;
pub mod suggestions;
