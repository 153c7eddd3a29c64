pub mod auth;
pub mod json;
pub mod response;

pub use auth::resolve_actor;
pub use json::ValidJson;
pub use response::{ApiResponse, ApiResult};
