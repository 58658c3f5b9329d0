pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use dtos::{ApiResponse, ErrorResponse};
pub use errors::ApiError;
pub use middleware::{AuthMiddleware, AuthUser, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{ApiDependencies, configure_routes};
