// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs behind jwt_auth_middleware and receives the
// authenticated identity as an `AuthUser` request extension.

pub mod movies;
pub mod reviews;
