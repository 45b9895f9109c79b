// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Signup and signin are the only way to obtain a token; the root path and
// health probe round out the unauthenticated surface.

pub mod auth;
pub mod root;

pub use auth::*;
pub use root::{health, route_not_supported};
