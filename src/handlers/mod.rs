// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth via jwt_auth_middleware)

pub mod protected;
pub mod public;
