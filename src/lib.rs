pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::{build_router, AppState};

#[cfg(test)]
pub mod testing;
