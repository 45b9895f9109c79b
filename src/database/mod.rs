pub mod manager;
pub mod memory;
pub mod models;
pub mod password;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{AggregateQuery, HealthCheck, MovieStore, ReviewStore, StoreError, UserStore};
