pub mod collection;

// Re-export handler functions for use in routing
pub use collection::get as reviews_get;
pub use collection::post as reviews_post;
