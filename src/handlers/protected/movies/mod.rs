pub mod collection;
pub mod record;

// Re-export handler functions for use in routing
pub use collection::get as movies_get;
pub use collection::post as movies_post;
pub use collection::put as movies_put;
pub use collection::delete as movies_delete;
pub use collection::method_not_supported as movies_method_not_supported;

pub use record::get as movie_get;
