pub mod movie;
pub mod review;
pub mod user;

pub use movie::{Movie, MovieWithReviews, NewMovie, MIN_ACTORS};
pub use review::{NewReview, Review};
pub use user::{NewUser, User};
