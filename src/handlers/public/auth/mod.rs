// handlers/public/auth/mod.rs - Account creation and token acquisition

pub mod signin; // POST /signin - authenticate and get JWT
pub mod signup; // POST /signup - create new account

pub use signin::signin;
pub use signup::signup;
