pub mod auth;
pub mod decode;

pub use auth::*;
pub use decode::*;
