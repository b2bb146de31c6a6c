// Domain value objects
pub mod upload_key;

pub use upload_key::*;
