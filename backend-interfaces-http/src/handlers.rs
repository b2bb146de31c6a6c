pub mod ops_handlers;
pub mod upload_handlers;

pub use ops_handlers::*;
pub use upload_handlers::*;
