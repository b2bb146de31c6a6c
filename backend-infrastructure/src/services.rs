pub mod dashboard_service;
pub mod retention_service;

pub use dashboard_service::*;
pub use retention_service::*;
