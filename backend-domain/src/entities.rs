// Domain entities
pub mod anomaly;
pub mod batch;
pub mod model;
pub mod upload;

pub use anomaly::*;
pub use batch::*;
pub use model::*;
pub use upload::*;
