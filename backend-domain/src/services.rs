// Domain services
pub mod detector;
pub mod forest;
pub mod preprocess;

pub use detector::*;
pub use forest::*;
pub use preprocess::*;
