pub mod grouping;
pub mod queries;
pub mod types;

pub use grouping::*;
pub use queries::*;
pub use types::*;
