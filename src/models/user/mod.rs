pub mod import;
pub mod queries;
pub mod types;

pub use import::*;
pub use queries::*;
pub use types::*;
