pub mod repository;
pub mod types;

pub use repository::Model;
pub use types::*;
