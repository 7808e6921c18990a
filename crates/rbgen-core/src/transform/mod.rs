pub mod build_model;
pub mod name_normalizer;

pub use build_model::build_model;
