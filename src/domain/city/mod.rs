//! City aggregate

pub mod model;

pub use model::{City, CitySpecs};
