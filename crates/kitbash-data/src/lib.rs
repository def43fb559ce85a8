pub mod catalog;
pub mod loader;
pub mod schema;

pub use catalog::{load_catalog, Catalog};
pub use loader::DataLoadError;
