pub mod browse;
pub mod collection;
pub mod error;
pub mod image;
pub mod snapshot;
pub mod subject;
