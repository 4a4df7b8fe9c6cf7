pub mod store;
pub mod timestamp;
