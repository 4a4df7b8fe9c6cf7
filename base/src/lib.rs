pub mod cli;
pub mod helpers;
pub mod traits;
pub mod types;
