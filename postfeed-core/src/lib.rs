pub mod config;
pub mod error;
pub mod error_utils;
pub mod random;
pub mod store;
pub mod types;
mod validate;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use random::*;
pub use store::*;
pub use types::*;
