pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use error::{OwnpadError, Result};
pub use types::*;
