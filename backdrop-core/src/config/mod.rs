//! Configuration loading and validation for the backdrop widget.

mod loader;
mod types;
mod validator;

pub use loader::ConfigLoader;
pub use types::*;
pub use validator::ConfigValidator;
