//! Player profiles
//!
//! - `types`: profile data, name validation and error types
//! - `store`: ProfileStore for file operations

pub mod store;
pub mod types;

pub use store::ProfileStore;
pub use types::*;
