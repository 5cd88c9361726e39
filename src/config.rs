//! configuration loading, validation and the process-wide instance
pub mod instance;
pub mod options;
pub mod validate;
