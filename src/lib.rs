pub mod collectors;
pub mod config;
pub mod errors;
pub mod exposition;
pub mod host;
pub mod logging;
pub mod runtime;
pub mod source;
