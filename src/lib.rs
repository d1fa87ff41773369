pub mod config;
pub mod constants;
pub mod eara;
pub mod logging;
pub mod validation;
