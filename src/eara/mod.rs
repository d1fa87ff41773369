pub mod config;
pub mod distributor;
pub mod engine;
pub mod error;
pub mod pacing;
pub mod pinned;
pub mod priority;
pub mod sequence;
pub mod summary;
pub mod types;
pub mod validator;
