// Utility functions module
pub mod config;
pub mod env_file;
pub mod names;
