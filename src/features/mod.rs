// Bot setup features
pub mod bootstrap;
