pub mod cli;
pub mod commands;
pub mod error;
pub mod gcp;
pub mod ops;
pub mod prompt;
pub mod resource;
pub mod types;
