//! Command implementations.

pub mod admin;
pub mod settings;
pub mod workflow;
