// Public API for integration tests and potential library usage

pub mod api;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod room;
pub mod tasks;
pub mod types;
pub mod words;
