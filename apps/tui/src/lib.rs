// Export our modules for use in the binary and tests
pub mod app;
pub mod cli;
pub mod config;
pub mod crews;
pub mod domain;
pub mod event;
pub mod location;
pub mod store;
pub mod terminal;
pub mod ui;
pub mod weather;

pub use domain::{CleanupEvent, Crew, Spot, UserLocation};
