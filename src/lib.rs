// Library exports for the binary and integration tests
pub mod account_selector;
pub mod calendar;
pub mod commands;
pub mod config;
pub mod error;
pub mod github;
pub mod layout;
pub mod logging;
pub mod login;
pub mod logout;
pub mod progress;
pub mod renderer;
pub mod secrets;
pub mod session;
pub mod stats;
pub mod status;
pub mod timefmt;
pub mod validate;
pub mod window;
