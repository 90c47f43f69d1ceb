// The binary in main.rs drives the terminal UI; everything else lives here so
// integration tests can exercise the interview and practice-test flows directly.

pub mod app;
pub mod capture;
pub mod config;
pub mod event;
pub mod interview;
pub mod quiz;
pub mod store;
pub mod ui;
