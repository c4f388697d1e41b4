//! Library entry for crewdesk exposing the table engine for integration tests.

pub mod config;
pub mod dialer;
pub mod logic;
pub mod session;
pub mod sources;
pub mod state;
pub mod util;
