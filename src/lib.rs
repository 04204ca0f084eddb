//! Lynlocke - two-player roster and matchup tracker
//!
//! The library exposes every module so the binary and the integration tests
//! share one implementation.

pub mod action;
pub mod config;
pub mod contacts;
pub mod effect;
pub mod error;
pub mod extract;
pub mod highlight;
pub mod mode;
pub mod persist;
pub mod reducer;
pub mod roster;
pub mod session;
pub mod state;
pub mod ui;
