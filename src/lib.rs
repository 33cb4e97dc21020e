//! lazypanes library crate
//!
//! Exposes the context framework and the application shell so integration
//! tests and benchmarks can drive the UI without a terminal.

pub mod app;
pub mod config;
pub mod context;
pub mod contexts;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod ui;
pub mod util;
