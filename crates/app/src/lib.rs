//! # Student Portal App
//!
//! Command-line front end for the student portal.
//!
//! - `cli`: argument parsing and command dispatch
//! - `context`: configuration loading and client wiring
//! - `screens`: per-screen loaders built on the endpoint catalogue
//! - `utils`: logging setup

pub mod cli;
pub mod context;
pub mod screens;
pub mod utils;

pub use context::AppContext;
