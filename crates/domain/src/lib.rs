//! # Student Portal Domain
//!
//! Shared types for the student portal client.
//!
//! This crate contains:
//! - The client error taxonomy (`ApiError`) and local failures (`PortalError`)
//! - Credential types and login/refresh payloads
//! - Configuration structures
//! - Request payloads and list-unwrapping helpers
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O; pure data structures

pub mod config;
pub mod constants;
pub mod credential;
pub mod errors;
pub mod macros;
pub mod payload;

// Re-export commonly used items
pub use config::*;
pub use credential::*;
pub use errors::*;
pub use payload::*;
