//! # Student Portal Core
//!
//! Session contract of the student portal client - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces (`Transport`, `SessionStore`)
//! - The `SessionGuard` middleware and the `PortalClient` chokepoint
//! - The endpoint catalogue (`StudentPortalApi`)
//! - The screen fetch/refresh cycle (`ViewState`)
//!
//! ## Architecture Principles
//! - Only depends on `studentportal-domain`
//! - No HTTP, keychain or filesystem code
//! - All external dependencies via traits

pub mod client;
pub mod endpoints;
pub mod session;
pub mod transport;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{PortalClient, PortalClientBuilder};
pub use endpoints::{paths, ResourceId, StudentPortalApi};
pub use session::{Session, SessionGuard, SessionStore};
pub use transport::{HttpMethod, RawResponse, RequestEnvelope, Transport};
pub use view::ViewState;
