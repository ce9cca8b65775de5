//! Screen loaders
//!
//! Each screen owns a [`ViewState`] and knows which endpoint calls make up
//! its data. Calls that do not depend on each other run concurrently.
//!
//! [`ViewState`]: studentportal_core::ViewState

pub mod applications;
pub mod dashboard;
pub mod grades;
pub mod notifications;
pub mod opportunities;
pub mod profile;
pub mod saved;

use serde_json::Value;

pub use applications::ApplicationsScreen;
pub use dashboard::{DashboardData, DashboardScreen};
pub use grades::{GradeSection, GradesData, GradesScreen};
pub use notifications::NotificationsScreen;
pub use opportunities::OpportunitiesScreen;
pub use profile::{ProfileData, ProfileScreen};
pub use saved::SavedOpportunitiesScreen;

/// Whether a list item carries the given numeric `id`
pub(crate) fn has_id(item: &Value, id: u64) -> bool {
    item.get("id").and_then(Value::as_u64) == Some(id)
}
