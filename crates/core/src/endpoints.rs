//! Endpoint catalogue
//!
//! Thin wrappers, one per backend route. Each one is a single call through
//! [`PortalClient`]; none of them looks at status codes or the session.

use std::sync::Arc;

use serde_json::Value;
use studentportal_domain::{ApiError, ApplicationRequest, Credential, Payload};

use crate::client::PortalClient;

/// Numeric identifier of a backend resource
pub type ResourceId = u64;

/// Relative paths, always with a trailing slash
pub mod paths {
    use super::ResourceId;

    pub const TOKEN: &str = "/token/";
    pub const TOKEN_REFRESH: &str = "/token/refresh/";
    pub const DASHBOARD: &str = "/dashboard/";
    pub const DASHBOARD_STATS: &str = "/dashboard/stats/";
    pub const USER_PROFILE: &str = "/user-profiles/my_profile/";
    pub const STUDENT_PROFILE: &str = "/student-profiles/my_student_profile/";
    pub const OPPORTUNITIES: &str = "/opportunities/";
    pub const SAVED_OPPORTUNITIES: &str = "/saved-opportunities/";
    pub const APPLICATIONS: &str = "/applications/";
    pub const NOTIFICATIONS: &str = "/notifications/";
    pub const SEMESTERS: &str = "/semesters/";
    pub const COURSE_UNITS: &str = "/course-units/";
    pub const GRADES: &str = "/grades/";
    pub const GPA: &str = "/grades/my_gpa/";
    pub const REPORTS: &str = "/reports/";

    #[must_use]
    pub fn opportunity(id: ResourceId) -> String {
        format!("{OPPORTUNITIES}{id}/")
    }

    #[must_use]
    pub fn save_opportunity(id: ResourceId) -> String {
        format!("{OPPORTUNITIES}{id}/save_opportunity/")
    }

    #[must_use]
    pub fn apply(id: ResourceId) -> String {
        format!("{OPPORTUNITIES}{id}/apply/")
    }

    #[must_use]
    pub fn saved_opportunity(id: ResourceId) -> String {
        format!("{SAVED_OPPORTUNITIES}{id}/")
    }

    #[must_use]
    pub fn application(id: ResourceId) -> String {
        format!("{APPLICATIONS}{id}/")
    }

    #[must_use]
    pub fn notification_read(id: ResourceId) -> String {
        format!("{NOTIFICATIONS}{id}/mark_read/")
    }
}

/// Typed surface over the student portal backend
#[derive(Clone)]
pub struct StudentPortalApi {
    client: Arc<PortalClient>,
}

impl StudentPortalApi {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &PortalClient {
        &self.client
    }

    // Session

    /// See [`PortalClient::authenticate`]
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        self.client.authenticate(username, password).await
    }

    /// See [`PortalClient::logout`]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.logout().await
    }

    /// See [`PortalClient::refresh_session`]
    pub async fn refresh_session(&self) -> Result<Credential, ApiError> {
        self.client.refresh_session().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.client.is_authenticated().await
    }

    // Dashboard

    pub async fn fetch_dashboard(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::DASHBOARD).await
    }

    pub async fn fetch_dashboard_stats(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::DASHBOARD_STATS).await
    }

    // Profiles

    pub async fn fetch_user_profile(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::USER_PROFILE).await
    }

    /// Partial update; only the fields present in `changes` are sent
    pub async fn update_user_profile(&self, changes: &Value) -> Result<Payload, ApiError> {
        self.client.patch(paths::USER_PROFILE, changes).await
    }

    pub async fn fetch_student_profile(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::STUDENT_PROFILE).await
    }

    pub async fn update_student_profile(&self, changes: &Value) -> Result<Payload, ApiError> {
        self.client.patch(paths::STUDENT_PROFILE, changes).await
    }

    // Opportunities

    pub async fn fetch_opportunities(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::OPPORTUNITIES).await
    }

    pub async fn fetch_opportunity(&self, id: ResourceId) -> Result<Payload, ApiError> {
        self.client.get(&paths::opportunity(id)).await
    }

    pub async fn save_opportunity(&self, id: ResourceId) -> Result<Payload, ApiError> {
        self.client.post_empty(&paths::save_opportunity(id)).await
    }

    /// Apply to an opportunity; a missing cover letter is sent as `""`
    pub async fn apply_for_opportunity(
        &self,
        id: ResourceId,
        cover_letter: Option<&str>,
    ) -> Result<Payload, ApiError> {
        self.client.post(&paths::apply(id), &ApplicationRequest::new(cover_letter)).await
    }

    pub async fn fetch_saved_opportunities(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::SAVED_OPPORTUNITIES).await
    }

    /// Un-save by saved-record id (not the opportunity id)
    pub async fn remove_saved_opportunity(&self, id: ResourceId) -> Result<Payload, ApiError> {
        self.client.delete(&paths::saved_opportunity(id)).await
    }

    // Applications

    pub async fn fetch_applications(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::APPLICATIONS).await
    }

    pub async fn fetch_application(&self, id: ResourceId) -> Result<Payload, ApiError> {
        self.client.get(&paths::application(id)).await
    }

    // Notifications

    pub async fn fetch_notifications(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::NOTIFICATIONS).await
    }

    /// Idempotent on the backend; calling twice is not an error
    pub async fn mark_notification_as_read(&self, id: ResourceId) -> Result<Payload, ApiError> {
        self.client.post_empty(&paths::notification_read(id)).await
    }

    // Academics

    pub async fn fetch_semesters(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::SEMESTERS).await
    }

    pub async fn fetch_course_units(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::COURSE_UNITS).await
    }

    pub async fn fetch_grades(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::GRADES).await
    }

    /// Record a grade; the body is passed through unvalidated
    pub async fn add_grade(&self, grade: &Value) -> Result<Payload, ApiError> {
        self.client.post(paths::GRADES, grade).await
    }

    pub async fn fetch_gpa(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::GPA).await
    }

    // Reports

    pub async fn fetch_reports(&self) -> Result<Payload, ApiError> {
        self.client.get(paths::REPORTS).await
    }

    pub async fn generate_report(&self, params: &Value) -> Result<Payload, ApiError> {
        self.client.post(paths::REPORTS, params).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use studentportal_domain::constants::TOKEN_KEY;

    use super::*;
    use crate::test_support::{InMemoryStore, ScriptedTransport};
    use crate::transport::{HttpMethod, AUTHORIZATION};

    fn api() -> (StudentPortalApi, Arc<ScriptedTransport>, Arc<InMemoryStore>) {
        let transport = Arc::new(ScriptedTransport::default());
        let store = Arc::new(InMemoryStore::default());
        let client = PortalClient::new(transport.clone(), store.clone());
        (StudentPortalApi::new(Arc::new(client)), transport, store)
    }

    #[test]
    fn test_parameterised_paths() {
        assert_eq!(paths::opportunity(7), "/opportunities/7/");
        assert_eq!(paths::save_opportunity(7), "/opportunities/7/save_opportunity/");
        assert_eq!(paths::apply(42), "/opportunities/42/apply/");
        assert_eq!(paths::saved_opportunity(5), "/saved-opportunities/5/");
        assert_eq!(paths::application(3), "/applications/3/");
        assert_eq!(paths::notification_read(9), "/notifications/9/mark_read/");
    }

    #[tokio::test]
    async fn test_every_call_carries_credential() {
        let (api, transport, store) = api();
        store.insert(TOKEN_KEY, "tok123");
        for _ in 0..4 {
            transport.push_response(200, "{}");
        }

        api.fetch_dashboard().await.unwrap();
        api.fetch_gpa().await.unwrap();
        api.save_opportunity(1).await.unwrap();
        api.remove_saved_opportunity(1).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        for request in requests {
            assert_eq!(request.header(AUTHORIZATION), Some("Bearer tok123"));
        }
    }

    #[tokio::test]
    async fn test_apply_sends_empty_cover_letter() {
        let (api, transport, _store) = api();
        transport.push_response(201, r#"{"id": 10, "status": "pending"}"#);

        let created = api.apply_for_opportunity(42, None).await.unwrap();

        assert_eq!(created["status"], "pending");
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.path, "/opportunities/42/apply/");
        assert_eq!(sent.body, Some(json!({"cover_letter": ""})));
    }

    #[tokio::test]
    async fn test_profile_update_is_partial_patch() {
        let (api, transport, _store) = api();
        transport.push_response(200, r#"{"first_name": "Ada"}"#);

        api.update_user_profile(&json!({"first_name": "Ada"})).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.path, "/user-profiles/my_profile/");
        assert_eq!(sent.body, Some(json!({"first_name": "Ada"})));
    }

    #[tokio::test]
    async fn test_mark_as_read_twice_succeeds() {
        let (api, transport, _store) = api();
        transport.push_response(200, r#"{"status": "ok"}"#);
        transport.push_response(200, r#"{"status": "ok"}"#);

        api.mark_notification_as_read(9).await.unwrap();
        api.mark_notification_as_read(9).await.unwrap();

        let requests = transport.requests();
        assert!(requests.iter().all(|r| r.path == "/notifications/9/mark_read/" && r.body.is_none()));
    }

    #[tokio::test]
    async fn test_delete_with_no_content() {
        let (api, transport, _store) = api();
        transport.push_response(204, "");

        let value = api.remove_saved_opportunity(5).await.unwrap();

        assert_eq!(value, Value::Null);
        assert_eq!(transport.requests()[0].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn test_expired_session_surfaces_from_wrapper() {
        let (api, transport, store) = api();
        store.insert(TOKEN_KEY, "tok123");
        transport.push_response(401, "");

        let result = api.fetch_grades().await;

        assert_eq!(result, Err(ApiError::SessionExpired));
        assert!(!api.is_authenticated().await);
    }
}
