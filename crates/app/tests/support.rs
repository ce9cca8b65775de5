//! Shared helpers for app integration tests.

use serde_json::json;
use studentportal_app::AppContext;
use studentportal_domain::{ClientConfig, Config, SessionBackend};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_TOKEN: &str = "access-abc";

/// Context pointed at `<server>/api` with an in-memory session.
pub fn context(server: &MockServer) -> AppContext {
    let mut config = Config::default();
    config.api = ClientConfig::with_base_url(format!("{}/api", server.uri()));
    config.session.backend = SessionBackend::Memory;
    AppContext::from_config(config).expect("context should build")
}

/// Context that has already logged in as `ada`.
pub async fn logged_in_context(server: &MockServer) -> AppContext {
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": ACCESS_TOKEN, "refresh": "refresh-abc" })),
        )
        .mount(server)
        .await;

    let context = context(server);
    context.api.login("ada", "secret").await.expect("login should succeed");
    context
}
