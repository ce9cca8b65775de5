//! Fetch/refresh cycle shared by every screen
//!
//! A screen starts out loading, stores either data or a user-facing error,
//! and keeps showing its previous data when a refresh fails.

use std::future::Future;

use studentportal_domain::ApiError;
use tracing::debug;

/// Loading state of a single screen
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<ApiError>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self { data: None, loading: true, refreshing: false, error: None }
    }
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Await `fetch` and record its outcome. Always ends with `loading = false`.
    pub async fn load<F>(&mut self, fetch: F) -> &mut Self
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.loading = true;
        match fetch.await {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => {
                debug!(error = %err, "screen load failed");
                self.error = Some(err);
            }
        }
        self.loading = false;
        self
    }

    /// Pull-to-refresh: like [`Self::load`] with `refreshing` set meanwhile
    pub async fn refresh<F>(&mut self, fetch: F) -> &mut Self
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.refreshing = true;
        self.load(fetch).await;
        self.refreshing = false;
        self
    }

    /// Data of the last load, or the error it failed with
    ///
    /// # Errors
    ///
    /// The stored failure, or `Decode` when nothing has been loaded yet
    pub fn result(&self) -> Result<&T, ApiError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.data.as_ref().ok_or_else(|| ApiError::Decode("nothing has been loaded yet".to_string()))
    }

    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ApiError::user_message)
    }

    /// Whether the last failure means the caller must route to login
    #[must_use]
    pub fn session_expired(&self) -> bool {
        self.error.as_ref().is_some_and(ApiError::is_session_expired)
    }
}
