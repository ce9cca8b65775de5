use serde_json::Value;
use studentportal_core::{ResourceId, StudentPortalApi, ViewState};
use studentportal_domain::{list_items, ApiError};
use tracing::debug;

use super::has_id;

/// Saved opportunities; items are saved records wrapping an opportunity
pub struct SavedOpportunitiesScreen {
    api: StudentPortalApi,
    pub state: ViewState<Vec<Value>>,
}

impl SavedOpportunitiesScreen {
    pub fn new(api: StudentPortalApi) -> Self {
        Self { api, state: ViewState::new() }
    }

    pub async fn load(&mut self) -> &ViewState<Vec<Value>> {
        self.state.load(fetch(&self.api)).await
    }

    pub async fn refresh(&mut self) -> &ViewState<Vec<Value>> {
        self.state.refresh(fetch(&self.api)).await
    }

    /// Un-save by saved-record id and drop it from the loaded list
    ///
    /// # Errors
    ///
    /// Any failure of the underlying call; the list is left untouched
    pub async fn remove(&mut self, saved_id: ResourceId) -> Result<(), ApiError> {
        self.api.remove_saved_opportunity(saved_id).await?;

        if let Some(items) = self.state.data.as_mut() {
            items.retain(|item| !has_id(item, saved_id));
        }
        debug!(saved_id, "saved opportunity removed");
        Ok(())
    }
}

async fn fetch(api: &StudentPortalApi) -> Result<Vec<Value>, ApiError> {
    Ok(list_items(&api.fetch_saved_opportunities().await?))
}
