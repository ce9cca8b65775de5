use serde_json::Value;
use studentportal_core::{ResourceId, StudentPortalApi, ViewState};
use studentportal_domain::{list_items, ApiError, Payload};
use tracing::info;

/// Opportunity listing with detail, save and apply actions
pub struct OpportunitiesScreen {
    api: StudentPortalApi,
    pub state: ViewState<Vec<Value>>,
}

impl OpportunitiesScreen {
    pub fn new(api: StudentPortalApi) -> Self {
        Self { api, state: ViewState::new() }
    }

    pub async fn load(&mut self) -> &ViewState<Vec<Value>> {
        self.state.load(fetch(&self.api)).await
    }

    pub async fn refresh(&mut self) -> &ViewState<Vec<Value>> {
        self.state.refresh(fetch(&self.api)).await
    }

    pub async fn detail(&self, id: ResourceId) -> Result<Payload, ApiError> {
        self.api.fetch_opportunity(id).await
    }

    pub async fn save(&self, id: ResourceId) -> Result<Payload, ApiError> {
        let saved = self.api.save_opportunity(id).await?;
        info!(opportunity_id = id, "opportunity saved");
        Ok(saved)
    }

    pub async fn apply(
        &self,
        id: ResourceId,
        cover_letter: Option<&str>,
    ) -> Result<Payload, ApiError> {
        let application = self.api.apply_for_opportunity(id, cover_letter).await?;
        info!(opportunity_id = id, "application submitted");
        Ok(application)
    }
}

async fn fetch(api: &StudentPortalApi) -> Result<Vec<Value>, ApiError> {
    Ok(list_items(&api.fetch_opportunities().await?))
}
