use serde_json::Value;
use studentportal_core::{ResourceId, StudentPortalApi, ViewState};
use studentportal_domain::{list_items, ApiError, Payload};

pub struct ApplicationsScreen {
    api: StudentPortalApi,
    pub state: ViewState<Vec<Value>>,
}

impl ApplicationsScreen {
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
        self.api.fetch_application(id).await
    }
}

async fn fetch(api: &StudentPortalApi) -> Result<Vec<Value>, ApiError> {
    Ok(list_items(&api.fetch_applications().await?))
}
