use serde::Serialize;
use studentportal_core::{StudentPortalApi, ViewState};
use studentportal_domain::{ApiError, Payload};

/// Dashboard summary plus its headline statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub dashboard: Payload,
    pub stats: Payload,
}

pub struct DashboardScreen {
    api: StudentPortalApi,
    pub state: ViewState<DashboardData>,
}

impl DashboardScreen {
    pub fn new(api: StudentPortalApi) -> Self {
        Self { api, state: ViewState::new() }
    }

    pub async fn load(&mut self) -> &ViewState<DashboardData> {
        self.state.load(fetch(&self.api)).await
    }

    pub async fn refresh(&mut self) -> &ViewState<DashboardData> {
        self.state.refresh(fetch(&self.api)).await
    }
}

async fn fetch(api: &StudentPortalApi) -> Result<DashboardData, ApiError> {
    let (dashboard, stats) =
        futures::try_join!(api.fetch_dashboard(), api.fetch_dashboard_stats())?;
    Ok(DashboardData { dashboard, stats })
}
