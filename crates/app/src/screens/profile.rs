use serde::Serialize;
use serde_json::Value;
use studentportal_core::{StudentPortalApi, ViewState};
use studentportal_domain::{ApiError, Payload};

/// Account profile and student record, shown together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileData {
    pub user: Payload,
    pub student: Payload,
}

pub struct ProfileScreen {
    api: StudentPortalApi,
    pub state: ViewState<ProfileData>,
}

impl ProfileScreen {
    pub fn new(api: StudentPortalApi) -> Self {
        Self { api, state: ViewState::new() }
    }

    pub async fn load(&mut self) -> &ViewState<ProfileData> {
        self.state.load(fetch(&self.api)).await
    }

    pub async fn refresh(&mut self) -> &ViewState<ProfileData> {
        self.state.refresh(fetch(&self.api)).await
    }

    /// Patch the account profile and keep the loaded copy in sync
    ///
    /// # Errors
    ///
    /// Any failure of the underlying call
    pub async fn update_user(&mut self, changes: &Value) -> Result<Payload, ApiError> {
        let updated = self.api.update_user_profile(changes).await?;
        if let Some(data) = self.state.data.as_mut() {
            data.user = updated.clone();
        }
        Ok(updated)
    }

    /// Patch the student record and keep the loaded copy in sync
    ///
    /// # Errors
    ///
    /// Any failure of the underlying call
    pub async fn update_student(&mut self, changes: &Value) -> Result<Payload, ApiError> {
        let updated = self.api.update_student_profile(changes).await?;
        if let Some(data) = self.state.data.as_mut() {
            data.student = updated.clone();
        }
        Ok(updated)
    }
}

async fn fetch(api: &StudentPortalApi) -> Result<ProfileData, ApiError> {
    let (user, student) =
        futures::try_join!(api.fetch_user_profile(), api.fetch_student_profile())?;
    Ok(ProfileData { user, student })
}
