use serde_json::Value;
use studentportal_core::{ResourceId, StudentPortalApi, ViewState};
use studentportal_domain::{list_items, ApiError};
use tracing::debug;

use super::has_id;

pub struct NotificationsScreen {
    api: StudentPortalApi,
    pub state: ViewState<Vec<Value>>,
}

impl NotificationsScreen {
    pub fn new(api: StudentPortalApi) -> Self {
        Self { api, state: ViewState::new() }
    }

    pub async fn load(&mut self) -> &ViewState<Vec<Value>> {
        self.state.load(fetch(&self.api)).await
    }

    pub async fn refresh(&mut self) -> &ViewState<Vec<Value>> {
        self.state.refresh(fetch(&self.api)).await
    }

    /// Notifications without a truthy `read` flag
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.state
            .data
            .as_ref()
            .map_or(0, |items| items.iter().filter(|item| !is_read(item)).count())
    }

    /// Mark one notification read and flag it in the loaded list
    ///
    /// # Errors
    ///
    /// Any failure of the underlying call; the list is left untouched
    pub async fn mark_as_read(&mut self, id: ResourceId) -> Result<(), ApiError> {
        self.api.mark_notification_as_read(id).await?;

        if let Some(item) =
            self.state.data.as_mut().and_then(|items| items.iter_mut().find(|i| has_id(i, id)))
        {
            item["read"] = Value::Bool(true);
        }
        debug!(notification_id = id, "notification marked as read");
        Ok(())
    }
}

fn is_read(item: &Value) -> bool {
    item.get("read").and_then(Value::as_bool).unwrap_or(false)
}

async fn fetch(api: &StudentPortalApi) -> Result<Vec<Value>, ApiError> {
    Ok(list_items(&api.fetch_notifications().await?))
}
