use async_trait::async_trait;
use atria_core::{CoreError, Notification, NotificationSink};
use tracing::info;

/// Default sink: records the notification in the structured log. The real
/// delivery pipeline lives outside this service; delivery is best-effort
/// either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn enqueue(&self, notification: &Notification) -> Result<(), CoreError> {
        info!(
            user = notification.user_id.as_str(),
            kind = notification.kind.as_str(),
            title = %notification.title,
            "notification enqueued"
        );
        Ok(())
    }
}
