//! Notifications shared by several use cases.

use crate::domain::{EndedSession, MessagePusher, OutboundEvent};

/// Tell the member that stayed behind that its session is over.
pub(super) async fn notify_session_ended(message_pusher: &dyn MessagePusher, ended: &EndedSession) {
    tracing::info!(
        "Session {} ended ({}) after {} ms",
        ended.session_id,
        ended.reason.as_str(),
        ended.duration_ms
    );
    let event = OutboundEvent::ChatEnded {
        reason: ended.reason,
    };
    if let Err(e) = message_pusher.push_to(&ended.remaining, &event).await {
        tracing::warn!(
            "Failed to notify '{}' that session {} ended: {}",
            ended.remaining,
            ended.session_id,
            e
        );
    }
}
