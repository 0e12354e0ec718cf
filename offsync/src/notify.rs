//! Push/notification boundary.
//!
//! An inbound push payload maps to a displayable notification; a click on
//! the notification (or any of its actions) focuses the application page,
//! opening it if no page is showing it. Pure mapping plus one registry
//! call; no state of its own.

use crate::lifecycle::{ClientPage, ClientRegistry};
use serde::{Deserialize, Serialize};
use url::Url;

/// Payload delivered by the push service. All fields optional; product
/// defaults fill the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// A user-visible alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    pub fn from_push(payload: &PushPayload) -> Self {
        Self {
            title: payload
                .title
                .clone()
                .unwrap_or_else(|| "농업용어 학습".to_string()),
            body: payload
                .body
                .clone()
                .unwrap_or_else(|| "새로운 학습 단어가 준비되었습니다!".to_string()),
            icon: "/static/images/icon-192x192.png".to_string(),
            badge: "/static/images/badge-72x72.png".to_string(),
            vibrate: vec![100, 50, 100],
            actions: payload.actions.clone(),
        }
    }
}

/// Route a notification click: focus an open application page or open one.
pub fn on_notification_click(registry: &ClientRegistry, app_url: &Url) -> ClientPage {
    registry.focus_or_open(app_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_empty_payload() {
        let notification = Notification::from_push(&PushPayload::default());
        assert!(!notification.title.is_empty());
        assert!(!notification.body.is_empty());
        assert_eq!(notification.vibrate, vec![100, 50, 100]);
        assert!(notification.actions.is_empty());
    }

    #[test]
    fn test_payload_overrides_defaults() {
        let payload: PushPayload = serde_json::from_str(
            r#"{"title": "복습 시간", "actions": [{"action": "open", "title": "열기"}]}"#,
        )
        .unwrap();
        let notification = Notification::from_push(&payload);
        assert_eq!(notification.title, "복습 시간");
        assert_eq!(notification.actions.len(), 1);
    }

    #[test]
    fn test_click_focuses_app_page() {
        let registry = ClientRegistry::new();
        let app_url = Url::parse("http://localhost:5000/mobile/improved").unwrap();
        registry.add(app_url.clone());

        let page = on_notification_click(&registry, &app_url);
        assert!(page.focused);
        assert_eq!(registry.len(), 1);
    }
}
