//! Control-message protocol between the client and the engine.
//!
//! Messages are tagged JSON objects. Each message may carry a reply
//! channel on the client side; here a handled message simply yields an
//! optional `ControlReply`. Unknown message types deserialize to
//! `Unknown` and are ignored without error.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Force a waiting engine version to activate immediately. No reply.
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    /// Ask for the current namespace version tag.
    #[serde(rename = "GET_VERSION")]
    GetVersion,
    /// Delete all known cache namespaces regardless of version.
    #[serde(rename = "CLEAR_CACHE")]
    ClearCache,
    /// Anything else; silently ignored.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlReply {
    #[serde(rename = "VERSION")]
    Version { version: String },
    #[serde(rename = "CACHE_CLEARED")]
    CacheCleared { success: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let msg: ControlMessage =
            serde_json::from_str(r#"{"type": "SKIP_WAITING"}"#).unwrap();
        assert_eq!(msg, ControlMessage::SkipWaiting);

        let msg: ControlMessage =
            serde_json::from_str(r#"{"type": "GET_VERSION"}"#).unwrap();
        assert_eq!(msg, ControlMessage::GetVersion);

        let msg: ControlMessage =
            serde_json::from_str(r#"{"type": "CLEAR_CACHE"}"#).unwrap();
        assert_eq!(msg, ControlMessage::ClearCache);
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let msg: ControlMessage =
            serde_json::from_str(r#"{"type": "REFRESH_EVERYTHING"}"#).unwrap();
        assert_eq!(msg, ControlMessage::Unknown);
    }

    #[test]
    fn test_reply_wire_format() {
        let reply = ControlReply::Version {
            version: "v2".to_string(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "VERSION");
        assert_eq!(json["version"], "v2");

        let reply = ControlReply::CacheCleared { success: true };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "CACHE_CLEARED");
        assert_eq!(json["success"], true);
    }
}
