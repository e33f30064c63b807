use super::point::Point;
use serde::{Deserialize, Serialize};

/// Longest device name that is stored or uploaded.
pub const MAX_DEVICE_NAME_CHARS: usize = 100;

/// Length of the name derived from the host when nothing better is known.
const DEFAULT_NAME_CHARS: usize = 32;

/// Identity of this installation, persisted by a [`DeviceStore`](crate::services::DeviceStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    pub device_id: String,
    pub device_name: String,
}

impl DeviceProfile {
    /// A fresh profile with a random id.
    pub fn generate(device_name: &str) -> Self {
        Self {
            device_id: uuid::Uuid::new_v4().to_string(),
            device_name: truncate_chars(device_name, MAX_DEVICE_NAME_CHARS),
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.device_name = truncate_chars(name, MAX_DEVICE_NAME_CHARS);
    }

    /// Applies the canonical fields the presence service sent back. Returns true if anything changed.
    pub fn merge_remote(&mut self, remote: &RemoteDevice) -> bool {
        let mut changed = false;
        if let Some(id) = remote.device_id.as_deref().filter(|id| !id.is_empty()) {
            if id != self.device_id {
                self.device_id = id.to_string();
                changed = true;
            }
        }
        if let Some(name) = remote.device_name.as_deref() {
            let name = truncate_chars(name, MAX_DEVICE_NAME_CHARS);
            if name != self.device_name {
                self.device_name = name;
                changed = true;
            }
        }
        changed
    }
}

/// Name derived from the host, used on first run and by name detection.
pub fn default_device_name() -> String {
    let host = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "Unknown Device".to_string());
    truncate_chars(&host, DEFAULT_NAME_CHARS)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Body of `POST /api/me`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdate {
    pub device_id: String,
    pub device_name: String,
    pub location: Point,
}

/// The `me` record returned by the presence service. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDevice {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub location: Option<Point>,
}

/// Envelope `{ "me": ... }` used by both presence endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresenceEnvelope {
    #[serde(default)]
    pub me: Option<RemoteDevice>,
}
