use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id reported for a server that has not been saved yet.
pub const NEW_SERVER_ID: i64 = -1;

// ── Enums ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaServerType {
    #[default]
    Emby,
    Jellyfin,
    Plex,
}

impl MediaServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emby => "emby",
            Self::Jellyfin => "jellyfin",
            Self::Plex => "plex",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Emby => "Emby",
            Self::Jellyfin => "Jellyfin",
            Self::Plex => "Plex",
        }
    }

    pub const ALL: &[MediaServerType] = &[Self::Emby, Self::Jellyfin, Self::Plex];
}

impl fmt::Display for MediaServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Payloads ──

fn default_enabled() -> bool {
    true
}

/// Body for creating (and testing) a media server. Also the live form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaServerCreate {
    pub name: String,
    pub server_type: MediaServerType,
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for MediaServerCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            server_type: MediaServerType::default(),
            url: String::new(),
            api_key: String::new(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaServerRead {
    pub id: i64,
    pub name: String,
    pub server_type: MediaServerType,
    pub url: String,
    pub api_key: String,
    pub enabled: bool,
    pub added_at: DateTime<Utc>,
}

impl MediaServerRead {
    /// Editable fields of a saved server.
    pub fn to_create(&self) -> MediaServerCreate {
        MediaServerCreate {
            name: self.name.clone(),
            server_type: self.server_type,
            url: self.url.clone(),
            api_key: self.api_key.clone(),
            enabled: self.enabled,
        }
    }
}

/// Partial update. Fields left as `None` are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaServerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_type: Option<MediaServerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl From<MediaServerCreate> for MediaServerUpdate {
    fn from(data: MediaServerCreate) -> Self {
        Self {
            name: Some(data.name),
            server_type: Some(data.server_type),
            url: Some(data.url),
            api_key: Some(data.api_key),
            enabled: Some(data.enabled),
        }
    }
}

// ── Navigation target ──

/// Which server the edit view is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerTarget {
    #[default]
    New,
    Existing(i64),
}

impl ServerTarget {
    /// Resolve a route parameter. Missing, unparsable or `-1` means "create".
    pub fn from_param(param: Option<&str>) -> Self {
        match param.and_then(|p| p.trim().parse::<i64>().ok()) {
            Some(id) => Self::from_id(id),
            None => Self::New,
        }
    }

    pub fn from_id(id: i64) -> Self {
        if id == NEW_SERVER_ID {
            Self::New
        } else {
            Self::Existing(id)
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::New => NEW_SERVER_ID,
            Self::Existing(id) => *id,
        }
    }
}

// ── Selection ──

/// Server derived from the snapshot and the targeted id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Existing(MediaServerRead),
    New,
}

impl Selection {
    pub fn id(&self) -> i64 {
        match self {
            Self::Existing(server) => server.id,
            Self::New => NEW_SERVER_ID,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }

    /// Form values for this selection. The placeholder is enabled with empty fields.
    pub fn form_data(&self) -> MediaServerCreate {
        match self {
            Self::Existing(server) => server.to_create(),
            Self::New => MediaServerCreate::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 4,
            "name": "Living Room",
            "server_type": "jellyfin",
            "url": "http://10.0.0.2:8096",
            "api_key": "abcdefghijkl",
            "enabled": false,
            "added_at": "2024-05-01T12:30:00Z"
        }"#
    }

    #[test]
    fn test_server_type_wire_names() {
        for t in MediaServerType::ALL {
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        let plex: MediaServerType = serde_json::from_str("\"plex\"").unwrap();
        assert_eq!(plex, MediaServerType::Plex);
        assert!(serde_json::from_str::<MediaServerType>("\"kodi\"").is_err());
    }

    #[test]
    fn test_read_deserializes() {
        let server: MediaServerRead = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(server.id, 4);
        assert_eq!(server.server_type, MediaServerType::Jellyfin);
        assert!(!server.enabled);
        assert_eq!(server.added_at.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn test_create_enabled_defaults_to_true() {
        let data: MediaServerCreate = serde_json::from_str(
            r#"{"name":"Den","server_type":"emby","url":"http://x","api_key":"0123456789"}"#,
        )
        .unwrap();
        assert!(data.enabled);
        assert!(MediaServerCreate::default().enabled);
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = MediaServerUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Renamed" }));
    }

    #[test]
    fn test_update_from_form_sets_every_field() {
        let update = MediaServerUpdate::from(MediaServerCreate {
            name: "Den".to_string(),
            server_type: MediaServerType::Plex,
            url: "https://plex.local".to_string(),
            api_key: "0123456789".to_string(),
            enabled: false,
        });
        assert_eq!(update.server_type, Some(MediaServerType::Plex));
        assert_eq!(update.enabled, Some(false));
        assert_eq!(update.url.as_deref(), Some("https://plex.local"));
    }

    #[test]
    fn test_target_from_param() {
        assert_eq!(ServerTarget::from_param(None), ServerTarget::New);
        assert_eq!(ServerTarget::from_param(Some("-1")), ServerTarget::New);
        assert_eq!(ServerTarget::from_param(Some("abc")), ServerTarget::New);
        assert_eq!(ServerTarget::from_param(Some("12")), ServerTarget::Existing(12));
        assert_eq!(ServerTarget::Existing(12).id(), 12);
        assert_eq!(ServerTarget::New.id(), NEW_SERVER_ID);
    }

    #[test]
    fn test_placeholder_selection_values() {
        let placeholder = Selection::New;
        assert_eq!(placeholder.id(), -1);
        let form = placeholder.form_data();
        assert!(form.enabled);
        assert!(form.name.is_empty());
        assert!(form.url.is_empty());
        assert!(form.api_key.is_empty());
    }
}
