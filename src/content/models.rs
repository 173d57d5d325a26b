use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Preacher name used when a sermon is submitted without one.
pub const DEFAULT_PREACHER: &str = "Pastor John Jeremiah";

/// Cover image used when a sermon is submitted without one.
pub const PLACEHOLDER_SERMON_IMAGE: &str =
    "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?q=80&w=1220";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sermon {
    pub id: String,
    pub title: String,
    pub preacher: String,
    pub date: NaiveDate,
    pub video_url: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flyer {
    pub id: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub request: String,
    pub timestamp: DateTime<Utc>,
}

/// The one live-stream record. Reading before any write yields the default:
/// empty video id, not live.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamConfig {
    pub video_id: String,
    pub is_live: bool,
}

/// Partial update for the live-stream singleton. Fields left out keep their
/// previous value, they are never reset.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamUpdate {
    pub video_id: Option<String>,
    pub is_live: Option<bool>,
}

impl LiveStreamConfig {
    pub fn merged(&self, update: LiveStreamUpdate) -> LiveStreamConfig {
        LiveStreamConfig {
            video_id: update.video_id.unwrap_or_else(|| self.video_id.clone()),
            is_live: update.is_live.unwrap_or(self.is_live),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unspecified_fields() {
        let config = LiveStreamConfig {
            video_id: "abc".to_string(),
            is_live: false,
        };

        let merged = config.merged(LiveStreamUpdate {
            video_id: None,
            is_live: Some(true),
        });

        assert_eq!(merged.video_id, "abc");
        assert!(merged.is_live);
    }

    #[test]
    fn merge_on_default_config() {
        let merged = LiveStreamConfig::default().merged(LiveStreamUpdate {
            video_id: Some("xyz".to_string()),
            is_live: None,
        });

        assert_eq!(merged.video_id, "xyz");
        assert!(!merged.is_live);
    }

    #[test]
    fn camel_case_wire_format() {
        let sermon = Sermon {
            id: "1".to_string(),
            title: "Foundations of Faith".to_string(),
            preacher: DEFAULT_PREACHER.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            video_url: "#".to_string(),
            image: PLACEHOLDER_SERMON_IMAGE.to_string(),
        };

        let json = serde_json::to_value(&sermon).unwrap();
        assert!(json.get("videoUrl").is_some());
        assert_eq!(json.get("date").unwrap(), "2024-01-07");
    }
}
