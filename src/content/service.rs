use super::models::{
    Event, Flyer, LiveStreamConfig, LiveStreamUpdate, PrayerRequest, Sermon, DEFAULT_PREACHER,
    PLACEHOLDER_SERMON_IMAGE,
};
use super::store::{ContentStore, NewPrayerRequest, NewSermon};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    /// A required field is missing, empty, or malformed. Always recoverable,
    /// reported with the offending field.
    #[error("Missing or invalid required field: {field}")]
    Validation { field: &'static str },

    /// The delete target does not exist. A no-op with an explanation, not a
    /// fault.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// The backing store round-trip failed after startup. Recoverable at the
    /// operation level.
    #[error("Storage failure")]
    Persistence(#[source] anyhow::Error),
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SermonPayload {
    pub title: Option<String>,
    pub preacher: Option<String>,
    pub date: Option<String>,
    pub video_url: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyerPayload {
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequestPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub request: Option<String>,
}

fn require(field: &'static str, value: Option<String>) -> Result<String, ContentError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ContentError::Validation { field }),
    }
}

fn require_date(field: &'static str, value: Option<String>) -> Result<NaiveDate, ContentError> {
    require(field, value)?
        .parse()
        .map_err(|_| ContentError::Validation { field })
}

/// The façade in front of the content store: validates inbound payloads,
/// applies defaults, delegates to the store and translates its outcomes into
/// the error taxonomy. Performs no authorization checks itself.
pub struct ContentService {
    store: Arc<dyn ContentStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        ContentService { store }
    }

    pub fn list_events(&self) -> Result<Vec<Event>, ContentError> {
        self.store.list_events().map_err(ContentError::Persistence)
    }

    pub fn create_event(&self, payload: EventPayload) -> Result<Event, ContentError> {
        let event = Event {
            title: require("title", payload.title)?,
            date: require_date("date", payload.date)?,
            description: require("description", payload.description)?,
        };
        self.store.add_event(event).map_err(ContentError::Persistence)
    }

    pub fn list_sermons(&self) -> Result<Vec<Sermon>, ContentError> {
        self.store.list_sermons().map_err(ContentError::Persistence)
    }

    pub fn create_sermon(&self, payload: SermonPayload) -> Result<Sermon, ContentError> {
        let sermon = NewSermon {
            title: require("title", payload.title)?,
            preacher: payload
                .preacher
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PREACHER.to_string()),
            date: require_date("date", payload.date)?,
            video_url: require("videoUrl", payload.video_url)?,
            image: payload
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_SERMON_IMAGE.to_string()),
        };
        self.store.add_sermon(sermon).map_err(ContentError::Persistence)
    }

    pub fn delete_sermon(&self, id: &str) -> Result<(), ContentError> {
        match self.store.delete_sermon(id) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ContentError::NotFound { entity: "Sermon" }),
            Err(err) => Err(ContentError::Persistence(err)),
        }
    }

    pub fn list_flyers(&self) -> Result<Vec<Flyer>, ContentError> {
        self.store.list_flyers().map_err(ContentError::Persistence)
    }

    /// Creates a batch of flyers in one call. Returns the number created.
    pub fn create_flyers(&self, payloads: Vec<FlyerPayload>) -> Result<usize, ContentError> {
        let images = payloads
            .into_iter()
            .map(|p| require("image", p.image))
            .collect::<Result<Vec<String>, ContentError>>()?;
        self.store.add_flyers(images).map_err(ContentError::Persistence)
    }

    pub fn delete_flyer(&self, id: &str) -> Result<(), ContentError> {
        match self.store.delete_flyer(id) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ContentError::NotFound { entity: "Flyer" }),
            Err(err) => Err(ContentError::Persistence(err)),
        }
    }

    pub fn create_prayer_request(
        &self,
        payload: PrayerRequestPayload,
    ) -> Result<PrayerRequest, ContentError> {
        let request = NewPrayerRequest {
            name: require("name", payload.name)?,
            email: require("email", payload.email)?,
            request: require("request", payload.request)?,
        };
        self.store
            .add_prayer_request(request)
            .map_err(ContentError::Persistence)
    }

    pub fn list_prayer_requests(&self) -> Result<Vec<PrayerRequest>, ContentError> {
        self.store
            .list_prayer_requests()
            .map_err(ContentError::Persistence)
    }

    pub fn read_live_stream(&self) -> Result<LiveStreamConfig, ContentError> {
        self.store.get_live_stream().map_err(ContentError::Persistence)
    }

    pub fn update_live_stream(
        &self,
        update: LiveStreamUpdate,
    ) -> Result<LiveStreamConfig, ContentError> {
        self.store
            .update_live_stream(update)
            .map_err(ContentError::Persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryContentStore;

    fn make_service() -> ContentService {
        ContentService::new(Arc::new(MemoryContentStore::new()))
    }

    fn valid_sermon() -> SermonPayload {
        SermonPayload {
            title: Some("The Book of John".to_string()),
            preacher: None,
            date: Some("2024-01-21".to_string()),
            video_url: Some("https://example.com/v".to_string()),
            image: None,
        }
    }

    #[test]
    fn event_missing_field_is_rejected_with_field_name() {
        let service = make_service();
        let result = service.create_event(EventPayload {
            title: Some("Potluck".to_string()),
            date: Some("2024-02-28".to_string()),
            description: None,
        });
        match result {
            Err(ContentError::Validation { field }) => assert_eq!(field, "description"),
            other => panic!("Expected validation error, got {:?}", other.map(|e| e.title)),
        }
        assert!(service.list_events().unwrap().is_empty());
    }

    #[test]
    fn event_with_malformed_date_is_rejected() {
        let service = make_service();
        let result = service.create_event(EventPayload {
            title: Some("Potluck".to_string()),
            date: Some("not a date".to_string()),
            description: Some("Food".to_string()),
        });
        assert!(matches!(
            result,
            Err(ContentError::Validation { field: "date" })
        ));
    }

    #[test]
    fn event_accepts_unpadded_date() {
        let service = make_service();
        let event = service
            .create_event(EventPayload {
                title: Some("Potluck".to_string()),
                date: Some("2024-3-4".to_string()),
                description: Some("Food".to_string()),
            })
            .unwrap();
        assert_eq!(event.date, "2024-03-04".parse().unwrap());
    }

    #[test]
    fn sermon_missing_video_url_never_reaches_the_store() {
        let service = make_service();
        let mut payload = valid_sermon();
        payload.video_url = None;

        assert!(matches!(
            service.create_sermon(payload),
            Err(ContentError::Validation { field: "videoUrl" })
        ));
        assert!(service.list_sermons().unwrap().is_empty());
    }

    #[test]
    fn sermon_defaults_are_applied() {
        let service = make_service();
        let sermon = service.create_sermon(valid_sermon()).unwrap();
        assert_eq!(sermon.preacher, DEFAULT_PREACHER);
        assert_eq!(sermon.image, PLACEHOLDER_SERMON_IMAGE);
    }

    #[test]
    fn deleting_unknown_sermon_is_not_found() {
        let service = make_service();
        assert!(matches!(
            service.delete_sermon("missing"),
            Err(ContentError::NotFound { entity: "Sermon" })
        ));
    }

    #[test]
    fn flyer_without_image_rejects_the_whole_batch() {
        let service = make_service();
        let result = service.create_flyers(vec![
            FlyerPayload {
                image: Some("data".to_string()),
            },
            FlyerPayload { image: None },
        ]);
        assert!(matches!(
            result,
            Err(ContentError::Validation { field: "image" })
        ));
        assert!(service.list_flyers().unwrap().is_empty());
    }

    #[test]
    fn empty_email_prayer_request_is_rejected_before_storage() {
        let service = make_service();
        let result = service.create_prayer_request(PrayerRequestPayload {
            name: Some("A".to_string()),
            email: Some("".to_string()),
            request: Some("pray".to_string()),
        });
        assert!(matches!(
            result,
            Err(ContentError::Validation { field: "email" })
        ));
        assert!(service.list_prayer_requests().unwrap().is_empty());
    }
}
