use super::collection::{MemoryCollection, SortDirection};
use super::ids::IdAllocator;
use super::models::{Event, Flyer, LiveStreamConfig, LiveStreamUpdate, PrayerRequest, Sermon};
use super::store::{ContentStore, NewPrayerRequest, NewSermon};
use anyhow::Result;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Process-lifetime content store. Every collection lives in a
/// `MemoryCollection` and identities come from the shared `IdAllocator`.
pub struct MemoryContentStore {
    events: MemoryCollection<Event>,
    sermons: MemoryCollection<Sermon>,
    flyers: MemoryCollection<Flyer>,
    prayer_requests: MemoryCollection<PrayerRequest>,
    prayer_sequence: AtomicI64,
    live_stream: Mutex<LiveStreamConfig>,
    ids: IdAllocator,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        MemoryContentStore {
            events: MemoryCollection::new(),
            sermons: MemoryCollection::new(),
            flyers: MemoryCollection::new(),
            prayer_requests: MemoryCollection::new(),
            prayer_sequence: AtomicI64::new(0),
            live_stream: Mutex::new(LiveStreamConfig::default()),
            ids: IdAllocator::new(),
        }
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for MemoryContentStore {
    fn add_event(&self, event: Event) -> Result<Event> {
        Ok(self.events.insert_one(event))
    }

    fn list_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.list_by_key(SortDirection::Ascending, |e| e.date))
    }

    fn add_sermon(&self, sermon: NewSermon) -> Result<Sermon> {
        Ok(self.sermons.insert_one(Sermon {
            id: self.ids.allocate(),
            title: sermon.title,
            preacher: sermon.preacher,
            date: sermon.date,
            video_url: sermon.video_url,
            image: sermon.image,
        }))
    }

    fn list_sermons(&self) -> Result<Vec<Sermon>> {
        Ok(self
            .sermons
            .list_by_key(SortDirection::Descending, |s| s.date))
    }

    fn delete_sermon(&self, id: &str) -> Result<bool> {
        Ok(self.sermons.remove_first(|s| s.id == id))
    }

    fn add_flyers(&self, images: Vec<String>) -> Result<usize> {
        let created_at = Utc::now();
        let batch: Vec<Flyer> = images
            .into_iter()
            .map(|image| Flyer {
                id: self.ids.allocate(),
                image,
                created_at,
            })
            .collect();
        Ok(self.flyers.insert_many(batch))
    }

    fn list_flyers(&self) -> Result<Vec<Flyer>> {
        Ok(self
            .flyers
            .list_by_key(SortDirection::Descending, |f| f.created_at))
    }

    fn delete_flyer(&self, id: &str) -> Result<bool> {
        Ok(self.flyers.remove_first(|f| f.id == id))
    }

    fn add_prayer_request(&self, request: NewPrayerRequest) -> Result<PrayerRequest> {
        let id = self.prayer_sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(self.prayer_requests.insert_one(PrayerRequest {
            id,
            name: request.name,
            email: request.email,
            request: request.request,
            timestamp: Utc::now(),
        }))
    }

    fn list_prayer_requests(&self) -> Result<Vec<PrayerRequest>> {
        Ok(self
            .prayer_requests
            .list_by_key(SortDirection::Descending, |r| r.timestamp))
    }

    fn get_live_stream(&self) -> Result<LiveStreamConfig> {
        Ok(self.live_stream.lock().unwrap().clone())
    }

    fn update_live_stream(&self, update: LiveStreamUpdate) -> Result<LiveStreamConfig> {
        let mut config = self.live_stream.lock().unwrap();
        *config = config.merged(update);
        Ok(config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn event(title: &str, on: &str) -> Event {
        Event {
            title: title.to_string(),
            date: date(on),
            description: "description".to_string(),
        }
    }

    fn sermon(title: &str, on: &str) -> NewSermon {
        NewSermon {
            title: title.to_string(),
            preacher: "Preacher".to_string(),
            date: date(on),
            video_url: "#".to_string(),
            image: "image".to_string(),
        }
    }

    #[test]
    fn events_come_back_ascending_by_date() {
        let store = MemoryContentStore::new();
        store.add_event(event("Youth Group Night", "2024-03-04")).unwrap();
        store.add_event(event("Community Potluck", "2024-02-28")).unwrap();
        store.add_event(event("Easter Sunday Service", "2024-03-31")).unwrap();

        let dates: Vec<NaiveDate> = store
            .list_events()
            .unwrap()
            .into_iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(
            dates,
            vec![date("2024-02-28"), date("2024-03-04"), date("2024-03-31")]
        );
    }

    #[test]
    fn sermons_come_back_descending_by_date() {
        let store = MemoryContentStore::new();
        store.add_sermon(sermon("Living with Purpose", "2024-01-14")).unwrap();
        store.add_sermon(sermon("The Book of John", "2024-01-21")).unwrap();
        store.add_sermon(sermon("Foundations of Faith", "2024-01-07")).unwrap();

        let titles: Vec<String> = store
            .list_sermons()
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(
            titles,
            vec!["The Book of John", "Living with Purpose", "Foundations of Faith"]
        );
    }

    #[test]
    fn sermon_deletion_by_id() {
        let store = MemoryContentStore::new();
        let stored = store.add_sermon(sermon("The Book of John", "2024-01-21")).unwrap();

        assert!(store.delete_sermon(&stored.id).unwrap());
        assert!(!store.delete_sermon(&stored.id).unwrap());
        assert!(store.list_sermons().unwrap().is_empty());
    }

    #[test]
    fn bulk_flyers_get_unique_ids_and_newest_first_order() {
        let store = MemoryContentStore::new();
        let count = store
            .add_flyers(vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
            ])
            .unwrap();
        assert_eq!(count, 3);

        let flyers = store.list_flyers().unwrap();
        assert_eq!(flyers.len(), 3);

        // All three created within the same instant must still have distinct ids.
        let mut ids: Vec<&str> = flyers.iter().map(|f| f.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(flyers.iter().all(|f| !f.id.is_empty()));

        // Equal timestamps fall back to insertion order.
        let images: Vec<String> = flyers.into_iter().map(|f| f.image).collect();
        assert_eq!(images, vec!["one", "two", "three"]);
    }

    #[test]
    fn deleting_unknown_flyer_leaves_collection_unchanged() {
        let store = MemoryContentStore::new();
        store.add_flyers(vec!["one".to_string()]).unwrap();

        assert!(!store.delete_flyer("never-issued").unwrap());
        assert_eq!(store.list_flyers().unwrap().len(), 1);
    }

    #[test]
    fn prayer_requests_get_sequential_ids() {
        let store = MemoryContentStore::new();
        let request = NewPrayerRequest {
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            request: "pray".to_string(),
        };
        let first = store.add_prayer_request(request.clone()).unwrap();
        let second = store.add_prayer_request(request).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.list_prayer_requests().unwrap().len(), 2);
    }

    #[test]
    fn live_stream_defaults_and_partial_merge() {
        let store = MemoryContentStore::new();
        assert_eq!(store.get_live_stream().unwrap(), LiveStreamConfig::default());

        store
            .update_live_stream(LiveStreamUpdate {
                video_id: Some("abc".to_string()),
                is_live: None,
            })
            .unwrap();
        let config = store
            .update_live_stream(LiveStreamUpdate {
                video_id: None,
                is_live: Some(true),
            })
            .unwrap();

        assert_eq!(config.video_id, "abc");
        assert!(config.is_live);
        assert_eq!(store.get_live_stream().unwrap(), config);
    }
}
