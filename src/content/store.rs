use super::models::{Event, Flyer, LiveStreamConfig, LiveStreamUpdate, PrayerRequest, Sermon};
use anyhow::Result;
use chrono::NaiveDate;

/// A validated sermon ready for insertion. Defaults have already been applied
/// by the content service; the store only assigns the identity.
#[derive(Clone, Debug)]
pub struct NewSermon {
    pub title: String,
    pub preacher: String,
    pub date: NaiveDate,
    pub video_url: String,
    pub image: String,
}

/// A validated prayer request ready for insertion. The store assigns the
/// sequential id and the timestamp.
#[derive(Clone, Debug)]
pub struct NewPrayerRequest {
    pub name: String,
    pub email: String,
    pub request: String,
}

/// Storage backend for every content collection and the live-stream
/// singleton.
///
/// The server works with either the in-memory `MemoryContentStore` or the
/// persistent `SqliteContentStore` transparently. Implementations perform no
/// validation, only persistence; required-field checks happen upstream in the
/// content service. Listing orders are fixed per collection and ties are
/// always broken by insertion order.
pub trait ContentStore: Send + Sync {
    /// Appends an event. Events are never updated or deleted.
    fn add_event(&self, event: Event) -> Result<Event>;

    /// Every event, ascending by calendar date.
    fn list_events(&self) -> Result<Vec<Event>>;

    /// Appends a sermon and assigns its identity.
    fn add_sermon(&self, sermon: NewSermon) -> Result<Sermon>;

    /// Every sermon, descending by calendar date.
    fn list_sermons(&self) -> Result<Vec<Sermon>>;

    /// Removes the sermon with the given id. Returns whether one was found;
    /// an absent id is not an error.
    fn delete_sermon(&self, id: &str) -> Result<bool>;

    /// Appends a batch of flyers, assigning each a unique identity. Returns
    /// the number created. The batch is applied as a whole: a failure leaves
    /// no partial batch behind.
    fn add_flyers(&self, images: Vec<String>) -> Result<usize>;

    /// Every flyer, newest first.
    fn list_flyers(&self) -> Result<Vec<Flyer>>;

    /// Removes the flyer with the given id. Returns whether one was found.
    fn delete_flyer(&self, id: &str) -> Result<bool>;

    /// Appends a prayer request, assigning its sequential id and timestamp.
    fn add_prayer_request(&self, request: NewPrayerRequest) -> Result<PrayerRequest>;

    /// Every prayer request, newest first.
    fn list_prayer_requests(&self) -> Result<Vec<PrayerRequest>>;

    /// The live-stream singleton, or its default if never written.
    fn get_live_stream(&self) -> Result<LiveStreamConfig>;

    /// Merges the provided fields into the singleton and returns the result.
    /// Omitted fields keep their previous value.
    fn update_live_stream(&self, update: LiveStreamUpdate) -> Result<LiveStreamConfig>;
}
