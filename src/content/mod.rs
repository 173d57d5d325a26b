mod collection;
mod ids;
mod memory_store;
mod models;
mod service;
mod sqlite_store;
mod store;

pub use collection::{MemoryCollection, SortDirection};
pub use ids::IdAllocator;
pub use memory_store::MemoryContentStore;
pub use models::{
    Event, Flyer, LiveStreamConfig, LiveStreamUpdate, PrayerRequest, Sermon, DEFAULT_PREACHER,
    PLACEHOLDER_SERMON_IMAGE,
};
pub use service::{
    ContentError, ContentService, EventPayload, FlyerPayload, PrayerRequestPayload, SermonPayload,
};
pub use sqlite_store::SqliteContentStore;
pub use store::{ContentStore, NewPrayerRequest, NewSermon};
