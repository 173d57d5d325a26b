use super::models::{Event, Flyer, LiveStreamConfig, LiveStreamUpdate, PrayerRequest, Sermon};
use super::store::{ContentStore, NewPrayerRequest, NewSermon};
use crate::sqlite_persistence::{Table, VersionedSchema, BASE_DB_VERSION};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// V 0
const EVENT_TABLE_V_0: Table = Table {
    name: "event",
    schema: "CREATE TABLE event (id INTEGER PRIMARY KEY, title TEXT NOT NULL, date TEXT NOT NULL, description TEXT NOT NULL);",
    indices: &["CREATE INDEX event_date_index ON event (date);"],
};
const SERMON_TABLE_V_0: Table = Table {
    name: "sermon",
    schema: "CREATE TABLE sermon (id INTEGER PRIMARY KEY, title TEXT NOT NULL, preacher TEXT NOT NULL, date TEXT NOT NULL, video_url TEXT NOT NULL, image TEXT NOT NULL);",
    indices: &["CREATE INDEX sermon_date_index ON sermon (date);"],
};
const FLYER_TABLE_V_0: Table = Table {
    name: "flyer",
    schema: "CREATE TABLE flyer (id INTEGER PRIMARY KEY, image TEXT NOT NULL, created INTEGER NOT NULL);",
    indices: &["CREATE INDEX flyer_created_index ON flyer (created);"],
};
const PRAYER_REQUEST_TABLE_V_0: Table = Table {
    name: "prayer_request",
    schema: "CREATE TABLE prayer_request (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT NOT NULL, request TEXT NOT NULL, created INTEGER NOT NULL);",
    indices: &[],
};
const LIVE_STREAM_TABLE_V_0: Table = Table {
    name: "live_stream",
    schema: "CREATE TABLE live_stream (name TEXT PRIMARY KEY, video_id TEXT NOT NULL, is_live INTEGER NOT NULL);",
    indices: &[],
};

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        EVENT_TABLE_V_0,
        SERMON_TABLE_V_0,
        FLYER_TABLE_V_0,
        PRAYER_REQUEST_TABLE_V_0,
        LIVE_STREAM_TABLE_V_0,
    ],
}];

/// The fixed key addressing the live-stream singleton row.
const LIVE_STREAM_KEY: &str = "live_stream";

/// Persistent content store backed by a single sqlite database.
///
/// Identities are sqlite rowids, exposed as strings on the wire. A failure to
/// open or validate the database is fatal and belongs to startup; failures on
/// individual operations afterwards surface as recoverable errors.
#[derive(Clone)]
pub struct SqliteContentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteContentStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = if path.exists() {
            Connection::open_with_flags(
                path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            info!("Creating new content database at {:?}", path);
            let conn = Connection::open(path)?;
            Self::create_schema(&conn)?;
            conn
        };

        let raw_version: usize = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .context("Failed to read content database version")?;
        if raw_version < BASE_DB_VERSION {
            bail!(
                "File does not look like a content database (user_version {})",
                raw_version
            );
        }
        let version = raw_version - BASE_DB_VERSION;
        if version >= VERSIONED_SCHEMAS.len() {
            bail!("Content database version {} is too new", version);
        }

        Ok(SqliteContentStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        let latest = VERSIONED_SCHEMAS
            .last()
            .context("No schema versions defined")?;
        for table in latest.tables {
            conn.execute(table.schema, [])?;
            for index in table.indices {
                conn.execute(index, [])?;
            }
        }
        conn.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + latest.version),
            [],
        )?;
        Ok(())
    }
}

fn date_from_column(index: usize, value: String) -> rusqlite::Result<NaiveDate> {
    value
        .parse::<NaiveDate>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

fn timestamp_from_column(index: usize, value: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(index, value))
}

impl ContentStore for SqliteContentStore {
    fn add_event(&self, event: Event) -> Result<Event> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO event (title, date, description) VALUES (?1, ?2, ?3)",
            params![event.title, event.date.to_string(), event.description],
        )
        .context("Failed to insert event")?;
        Ok(event)
    }

    fn list_events(&self) -> Result<Vec<Event>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT title, date, description FROM event ORDER BY date ASC, id ASC")?;
        let events = stmt
            .query_map([], |row| {
                Ok(Event {
                    title: row.get(0)?,
                    date: date_from_column(1, row.get(1)?)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<Event>, _>>()?;
        Ok(events)
    }

    fn add_sermon(&self, sermon: NewSermon) -> Result<Sermon> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sermon (title, preacher, date, video_url, image) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                sermon.title,
                sermon.preacher,
                sermon.date.to_string(),
                sermon.video_url,
                sermon.image
            ],
        )
        .context("Failed to insert sermon")?;
        Ok(Sermon {
            id: conn.last_insert_rowid().to_string(),
            title: sermon.title,
            preacher: sermon.preacher,
            date: sermon.date,
            video_url: sermon.video_url,
            image: sermon.image,
        })
    }

    fn list_sermons(&self) -> Result<Vec<Sermon>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, title, preacher, date, video_url, image FROM sermon ORDER BY date DESC, id ASC",
        )?;
        let sermons = stmt
            .query_map([], |row| {
                Ok(Sermon {
                    id: row.get::<usize, i64>(0)?.to_string(),
                    title: row.get(1)?,
                    preacher: row.get(2)?,
                    date: date_from_column(3, row.get(3)?)?,
                    video_url: row.get(4)?,
                    image: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<Sermon>, _>>()?;
        Ok(sermons)
    }

    fn delete_sermon(&self, id: &str) -> Result<bool> {
        // Ids are rowids; a non-numeric id was never issued by this store.
        let Ok(rowid) = id.parse::<i64>() else {
            return Ok(false);
        };
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM sermon WHERE id = ?1", params![rowid])?;
        Ok(deleted > 0)
    }

    fn add_flyers(&self, images: Vec<String>) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let created = Utc::now().timestamp_millis();
        let count = images.len();
        for image in images {
            tx.execute(
                "INSERT INTO flyer (image, created) VALUES (?1, ?2)",
                params![image, created],
            )?;
        }
        tx.commit().context("Failed to commit flyer batch")?;
        Ok(count)
    }

    fn list_flyers(&self) -> Result<Vec<Flyer>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, image, created FROM flyer ORDER BY created DESC, id ASC")?;
        let flyers = stmt
            .query_map([], |row| {
                Ok(Flyer {
                    id: row.get::<usize, i64>(0)?.to_string(),
                    image: row.get(1)?,
                    created_at: timestamp_from_column(2, row.get(2)?)?,
                })
            })?
            .collect::<Result<Vec<Flyer>, _>>()?;
        Ok(flyers)
    }

    fn delete_flyer(&self, id: &str) -> Result<bool> {
        let Ok(rowid) = id.parse::<i64>() else {
            return Ok(false);
        };
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM flyer WHERE id = ?1", params![rowid])?;
        Ok(deleted > 0)
    }

    fn add_prayer_request(&self, request: NewPrayerRequest) -> Result<PrayerRequest> {
        let conn = self.conn.lock().unwrap();
        let timestamp = Utc::now();
        conn.execute(
            "INSERT INTO prayer_request (name, email, request, created) VALUES (?1, ?2, ?3, ?4)",
            params![
                request.name,
                request.email,
                request.request,
                timestamp.timestamp_millis()
            ],
        )
        .context("Failed to insert prayer request")?;
        Ok(PrayerRequest {
            id: conn.last_insert_rowid(),
            name: request.name,
            email: request.email,
            request: request.request,
            timestamp,
        })
    }

    fn list_prayer_requests(&self) -> Result<Vec<PrayerRequest>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, request, created FROM prayer_request ORDER BY created DESC, id ASC",
        )?;
        let requests = stmt
            .query_map([], |row| {
                Ok(PrayerRequest {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    request: row.get(3)?,
                    timestamp: timestamp_from_column(4, row.get(4)?)?,
                })
            })?
            .collect::<Result<Vec<PrayerRequest>, _>>()?;
        Ok(requests)
    }

    fn get_live_stream(&self) -> Result<LiveStreamConfig> {
        let conn = self.conn.lock().unwrap();
        let config = conn
            .query_row(
                "SELECT video_id, is_live FROM live_stream WHERE name = ?1",
                params![LIVE_STREAM_KEY],
                |row| {
                    Ok(LiveStreamConfig {
                        video_id: row.get(0)?,
                        is_live: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(config.unwrap_or_default())
    }

    fn update_live_stream(&self, update: LiveStreamUpdate) -> Result<LiveStreamConfig> {
        let conn = self.conn.lock().unwrap();
        let current = conn
            .query_row(
                "SELECT video_id, is_live FROM live_stream WHERE name = ?1",
                params![LIVE_STREAM_KEY],
                |row| {
                    Ok(LiveStreamConfig {
                        video_id: row.get(0)?,
                        is_live: row.get(1)?,
                    })
                },
            )
            .optional()?
            .unwrap_or_default();

        let merged = current.merged(update);
        conn.execute(
            "INSERT INTO live_stream (name, video_id, is_live) VALUES (?1, ?2, ?3) \
             ON CONFLICT(name) DO UPDATE SET video_id = excluded.video_id, is_live = excluded.is_live",
            params![LIVE_STREAM_KEY, merged.video_id, merged.is_live],
        )
        .context("Failed to persist live stream config")?;
        Ok(merged)
    }
}
