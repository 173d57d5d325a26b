/// Offset added to the schema version stored in `PRAGMA user_version`, so a
/// content database is not mistaken for some other sqlite file that happens
/// to carry a small version number.
pub const BASE_DB_VERSION: usize = 52000;

pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub indices: &'static [&'static str],
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
}
