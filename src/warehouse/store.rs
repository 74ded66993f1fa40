//! SQLite-backed warehouse.
//!
//! [`Warehouse`] owns the single connection of a run. Every source file is loaded through
//! [`Warehouse::load_file`], which hands a [`Loader`] bound to a fresh transaction: the
//! file's writes are committed together, or rolled back together when loading fails.

use super::models::{
    format_timestamp, ArtistRecord, SongRecord, SongplayRecord, TableCounts, TimeRecord,
    UserRecord,
};
use super::schema::WAREHOUSE_SCHEMA;
use super::statements::{SqliteStatements, Statements};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

/// Identifiers of the song (and its artist) matched by a songplay lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongMatch {
    pub song_id: String,
    pub artist_id: String,
}

/// Resolves the song a playback event refers to.
pub trait SongLookup {
    /// Returns the song whose title, artist name and duration match, or `None` if no
    /// loaded song does. A miss is an expected outcome, not an error.
    fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> rusqlite::Result<Option<SongMatch>>;
}

pub struct Warehouse {
    conn: Connection,
    statements: Box<dyn Statements>,
    duration_tolerance: Option<f64>,
}

fn open_connection(db_path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
            | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
            | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open warehouse database {:?}", db_path))
}

fn recreate_schema(conn: &mut Connection) -> Result<()> {
    info!("Dropping and recreating warehouse tables");
    let tx = conn.transaction()?;
    WAREHOUSE_SCHEMA.drop_all(&tx)?;
    WAREHOUSE_SCHEMA.create(&tx)?;
    tx.commit()?;
    Ok(())
}

fn create_schema_if_needed(conn: &Connection) -> Result<()> {
    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!(
            "Creating warehouse schema at version {}",
            WAREHOUSE_SCHEMA.version
        );
        WAREHOUSE_SCHEMA.create(conn)?;
        return Ok(());
    }

    WAREHOUSE_SCHEMA
        .validate(conn)
        .context("Existing database does not match the warehouse schema")
}

impl Warehouse {
    /// Opens (or creates) the warehouse database at `db_path` with the default statements.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::open_with_statements(db_path, Box::new(SqliteStatements))
    }

    pub fn open_with_statements<P: AsRef<Path>>(
        db_path: P,
        statements: Box<dyn Statements>,
    ) -> Result<Self> {
        let conn = open_connection(db_path.as_ref())?;
        Self::from_connection(conn, statements)
    }

    /// Opens the database at `db_path` after dropping and recreating the warehouse tables.
    ///
    /// Unlike [`Warehouse::open`] followed by [`Warehouse::reset`], this also works on a
    /// database whose existing tables do not match the warehouse schema.
    pub fn open_reset<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let mut conn = open_connection(db_path.as_ref())?;
        recreate_schema(&mut conn)?;
        Self::from_connection(conn, Box::new(SqliteStatements))
    }

    /// Creates a throwaway in-memory warehouse.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, Box::new(SqliteStatements))
    }

    fn from_connection(conn: Connection, statements: Box<dyn Statements>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        create_schema_if_needed(&conn)?;
        Ok(Warehouse {
            conn,
            statements,
            duration_tolerance: None,
        })
    }

    /// Allows songplay lookups to match songs whose duration differs by at most
    /// `tolerance` seconds. `None` keeps exact matching.
    pub fn with_duration_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.duration_tolerance = tolerance;
        self
    }

    /// Drops all warehouse tables and creates them again, empty.
    pub fn reset(&mut self) -> Result<()> {
        recreate_schema(&mut self.conn)
    }

    /// Runs `load` against a [`Loader`] bound to a new transaction.
    ///
    /// The transaction is committed when `load` returns `Ok` and rolled back otherwise.
    pub fn load_file<T, E, F>(&mut self, load: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Loader<'_>) -> std::result::Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let tx = self.conn.transaction()?;
        let loader = Loader {
            conn: &tx,
            statements: self.statements.as_ref(),
            duration_tolerance: self.duration_tolerance,
        };
        let loaded = load(&loader)?;
        tx.commit()?;
        Ok(loaded)
    }

    pub fn counts(&self) -> rusqlite::Result<TableCounts> {
        let count = |table: &str| -> rusqlite::Result<usize> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
                    r.get::<_, i64>(0)
                })
                .map(|n| n as usize)
        };
        Ok(TableCounts {
            songs: count("songs")?,
            artists: count("artists")?,
            time: count("time")?,
            users: count("users")?,
            songplays: count("songplays")?,
        })
    }

    /// Read access to the underlying connection, for reporting queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Writes transformed rows of one source file. Obtained from [`Warehouse::load_file`].
pub struct Loader<'conn> {
    conn: &'conn Connection,
    statements: &'conn dyn Statements,
    duration_tolerance: Option<f64>,
}

impl Loader<'_> {
    /// Returns `false` when a song with the same id already exists.
    pub fn insert_song(&self, song: &SongRecord) -> rusqlite::Result<bool> {
        let changed = self
            .conn
            .prepare_cached(self.statements.insert_song())?
            .execute(params![
                song.song_id,
                song.title,
                song.artist_id,
                song.year,
                song.duration
            ])?;
        Ok(changed > 0)
    }

    /// Returns `false` when an artist with the same id already exists.
    pub fn insert_artist(&self, artist: &ArtistRecord) -> rusqlite::Result<bool> {
        let changed = self
            .conn
            .prepare_cached(self.statements.insert_artist())?
            .execute(params![
                artist.artist_id,
                artist.name,
                artist.location,
                artist.latitude,
                artist.longitude
            ])?;
        Ok(changed > 0)
    }

    /// Returns `false` when the timestamp is already present.
    pub fn insert_time(&self, time: &TimeRecord) -> rusqlite::Result<bool> {
        let changed = self
            .conn
            .prepare_cached(self.statements.insert_time())?
            .execute(params![
                format_timestamp(&time.start_time),
                time.hour,
                time.day,
                time.week,
                time.month,
                time.year,
                time.weekday
            ])?;
        Ok(changed > 0)
    }

    /// Inserts the user, or overwrites every non-key field of an existing one.
    pub fn upsert_user(&self, user: &UserRecord) -> rusqlite::Result<()> {
        self.conn
            .prepare_cached(self.statements.upsert_user())?
            .execute(params![
                user.user_id,
                user.first_name,
                user.last_name,
                user.gender,
                user.level
            ])?;
        Ok(())
    }

    /// Appends a songplay. Songplays are never deduplicated.
    pub fn insert_songplay(&self, songplay: &SongplayRecord) -> rusqlite::Result<()> {
        self.conn
            .prepare_cached(self.statements.insert_songplay())?
            .execute(params![
                format_timestamp(&songplay.start_time),
                songplay.user_id,
                songplay.level,
                songplay.song_id,
                songplay.artist_id,
                songplay.session_id,
                songplay.location,
                songplay.user_agent
            ])?;
        Ok(())
    }
}

impl SongLookup for Loader<'_> {
    fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> rusqlite::Result<Option<SongMatch>> {
        let map_row = |r: &rusqlite::Row| {
            Ok(SongMatch {
                song_id: r.get(0)?,
                artist_id: r.get(1)?,
            })
        };
        let found = match self.duration_tolerance {
            None => self
                .conn
                .prepare_cached(self.statements.song_select())?
                .query_row(params![title, artist_name, duration], map_row)
                .optional()?,
            Some(tolerance) => self
                .conn
                .prepare_cached(self.statements.song_select_within())?
                .query_row(params![title, artist_name, duration, tolerance], map_row)
                .optional()?,
        };
        if found.is_none() {
            debug!(
                "No song matches title={:?} artist={:?} duration={}",
                title, artist_name, duration
            );
        }
        Ok(found)
    }
}
