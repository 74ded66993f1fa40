//! SQL text for every statement the loader issues.
//!
//! The loader only knows the parameter order of each statement shape, so a different
//! dialect or table layout can be plugged in by implementing [`Statements`].

/// One method per statement shape used by the loader.
///
/// Parameter order for each statement:
/// - `insert_song`: song_id, title, artist_id, year, duration
/// - `insert_artist`: artist_id, name, location, latitude, longitude
/// - `insert_time`: start_time, hour, day, week, month, year, weekday
/// - `upsert_user`: user_id, first_name, last_name, gender, level
/// - `insert_songplay`: start_time, user_id, level, song_id, artist_id, session_id,
///   location, user_agent
/// - `song_select`: title, artist name, duration; yields (song_id, artist_id)
/// - `song_select_within`: title, artist name, duration, tolerance; yields (song_id, artist_id)
pub trait Statements {
    fn insert_song(&self) -> &str;
    fn insert_artist(&self) -> &str;
    fn insert_time(&self) -> &str;
    fn upsert_user(&self) -> &str;
    fn insert_songplay(&self) -> &str;
    fn song_select(&self) -> &str;
    fn song_select_within(&self) -> &str;
}

const SONG_TABLE_INSERT: &str = "INSERT INTO songs (song_id, title, artist_id, year, duration)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(song_id) DO NOTHING";

const ARTIST_TABLE_INSERT: &str =
    "INSERT INTO artists (artist_id, name, location, latitude, longitude)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(artist_id) DO NOTHING";

const TIME_TABLE_INSERT: &str =
    "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(start_time) DO NOTHING";

const USER_TABLE_UPSERT: &str =
    "INSERT INTO users (user_id, first_name, last_name, gender, level)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(user_id) DO UPDATE SET
        first_name = excluded.first_name,
        last_name = excluded.last_name,
        gender = excluded.gender,
        level = excluded.level";

const SONGPLAY_TABLE_INSERT: &str = "INSERT INTO songplays
    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const SONG_SELECT: &str = "SELECT s.song_id, s.artist_id
    FROM songs s JOIN artists a ON s.artist_id = a.artist_id
    WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
    ORDER BY s.song_id
    LIMIT 1";

const SONG_SELECT_WITHIN: &str = "SELECT s.song_id, s.artist_id
    FROM songs s JOIN artists a ON s.artist_id = a.artist_id
    WHERE s.title = ?1 AND a.name = ?2 AND abs(s.duration - ?3) <= ?4
    ORDER BY abs(s.duration - ?3), s.song_id
    LIMIT 1";

/// Statements for the schema in [`super::schema::WAREHOUSE_SCHEMA`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SqliteStatements;

impl Statements for SqliteStatements {
    fn insert_song(&self) -> &str {
        SONG_TABLE_INSERT
    }

    fn insert_artist(&self) -> &str {
        ARTIST_TABLE_INSERT
    }

    fn insert_time(&self) -> &str {
        TIME_TABLE_INSERT
    }

    fn upsert_user(&self) -> &str {
        USER_TABLE_UPSERT
    }

    fn insert_songplay(&self) -> &str {
        SONGPLAY_TABLE_INSERT
    }

    fn song_select(&self) -> &str {
        SONG_SELECT
    }

    fn song_select_within(&self) -> &str {
        SONG_SELECT_WITHIN
    }
}
