//! Log-file transformation.
//!
//! Only playback events (`page == "NextSong"`) carry facts. Each of them yields one time
//! row, one user row and one songplay, with the song and artist resolved by lookup.

use crate::etl::parser::RowSet;
use crate::etl::EtlError;
use crate::warehouse::{SongLookup, SongplayRecord, TimeRecord, UserRecord};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Page value of playback events.
pub const NEXT_SONG_PAGE: &str = "NextSong";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogRow {
    ts: Option<i64>,
    song: Option<String>,
    artist: Option<String>,
    length: Option<f64>,
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    level: Option<String>,
    session_id: Option<i64>,
    location: Option<String>,
    user_agent: Option<String>,
}

/// User ids show up both as strings and as numbers across log files.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or a number, found {}",
            other
        ))),
    }
}

/// A log record that could not be derived and was left out of the batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based position of the record within its file.
    pub record: usize,
    pub reason: String,
}

/// Everything one log-file contributes to the warehouse.
#[derive(Debug, Default)]
pub struct LogBatch {
    pub time: Vec<TimeRecord>,
    pub users: Vec<UserRecord>,
    pub songplays: Vec<SongplayRecord>,
    /// Records that are not playback events.
    pub discarded: usize,
    pub skipped: Vec<SkippedRow>,
    /// Songplays whose song could not be resolved.
    pub unresolved: usize,
}

/// Derives time, user and songplay rows from the playback events of a log-file.
///
/// A playback record missing `page`, `ts` or `userId`, or holding a value of the wrong
/// type, is skipped with a warning and reported in [`LogBatch::skipped`]; the rest of
/// the file is still transformed. Only lookup failures abort the transformation.
pub fn transform_log_file(rows: &RowSet, lookup: &dyn SongLookup) -> Result<LogBatch, EtlError> {
    let mut batch = LogBatch::default();

    for (index, raw) in rows.rows().iter().enumerate() {
        let record = index + 1;
        let mut skip = |reason: String| {
            warn!("Skipping log record {}: {}", record, reason);
            batch.skipped.push(SkippedRow { record, reason });
        };

        match raw.get("page") {
            Some(Value::String(page)) if page == NEXT_SONG_PAGE => {}
            Some(Value::String(_)) => {
                batch.discarded += 1;
                continue;
            }
            None | Some(Value::Null) => {
                skip("missing page".to_string());
                continue;
            }
            Some(other) => {
                skip(format!("page is not a string: {}", other));
                continue;
            }
        }

        let row: LogRow = match rows.record(index) {
            Some(Ok(row)) => row,
            Some(Err(e)) => {
                skip(e.to_string());
                continue;
            }
            None => continue,
        };
        let Some(ts) = row.ts else {
            skip("missing ts".to_string());
            continue;
        };
        let Some(time) = TimeRecord::from_epoch_millis(ts) else {
            skip(format!("timestamp {} is out of range", ts));
            continue;
        };
        let user_id = match row.user_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                skip("missing userId".to_string());
                continue;
            }
        };

        let found = match (&row.song, &row.artist, row.length) {
            (Some(title), Some(artist), Some(length)) => {
                lookup.find_song(title, artist, length)?
            }
            _ => None,
        };
        if found.is_none() {
            batch.unresolved += 1;
        }
        let (song_id, artist_id) = match found {
            Some(m) => (Some(m.song_id), Some(m.artist_id)),
            None => (None, None),
        };

        batch.songplays.push(SongplayRecord {
            start_time: time.start_time,
            user_id: user_id.clone(),
            level: row.level.clone(),
            song_id,
            artist_id,
            session_id: row.session_id,
            location: row.location,
            user_agent: row.user_agent,
        });
        batch.users.push(UserRecord {
            user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            gender: row.gender,
            level: row.level,
        });
        batch.time.push(time);
    }

    Ok(batch)
}
