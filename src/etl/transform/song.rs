//! Song-file transformation: one song and its artist per file.

use crate::etl::parser::RowSet;
use crate::etl::EtlError;
use crate::warehouse::{ArtistRecord, SongRecord};
use serde::Deserialize;
use tracing::warn;

/// Projection of a song-file record.
#[derive(Debug, Deserialize)]
struct SongFileRow {
    song_id: String,
    title: String,
    artist_id: String,
    year: Option<i64>,
    duration: f64,
    artist_name: String,
    artist_location: Option<String>,
    artist_latitude: Option<f64>,
    artist_longitude: Option<f64>,
}

/// Extracts the song and artist described by a song-file.
///
/// Only the first row is used: a song-file describes a single song, extra rows are
/// ignored with a warning.
pub fn transform_song_file(rows: &RowSet) -> Result<(SongRecord, ArtistRecord), EtlError> {
    let row: SongFileRow = match rows.record(0) {
        None => {
            return Err(EtlError::MalformedInput(
                "song file contains no records".to_string(),
            ))
        }
        Some(parsed) => parsed
            .map_err(|e| EtlError::MalformedInput(format!("invalid song record: {}", e)))?,
    };
    if rows.len() > 1 {
        warn!(
            "Song file has {} records, only the first ({}) is loaded",
            rows.len(),
            row.song_id
        );
    }

    let song = SongRecord {
        song_id: row.song_id,
        title: row.title,
        artist_id: row.artist_id.clone(),
        year: row.year.unwrap_or(0),
        duration: row.duration,
    };
    let artist = ArtistRecord {
        artist_id: row.artist_id,
        name: row.artist_name,
        location: row.artist_location,
        latitude: row.artist_latitude,
        longitude: row.artist_longitude,
    };
    Ok((song, artist))
}
