#![allow(dead_code)]

use super::constants::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Song-file line for one song of one artist.
pub fn song_line(song_id: &str, title: &str, artist_id: &str, artist: &str, duration: f64) -> String {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 0
    })
    .to_string()
}

/// A data root layout like the one the pipeline runs against by default:
/// `song_data/`, `log_data/` and the database file, all inside one temporary directory.
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("song_data")).expect("Failed to create song_data");
        fs::create_dir_all(dir.path().join("log_data")).expect("Failed to create log_data");
        TestData { dir }
    }

    /// Song and log files for two known songs and one user who upgrades from free to paid.
    pub fn with_sample_files() -> Self {
        let data = Self::new();
        data.write_song(
            "A/R/J/TRAAAAW128F429D538.json",
            &song_line(SONG_1_ID, SONG_1_TITLE, ARTIST_1_ID, ARTIST_1_NAME, SONG_1_DURATION),
        );
        data.write_song(
            "A/R/5/TRAAABD128F429CF47.json",
            &song_line(SONG_2_ID, SONG_2_TITLE, ARTIST_2_ID, ARTIST_2_NAME, SONG_2_DURATION),
        );
        data.write_log(
            "2018/11/2018-11-15-events.json",
            &[
                log_event("Home", TS_1 - 1000, None, "free"),
                log_event(
                    "NextSong",
                    TS_1,
                    Some((SONG_1_TITLE, ARTIST_1_NAME, SONG_1_DURATION)),
                    "free",
                ),
                log_event("NextSong", TS_2, Some(("Unknown", "Nobody", 100.0)), "free"),
                log_event(
                    "NextSong",
                    TS_3,
                    Some((SONG_2_TITLE, ARTIST_2_NAME, SONG_2_DURATION)),
                    "paid",
                ),
            ],
        );
        data
    }

    pub fn song_root(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_root(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("sparkifydb.sqlite")
    }

    pub fn write_song(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.song_root(), relative, content)
    }

    pub fn write_log(&self, relative: &str, events: &[Value]) -> PathBuf {
        let content: Vec<String> = events.iter().map(Value::to_string).collect();
        write_file(&self.log_root(), relative, &content.join("\n"))
    }

    pub fn write_raw_log(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.log_root(), relative, content)
    }
}

/// Log event for [`USER_ID`]; `played` carries (song, artist, length) of a playback.
pub fn log_event(page: &str, ts: i64, played: Option<(&str, &str, f64)>, level: &str) -> Value {
    let (song, artist, length) = match played {
        Some((song, artist, length)) => (json!(song), json!(artist), json!(length)),
        None => (Value::Null, Value::Null, Value::Null),
    };
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Ryan",
        "gender": "M",
        "itemInSession": 0,
        "lastName": "Smith",
        "length": length,
        "level": level,
        "location": "San Jose-Sunnyvale-Santa Clara, CA",
        "method": "PUT",
        "page": page,
        "registration": 1541016707796.0,
        "sessionId": SESSION_ID,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
        "userId": USER_ID
    })
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}
