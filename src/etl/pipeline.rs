//! Pipeline driver.
//!
//! A pass walks one data root, and for every file found parses it, transforms its rows and
//! loads them through a [`Loader`] inside a per-file transaction. [`run`] performs the song
//! pass first so that the log pass can resolve songplays against committed songs.

use super::locator::{find_files, JSON_SUFFIX};
use super::parser::{read_json_lines, RowSet};
use super::transform::{transform_log_file, transform_song_file};
use super::EtlError;
use crate::warehouse::{Loader, Warehouse};
use std::io::Write;
use std::ops::AddAssign;
use std::path::Path;
use tracing::{debug, error, info};

/// Rows written while loading one source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileSummary {
    /// Songs inserted; songs already present are not counted.
    pub songs: usize,
    /// Artists inserted; artists already present are not counted.
    pub artists: usize,
    /// Timestamps inserted; timestamps already present are not counted.
    pub time_rows: usize,
    /// User upserts performed.
    pub user_rows: usize,
    pub songplays: usize,
    /// Songplays stored without a song and artist.
    pub unresolved: usize,
    /// Malformed playback records left out.
    pub skipped: usize,
    /// Records that are not playback events.
    pub discarded: usize,
}

impl AddAssign for FileSummary {
    fn add_assign(&mut self, other: Self) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.time_rows += other.time_rows;
        self.user_rows += other.user_rows;
        self.songplays += other.songplays;
        self.unresolved += other.unresolved;
        self.skipped += other.skipped;
        self.discarded += other.discarded;
    }
}

/// Totals of one pass over a data root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub files: usize,
    pub totals: FileSummary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub songs: PassSummary,
    pub logs: PassSummary,
}

/// Transforms and loads the rows of one kind of source file.
pub trait FileProcessor {
    /// Name of the file kind, used in logs.
    fn kind(&self) -> &'static str;

    fn load(&self, loader: &Loader<'_>, rows: &RowSet) -> Result<FileSummary, EtlError>;
}

/// Loads the song and artist of a song-file.
#[derive(Clone, Copy, Debug, Default)]
pub struct SongFileProcessor;

impl FileProcessor for SongFileProcessor {
    fn kind(&self) -> &'static str {
        "song"
    }

    fn load(&self, loader: &Loader<'_>, rows: &RowSet) -> Result<FileSummary, EtlError> {
        let (song, artist) = transform_song_file(rows)?;
        let mut summary = FileSummary::default();
        // songs.artist_id references artists
        if loader.insert_artist(&artist)? {
            summary.artists += 1;
        }
        if loader.insert_song(&song)? {
            summary.songs += 1;
        }
        Ok(summary)
    }
}

/// Loads the time, user and songplay rows of a log-file.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFileProcessor;

impl FileProcessor for LogFileProcessor {
    fn kind(&self) -> &'static str {
        "log"
    }

    fn load(&self, loader: &Loader<'_>, rows: &RowSet) -> Result<FileSummary, EtlError> {
        let batch = transform_log_file(rows, loader)?;
        let mut summary = FileSummary {
            unresolved: batch.unresolved,
            skipped: batch.skipped.len(),
            discarded: batch.discarded,
            ..Default::default()
        };

        for time in &batch.time {
            if loader.insert_time(time)? {
                summary.time_rows += 1;
            }
        }
        // Row order matters: the last record of a user wins.
        for user in &batch.users {
            loader.upsert_user(user)?;
            summary.user_rows += 1;
        }
        for songplay in &batch.songplays {
            loader.insert_songplay(songplay)?;
            summary.songplays += 1;
        }
        Ok(summary)
    }
}

/// Processes every JSON file under `root` with `processor`, writing progress lines to `out`.
///
/// Each file is committed on its own; the first failing file aborts the pass with the
/// files before it left committed.
pub fn process_data(
    warehouse: &mut Warehouse,
    root: &Path,
    processor: &dyn FileProcessor,
    out: &mut dyn Write,
) -> Result<PassSummary, EtlError> {
    let files = find_files(root, JSON_SUFFIX)?;
    let total = files.len();
    info!(
        "Processing {} {} files from {}",
        total,
        processor.kind(),
        root.display()
    );
    writeln!(out, "{} files found in {}", total, root.display()).map_err(|source| {
        EtlError::Io {
            path: root.to_path_buf(),
            source,
        }
    })?;

    let mut summary = PassSummary::default();
    for (index, path) in files.iter().enumerate() {
        let rows = read_json_lines(path)?;
        debug!(
            "Read {} records from {} with columns {:?}",
            rows.len(),
            path.display(),
            rows.columns()
        );
        let loaded = match warehouse.load_file(|loader| processor.load(loader, &rows)) {
            Ok(loaded) => loaded,
            Err(e) => {
                error!("Failed to load {} file {}: {}", processor.kind(), path.display(), e);
                return Err(e);
            }
        };
        debug!("Loaded {}: {:?}", path.display(), loaded);

        summary.files += 1;
        summary.totals += loaded;
        writeln!(out, "{}/{} files processed.", index + 1, total).map_err(|source| {
            EtlError::Io {
                path: path.clone(),
                source,
            }
        })?;
    }
    Ok(summary)
}

/// Loads all song-files under `song_root`, then all log-files under `log_root`.
pub fn run(
    warehouse: &mut Warehouse,
    song_root: &Path,
    log_root: &Path,
    out: &mut dyn Write,
) -> Result<RunSummary, EtlError> {
    let songs = process_data(warehouse, song_root, &SongFileProcessor, out)?;
    let logs = process_data(warehouse, log_root, &LogFileProcessor, out)?;
    Ok(RunSummary { songs, logs })
}
