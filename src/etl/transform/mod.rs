//! Per-kind transformations from parsed source rows to warehouse records.

pub mod log;
pub mod song;

pub use log::{transform_log_file, LogBatch, SkippedRow, NEXT_SONG_PAGE};
pub use song::transform_song_file;
