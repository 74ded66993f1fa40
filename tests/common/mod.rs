//! Common test infrastructure
//!
//! Integration tests build a [`TestData`] tree of song and log files in a temporary
//! directory and run the pipeline against a warehouse stored next to it.

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{log_event, song_line, TestData};
