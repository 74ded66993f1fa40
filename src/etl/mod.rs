mod error;
pub mod locator;
pub mod parser;
pub mod pipeline;
pub mod transform;

pub use error::EtlError;
pub use locator::{find_files, JSON_SUFFIX};
pub use parser::{read_json_lines, RowSet};
pub use pipeline::{
    process_data, run, FileProcessor, FileSummary, LogFileProcessor, PassSummary, RunSummary,
    SongFileProcessor,
};
