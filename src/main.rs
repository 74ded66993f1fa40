use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_DB, DEFAULT_LOG_DATA, DEFAULT_SONG_DATA,
};
use sparkify_etl::etl::PassSummary;
use sparkify_etl::{run, Warehouse};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song and listening-log JSON files into the Sparkify warehouse")]
struct CliArgs {
    /// Root directory of the song-files.
    #[arg(long, default_value = DEFAULT_SONG_DATA)]
    song_data: PathBuf,

    /// Root directory of the log-files.
    #[arg(long, default_value = DEFAULT_LOG_DATA)]
    log_data: PathBuf,

    /// Path to the SQLite warehouse database, created if missing.
    #[arg(long, default_value = DEFAULT_DB)]
    db: PathBuf,

    /// Optional TOML config file. Its values override the command line.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Match songplays to songs whose duration differs by at most this many seconds.
    #[arg(long)]
    duration_tolerance: Option<f64>,

    /// Drop and recreate the warehouse tables before loading.
    #[arg(long, default_value_t = false)]
    reset: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            song_data: self.song_data.clone(),
            log_data: self.log_data.clone(),
            db: self.db.clone(),
            duration_tolerance: self.duration_tolerance,
            reset: self.reset,
        }
    }
}

fn log_pass(kind: &str, pass: &PassSummary) {
    let totals = &pass.totals;
    info!("{} files processed: {}", kind, pass.files);
    info!("  songs inserted: {}", totals.songs);
    info!("  artists inserted: {}", totals.artists);
    info!("  time rows inserted: {}", totals.time_rows);
    info!("  user rows written: {}", totals.user_rows);
    info!("  songplays inserted: {}", totals.songplays);
    if totals.unresolved > 0 {
        info!("  songplays without a matching song: {}", totals.unresolved);
    }
    if totals.skipped > 0 {
        warn!("  malformed records skipped: {}", totals.skipped);
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Song data: {}", config.song_data.display());
    info!("Log data: {}", config.log_data.display());
    info!("Warehouse database: {}", config.db_path.display());

    let warehouse = if config.reset {
        Warehouse::open_reset(&config.db_path)?
    } else {
        Warehouse::open(&config.db_path)?
    };
    let mut warehouse = warehouse.with_duration_tolerance(config.duration_tolerance);

    let stdout = std::io::stdout();
    let summary = run(
        &mut warehouse,
        &config.song_data,
        &config.log_data,
        &mut stdout.lock(),
    )?;

    info!("");
    info!("Load Summary");
    info!("============");
    log_pass("Song", &summary.songs);
    log_pass("Log", &summary.logs);

    let counts = warehouse.counts()?;
    info!("");
    info!("Database contains:");
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} time rows", counts.time);
    info!("  {} users", counts.users);
    info!("  {} songplays", counts.songplays);

    Ok(())
}
