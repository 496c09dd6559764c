mod config;
mod logging;
mod pipeline;
mod playlist;
mod ports;
mod sampler;
mod services;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::WrapErr};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    config::Config,
    logging::setup_logging,
    pipeline::{Pipeline, RunConfig, RunOutcome, print_summary},
    services::youtube::{search_page::YoutubeSearchPage, ytdlp::YtDlpResolver},
};

/// Download random audio from YouTube playlists matching a keyword
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Keyword to search playlists for
    #[arg(long, default_value = "samples")]
    keyword: String,

    /// Number of random playlists to pick
    #[arg(long, default_value_t = 3)]
    num_playlists: usize,

    /// Number of audio files to download per playlist
    #[arg(long, default_value_t = 3)]
    num_audio: usize,

    /// Minimum number of videos a playlist must contain
    #[arg(long, default_value_t = 5)]
    min_videos: usize,

    /// Output directory (default: ./downloads)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Seed for reproducible random picks
    #[arg(long)]
    seed: Option<u64>,

    /// Path to the yt-dlp executable (overrides the config file)
    #[arg(long = "yt-dlp", env = "YT_DLP_PATH")]
    yt_dlp: Option<PathBuf>,

    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_SAMPLER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_SAMPLER_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    match args.command {
        Some(Commands::Config(ConfigCommands::CreateDefault)) => {
            let path = Config::create_default()?;
            println!("{}", path.display());
            Ok(())
        }
        Some(Commands::Config(ConfigCommands::Path)) => {
            match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            }
            Ok(())
        }
        None => {
            let code = run(args).await?;
            log::logger().flush();
            std::process::exit(code);
        }
    }
}

async fn run(args: Args) -> Result<i32> {
    log::debug!("Loading configuration");
    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .wrap_err("Failed to load playlist-sampler config")?;

    let run = run_config(&args)?;

    let resolver = YtDlpResolver::new(args.yt_dlp.clone().or_else(|| config.yt_dlp_path()))?;
    let search_page =
        YoutubeSearchPage::new(&config.search.user_agent, config.search.http_timeout()?)?;
    let format = config.download.audio_format();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let pipeline = Pipeline::new(&resolver, &search_page, &config.search, &format);
    let outcome = pipeline.run(&run, &mut rng).await?;
    if let RunOutcome::Completed(summary) = &outcome {
        print_summary(summary, &run.output_dir);
    }
    Ok(outcome.exit_code())
}

fn run_config(args: &Args) -> Result<RunConfig> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .wrap_err("Failed to read the current directory")?
            .join("downloads"),
    };
    Ok(RunConfig {
        keyword: args.keyword.clone(),
        num_playlists: args.num_playlists,
        num_audio: args.num_audio,
        min_videos: args.min_videos,
        output_dir,
    })
}
