use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use converter_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Off,
    Terminal,
    File,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "yt2mp3")]
#[command(author, version, about = "Convert YouTube videos to MP3 through a conversion server", long_about = None)]
pub struct Args {
    /// Video to convert. Without it an interactive session starts.
    pub url: Option<String>,

    /// Base URL of the conversion server
    #[arg(short, long, env = "YT2MP3_SERVER", default_value = "http://localhost:5000")]
    pub server: String,

    /// Directory for history and theme preference
    #[arg(long, default_value = ".yt2mp3")]
    pub data_dir: PathBuf,

    /// Save finished conversions here (one-shot mode downloads automatically)
    #[arg(short, long)]
    pub download_dir: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, default_value = "file")]
    pub log: LogTarget,

    /// Log file used by `--log file` and `--log both`
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub url: Option<String>,
    pub server: String,
    pub data_dir: PathBuf,
    pub download_dir: PathBuf,
    pub auto_download: bool,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl Args {
    pub fn into_config(self) -> AppConfig {
        let log_destination = match self.log {
            LogTarget::Off => LogDestination::Off,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(self.log_file),
            LogTarget::Both => LogDestination::Both(self.log_file),
        };
        AppConfig {
            url: self.url,
            server: self.server.trim_end_matches('/').to_string(),
            data_dir: self.data_dir,
            auto_download: self.download_dir.is_some(),
            download_dir: self.download_dir.unwrap_or_else(|| PathBuf::from("downloads")),
            log_destination,
            log_level: if self.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        }
    }
}
