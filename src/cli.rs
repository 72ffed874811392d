use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Organize new files as they appear, until interrupted
    Watch,
    /// Organize everything in the input directory once and exit
    Execute,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "chiprr")]
#[command(about = "Hard link downloaded episodes into a Show/Season tree named after TMDB")]
pub struct Cli {
    /// Directory to scan or watch for video files
    #[arg(short = 'i', long, env = "INPUT_DIRECTORY")]
    pub input_directory: Option<PathBuf>,

    /// Directory the organized links are created in
    #[arg(short = 's', long, env = "SORTED_DIRECTORY")]
    pub sorted_directory: Option<PathBuf>,

    /// TMDB API read access token
    #[arg(short = 't', long, env = "TMDB_TOKEN", hide_env_values = true)]
    pub tmdb_token: Option<String>,

    /// Log level [default: info]
    #[arg(short = 'l', long, env = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// File where TMDB lookups are cached between runs
    #[arg(short = 'c', long, env = "CACHE_FILE_PATH")]
    pub cache_file_path: Option<PathBuf>,

    /// Run mode [default: watch]
    #[arg(short = 'm', long, env = "MODE")]
    pub mode: Option<Mode>,
}
