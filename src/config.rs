use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, LogLevel, Mode};

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    input_directory: Option<PathBuf>,
    sorted_directory: Option<PathBuf>,
    tmdb_token: Option<String>,
    log_level: Option<LogLevel>,
    cache_file_path: Option<PathBuf>,
    mode: Option<Mode>,
}

impl ConfigFile {
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(ConfigFile::default());
        }
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        toml::from_str(&config_content)
            .with_context(|| format!("Invalid config file {}", config_path.display()))
    }
}

/// Settings after merging flags, environment and the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub input_directory: PathBuf,
    pub sorted_directory: PathBuf,
    pub tmdb_token: String,
    pub log_level: LogLevel,
    pub cache_file_path: PathBuf,
    pub mode: Mode,
}

impl AppConfig {
    pub fn resolve(cli: Cli) -> Result<Self> {
        let file = ConfigFile::load(&get_config_path())?;
        Self::merge(cli, file)
    }

    /// Flags and environment variables (both already in `cli`) win over the
    /// config file, which wins over defaults.
    pub fn merge(cli: Cli, file: ConfigFile) -> Result<Self> {
        let input_directory = cli.input_directory.or(file.input_directory);
        let sorted_directory = cli.sorted_directory.or(file.sorted_directory);
        let tmdb_token = cli.tmdb_token.or(file.tmdb_token).filter(|token| !token.is_empty());

        let mut missing = Vec::new();
        if input_directory.is_none() {
            missing.push("input directory (--input-directory, INPUT_DIRECTORY or input_directory)");
        }
        if sorted_directory.is_none() {
            missing.push("sorted directory (--sorted-directory, SORTED_DIRECTORY or sorted_directory)");
        }
        if tmdb_token.is_none() {
            missing.push("TMDB token (--tmdb-token, TMDB_TOKEN or tmdb_token)");
        }
        let (Some(input_directory), Some(sorted_directory), Some(tmdb_token)) =
            (input_directory, sorted_directory, tmdb_token)
        else {
            bail!(
                "Missing required settings: {}. Config file location: {}",
                missing.join("; "),
                get_config_path().display()
            );
        };

        Ok(AppConfig {
            input_directory,
            sorted_directory,
            tmdb_token,
            log_level: cli.log_level.or(file.log_level).unwrap_or(LogLevel::Info),
            cache_file_path: cli
                .cache_file_path
                .or(file.cache_file_path)
                .unwrap_or_else(get_cache_path),
            mode: cli.mode.or(file.mode).unwrap_or(Mode::Watch),
        })
    }
}

pub fn get_cache_path() -> PathBuf {
    get_config_dir_path().join("tmdb-cache.json")
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("chiprr"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn full_cli() -> Cli {
        Cli {
            input_directory: Some(PathBuf::from("/downloads")),
            sorted_directory: Some(PathBuf::from("/media/tv")),
            tmdb_token: Some("cli-token".to_string()),
            ..Cli::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::merge(full_cli(), ConfigFile::default()).unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.mode, Mode::Watch);
        assert_eq!(config.cache_file_path, get_cache_path());
    }

    #[test]
    fn test_cli_wins_over_config_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            input_directory = "/file/downloads"
            tmdb_token = "file-token"
            log_level = "debug"
            mode = "execute"
            cache_file_path = "/file/cache.json"
            "#,
        )
        .unwrap();
        let cli = Cli {
            mode: Some(Mode::Watch),
            ..full_cli()
        };

        let config = AppConfig::merge(cli, file).unwrap();
        assert_eq!(config.input_directory, PathBuf::from("/downloads"));
        assert_eq!(config.tmdb_token, "cli-token");
        assert_eq!(config.mode, Mode::Watch);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.cache_file_path, PathBuf::from("/file/cache.json"));
    }

    #[test]
    fn test_config_file_fills_gaps() {
        let file: ConfigFile = toml::from_str(
            r#"
            sorted_directory = "/file/tv"
            tmdb_token = "file-token"
            "#,
        )
        .unwrap();
        let cli = Cli {
            input_directory: Some(PathBuf::from("/downloads")),
            ..Cli::default()
        };

        let config = AppConfig::merge(cli, file).unwrap();
        assert_eq!(config.sorted_directory, PathBuf::from("/file/tv"));
        assert_eq!(config.tmdb_token, "file-token");
    }

    #[test]
    fn test_missing_settings_are_all_named() {
        let err = AppConfig::merge(Cli::default(), ConfigFile::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("INPUT_DIRECTORY"));
        assert!(message.contains("SORTED_DIRECTORY"));
        assert!(message.contains("TMDB_TOKEN"));

        let cli = Cli {
            tmdb_token: Some(String::new()),
            ..full_cli()
        };
        let message = AppConfig::merge(cli, ConfigFile::default()).unwrap_err().to_string();
        assert!(message.contains("TMDB_TOKEN"));
        assert!(!message.contains("INPUT_DIRECTORY"));
    }

    #[test]
    fn test_load_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        assert!(ConfigFile::load(&config_path).unwrap().tmdb_token.is_none());

        fs::write(&config_path, "tmdb_token = \"abc\"\nmode = \"execute\"\n").unwrap();
        let file = ConfigFile::load(&config_path).unwrap();
        assert_eq!(file.tmdb_token.as_deref(), Some("abc"));
        assert_eq!(file.mode, Some(Mode::Execute));

        fs::write(&config_path, "mode = \"sometimes\"").unwrap();
        assert!(ConfigFile::load(&config_path).is_err());
    }
}
