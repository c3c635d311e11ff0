use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gleaner_core::GleanerConfig;
use gleaner_engine::{ReportOptions, UrlColumn, DEFAULT_PREVIEW_CHARS};
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "gleaner.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Browser launch settings; only used when built with the `browser` feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    pub headless: bool,
    pub chrome_args: Vec<String>,
    /// DevTools endpoint of a running browser instead of launching one.
    pub remote_url: Option<String>,
    pub page_load_timeout_ms: u64,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_args: Vec::new(),
            remote_url: None,
            page_load_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input_path: PathBuf,
    /// Zero-based column holding the URLs.
    pub url_column: usize,
    pub has_header: bool,
    pub output_dir: PathBuf,
    pub results_filename: String,
    pub manifest_filename: Option<String>,
    pub preview_chars: usize,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub browser: BrowserOptions,
    pub fetch: GleanerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let report = ReportOptions::default();
        Self {
            input_path: PathBuf::from("urls.csv"),
            url_column: UrlColumn::default().index,
            has_header: UrlColumn::default().has_header,
            output_dir: report.output_dir,
            results_filename: report.results_filename,
            manifest_filename: report.manifest_filename,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            log_destination: LogDestination::default(),
            log_file: PathBuf::from("gleaner.log"),
            browser: BrowserOptions::default(),
            fetch: GleanerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn url_column(&self) -> UrlColumn {
        UrlColumn {
            index: self.url_column,
            has_header: self.has_header,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            output_dir: self.output_dir.clone(),
            results_filename: self.results_filename.clone(),
            manifest_filename: self.manifest_filename.clone(),
        }
    }
}

/// Where the config came from, reported once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults(PathBuf),
}

/// Load `path`, or `gleaner.ron` when none is given. A missing file yields
/// defaults; an unreadable or malformed one is an error.
pub fn load(path: Option<&Path>) -> Result<(AppConfig, ConfigSource), ConfigError> {
    let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok((AppConfig::default(), ConfigSource::Defaults(path.to_path_buf())));
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let config = ron::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((config, ConfigSource::File(path.to_path_buf())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn missing_file_means_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ron");
        let (config, source) = load(Some(&path)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(source, ConfigSource::Defaults(path));
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gleaner.ron");
        fs::write(
            &path,
            r#"(
                input_path: "leads.csv",
                url_column: 0,
                log_destination: Terminal,
                browser: (headless: false),
                fetch: (direct: (max_retries: 5, backoff_base_ms: 500)),
            )"#,
        )
        .unwrap();

        let (config, source) = load(Some(&path)).unwrap();
        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.input_path, PathBuf::from("leads.csv"));
        assert_eq!(config.url_column().index, 0);
        assert!(config.has_header);
        assert_eq!(config.log_destination, LogDestination::Terminal);
        assert!(!config.browser.headless);
        assert_eq!(config.fetch.direct.max_retries, 5);
        assert_eq!(config.fetch.direct.backoff_base, Duration::from_millis(500));
        assert_eq!(config.fetch.classifier.min_content_chars, 100);
        assert_eq!(config.preview_chars, 1000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gleaner.ron");
        fs::write(&path, "(url_column: \"two\")").unwrap();
        assert!(matches!(load(Some(&path)), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn report_options_follow_config() {
        let config = AppConfig {
            output_dir: PathBuf::from("out"),
            manifest_filename: None,
            ..AppConfig::default()
        };
        let options = config.report_options();
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.results_filename, "scraped_data_output.csv");
        assert!(options.manifest_filename.is_none());
    }
}
