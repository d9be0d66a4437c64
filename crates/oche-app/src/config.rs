// Configuration loading and parsing (oche.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const CONFIG_FILE: &str = "oche.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub health_check: HealthCheckConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_mapping: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthCheckConfig {
    #[serde(default = "default_true")]
    pub before_proposal: bool,
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        HealthCheckConfig {
            before_proposal: true,
            fail_on_error: false,
        }
    }
}

/// How a proposal result is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("expected one of text, json, csv; got \"{other}\"")),
        }
    }
}

// ---------------------------------------------------------------------------
// oche.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire oche.toml file.
#[derive(Debug, Clone, Deserialize)]
struct OcheFile {
    logging: LoggingConfig,
    output: OutputSection,
    #[serde(default)]
    health_check: HealthCheckConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct OutputSection {
    format: String,
    #[serde(default = "default_true")]
    show_mapping: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate `config/oche.toml` under `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: OcheFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&file)?;

    let format = OutputFormat::from_str(&file.output.format).map_err(|message| {
        ConfigError::ValidationError {
            field: "output.format".into(),
            message,
        }
    })?;

    Ok(Config {
        logging: file.logging,
        output: OutputConfig {
            format,
            show_mapping: file.output.show_mapping,
        },
        health_check: file.health_check,
    })
}

/// Copy any file from `defaults/` that is missing in `config/`.
///
/// Existing files are never overwritten. Files ending in `.example` are
/// skipped. Returns the paths that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Loads config relative to the current working directory, copying the
/// defaults in first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &OcheFile) -> Result<(), ConfigError> {
    if file.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }
    if file.logging.directory.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.directory".into(),
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn defaults_text() -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("defaults")
            .join(CONFIG_FILE);
        fs::read_to_string(path).unwrap()
    }

    /// A temp project with `config/oche.toml` holding `text`.
    fn project_with(text: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn validation_field(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_default_config() {
        let tmp = project_with(&defaults_text());
        let config = load_config_from(tmp.path()).expect("should load default config");

        assert_eq!(config.logging.directory, "logs");
        assert!(config.logging.filter.contains("oche=info"));
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.show_mapping);
        assert!(config.health_check.before_proposal);
        assert!(!config.health_check.fail_on_error);
    }

    #[test]
    fn health_check_section_is_optional() {
        let tmp = project_with(
            "[logging]\nfilter = \"info\"\ndirectory = \"logs\"\n\n[output]\nformat = \"CSV\"\n",
        );
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(config.output.show_mapping);
        assert_eq!(config.health_check, HealthCheckConfig::default());
    }

    #[test]
    fn rejects_unknown_format() {
        let text = defaults_text().replace("format = \"text\"", "format = \"xml\"");
        let tmp = project_with(&text);
        let err = load_config_from(tmp.path()).unwrap_err();
        assert_eq!(validation_field(err), "output.format");
    }

    #[test]
    fn rejects_empty_filter() {
        let text = defaults_text().replace(
            "filter = \"oche=info,oche_core=info,oche_app=info,warn\"",
            "filter = \"  \"",
        );
        let tmp = project_with(&text);
        let err = load_config_from(tmp.path()).unwrap_err();
        assert_eq!(validation_field(err), "logging.filter");
    }

    #[test]
    fn rejects_empty_log_directory() {
        let text = defaults_text().replace("directory = \"logs\"", "directory = \"\"");
        let tmp = project_with(&text);
        let err = load_config_from(tmp.path()).unwrap_err();
        assert_eq!(validation_field(err), "logging.directory");
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_from(tmp.path()).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("config/oche.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = project_with("[logging\nfilter = ");
        let err = load_config_from(tmp.path()).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("oche.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = TempDir::new().unwrap();
        let defaults_dir = tmp.path().join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), defaults_text()).unwrap();
        fs::write(defaults_dir.join("oche.toml.example"), "# example\n").unwrap();

        let copied = ensure_config_files(tmp.path()).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.path().join("config/oche.toml").exists());
        assert!(!tmp.path().join("config/oche.toml.example").exists());

        load_config_from(tmp.path()).expect("copied defaults should load");
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = project_with("# custom\n");
        let defaults_dir = tmp.path().join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), defaults_text()).unwrap();

        let copied = ensure_config_files(tmp.path()).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.path().join("config/oche.toml")).unwrap();
        assert_eq!(content, "# custom\n");
    }

    #[test]
    fn ensure_config_files_no_defaults_dir_is_ok() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        let copied = ensure_config_files(tmp.path()).expect("should succeed");
        assert!(copied.is_empty());
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = TempDir::new().unwrap();
        let err = ensure_config_files(tmp.path()).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
    }
}
