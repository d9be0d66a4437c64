// Loading season snapshots and templates from JSON files.

use std::path::{Path, PathBuf};

use oche_core::{SeasonData, Template};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_season(path: &Path) -> Result<SeasonData, InputError> {
    let data: SeasonData = load_json(path)?;
    debug!(
        "Loaded season `{}` with {} division(s) from {}",
        data.season.name,
        data.divisions.len(),
        path.display()
    );
    Ok(data)
}

pub fn load_template(path: &Path) -> Result<Template, InputError> {
    let template: Template = load_json(path)?;
    debug!(
        "Loaded template `{}` with {} division(s) from {}",
        template.name,
        template.divisions.len(),
        path.display()
    );
    Ok(template)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let text = std::fs::read_to_string(path).map_err(|e| InputError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| InputError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_season_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("season.json");
        fs::write(
            &path,
            r#"{
                "season": { "id": "s1", "name": "Winter", "start_date": "2024-09-02" },
                "divisions": [
                    { "id": "d1", "name": "Premier",
                      "teams": [ { "id": "t1", "name": "Arrows", "address": "Red Lion" } ] }
                ]
            }"#,
        )
        .unwrap();

        let data = load_season(&path).unwrap();
        assert_eq!(data.season.start_date, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
        assert_eq!(data.season.end_date, None);
        assert_eq!(data.divisions[0].teams[0].address, "Red Lion");
        assert!(data.divisions[0].fixture_dates.is_empty());
    }

    #[test]
    fn loads_template_with_bye() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("template.json");
        fs::write(
            &path,
            r#"{
                "id": "three", "name": "Three teams",
                "divisions": [
                    { "dates": [ { "fixtures": [ { "home": "A", "away": "B" }, { "home": "C" } ] } ] }
                ]
            }"#,
        )
        .unwrap();

        let template = load_template(&path).unwrap();
        let fixtures = &template.divisions[0].dates[0].fixtures;
        assert_eq!(fixtures[0].away.as_deref(), Some("B"));
        assert_eq!(fixtures[1].away, None);
        assert!(template.shared_addresses.is_empty());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_template(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("season.json");
        fs::write(&path, "{ \"season\": ").unwrap();
        let err = load_season(&path).unwrap_err();
        match err {
            InputError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Parse, got: {other}"),
        }
    }
}
