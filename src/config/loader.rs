//! Reading `project.json` from disk.
//!
//! A missing file is not an error: it comes back as `None` and callers fall
//! back to defaults. A file that exists but cannot be read or parsed is.
//! The blocking and async entry points differ only in how the bytes are
//! read; both hand the text to [`parse_options`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ConfigError, ProjectConfig, RawOptions};

/// Parse `project.json` text. `path` is only used for diagnostics.
pub fn parse_options(path: &Path, content: &str) -> Result<RawOptions, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Map the outcome of reading `path` onto the absent/present/failed cases.
fn read_outcome(path: &Path, read: std::io::Result<String>) -> Result<Option<String>, ConfigError> {
    match read {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(None)
        }
        Err(e) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Read and parse the options file at `path`.
///
/// Returns `Ok(None)` if no file exists. The result is not validated.
pub fn load_options_from_file(path: &Path) -> Result<Option<RawOptions>, ConfigError> {
    read_outcome(path, std::fs::read_to_string(path))?
        .map(|content| parse_options(path, &content))
        .transpose()
}

/// Async variant of [`load_options_from_file`].
pub async fn load_options_from_file_async(path: &Path) -> Result<Option<RawOptions>, ConfigError> {
    read_outcome(path, tokio::fs::read_to_string(path).await)?
        .map(|content| parse_options(path, &content))
        .transpose()
}

/// Load `path` and normalize it into a [`ProjectConfig`].
///
/// Returns `Ok(None)` if no file exists.
pub fn load_config_from_file(path: &Path) -> Result<Option<ProjectConfig>, ConfigError> {
    load_options_from_file(path)?.map(ProjectConfig::new).transpose()
}

/// Async variant of [`load_config_from_file`].
pub async fn load_config_from_file_async(
    path: &Path,
) -> Result<Option<ProjectConfig>, ConfigError> {
    load_options_from_file_async(path)
        .await?
        .map(ProjectConfig::new)
        .transpose()
}

/// The config file inside `dir`, if there is one.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(crate::constants::CONFIG_FILENAME);
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_options_from_file(&dir.path().join("project.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn missing_file_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from_file(&dir.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_options_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: ref p, .. } if p == &path));
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn non_object_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, r#"["index.html"]"#).unwrap();
        assert!(matches!(load_options_from_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn directory_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_options_from_file(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn valid_file_is_returned_unvalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, r#"{"fragments": ["../escape.html"]}"#).unwrap();

        let options = load_options_from_file(&path).unwrap().unwrap();
        assert_eq!(options.fragments, vec![PathBuf::from("../escape.html")]);
    }

    #[test]
    fn find_config_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(dir.path()).is_none());

        std::fs::write(dir.path().join("project.json"), "{}").unwrap();
        assert_eq!(find_config_file(dir.path()), Some(dir.path().join("project.json")));
    }

    #[tokio::test]
    async fn async_loader_matches_sync_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, r#"{"shell": "src/app.html", "npm": true}"#).unwrap();

        let sync = load_options_from_file(&path).unwrap();
        let async_ = load_options_from_file_async(&path).await.unwrap();
        assert_eq!(sync, async_);

        assert!(load_options_from_file_async(&dir.path().join("missing.json"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn async_config_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            load_config_from_file_async(&path).await,
            Err(ConfigError::Parse { .. })
        ));
    }
}
