use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{Backend, Config};

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

/// Resolve the data directory: explicit flag, then `$TASKHIVE_DIR`, then
/// `$XDG_DATA_HOME/taskhive`, then `~/.local/share/taskhive`.
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Ok(dir) = env::var("TASKHIVE_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = env::var("XDG_DATA_HOME")
        && !dir.is_empty()
    {
        return PathBuf::from(dir).join("taskhive");
    }
    dirs_home().join(".local").join("share").join("taskhive")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Read config.toml; a missing file yields the defaults
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(data_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Read the config, returning both the parsed struct and the raw toml_edit
/// document for round-trip-safe editing. A missing file yields an empty
/// document.
pub fn read_config_doc(
    data_dir: &Path,
) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let path = config_path(data_dir);
    if !path.exists() {
        return Ok((Config::default(), toml_edit::DocumentMut::new()));
    }
    let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&content)?;
    let doc: toml_edit::DocumentMut = content.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting
pub fn write_config_doc(
    data_dir: &Path,
    doc: &toml_edit::DocumentMut,
) -> Result<(), ConfigError> {
    if !data_dir.is_dir() {
        fs::create_dir_all(data_dir).map_err(|e| ConfigError::WriteError {
            path: data_dir.to_path_buf(),
            source: e,
        })?;
    }
    let path = config_path(data_dir);
    fs::write(&path, doc.to_string()).map_err(|e| ConfigError::WriteError {
        path,
        source: e,
    })
}

/// Update the persistence backend in the config document
pub fn set_backend(doc: &mut toml_edit::DocumentMut, backend: Backend) {
    if !doc.contains_key("store") {
        doc["store"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["store"]["backend"] = toml_edit::value(backend.as_str());
}

/// Update the remote base URL in the config document
pub fn set_base_url(doc: &mut toml_edit::DocumentMut, url: &str) {
    if !doc.contains_key("remote") {
        doc["remote"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["remote"]["base_url"] = toml_edit::value(url);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_override_wins() {
        let dir = data_dir(Some(Path::new("/tmp/hive")));
        assert_eq!(dir, PathBuf::from("/tmp/hive"));
    }

    #[test]
    fn missing_config_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.store.backend, Backend::Local);
    }

    #[test]
    fn edits_preserve_comments() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            config_path(tmp.path()),
            "# my settings\n[store]\nbackend = \"local\"\n",
        )
        .unwrap();

        let (_config, mut doc) = read_config_doc(tmp.path()).unwrap();
        set_backend(&mut doc, Backend::Remote);
        set_base_url(&mut doc, "http://hive.example:5000");
        write_config_doc(tmp.path(), &doc).unwrap();

        let written = fs::read_to_string(config_path(tmp.path())).unwrap();
        assert!(written.contains("# my settings"));
        assert!(written.contains("backend = \"remote\""));
        assert!(written.contains("base_url = \"http://hive.example:5000\""));

        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.store.backend, Backend::Remote);
        assert_eq!(config.remote.base_url, "http://hive.example:5000");
    }
}
