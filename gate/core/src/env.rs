use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// One `KEY=VALUE` pair destined for the compose up call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvEntry {
    key: String,
    value: String,
}

impl EnvEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Errors reading or parsing an env file.
#[derive(Debug, thiserror::Error)]
pub enum EnvFileError {
    #[error("failed to read env file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("env file {} line {line}: missing '=' separator", path.display())]
    MissingSeparator { path: PathBuf, line: usize },
    #[error("env file {} line {line}: empty key", path.display())]
    EmptyKey { path: PathBuf, line: usize },
}

/// Parse a `KEY=VALUE` env file, skipping blank lines and `#` comments.
///
/// Values keep everything after the first `=`, so values may themselves
/// contain `=` characters.
pub fn load_env_file(path: &Path) -> Result<Vec<EnvEntry>, EnvFileError> {
    let raw = fs::read_to_string(path).map_err(|source| EnvFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(EnvFileError::MissingSeparator {
                path: path.to_path_buf(),
                line: index + 1,
            });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(EnvFileError::EmptyKey {
                path: path.to_path_buf(),
                line: index + 1,
            });
        }

        entries.push(EnvEntry::new(key, value.trim()));
    }

    Ok(entries)
}
