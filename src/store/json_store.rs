use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::warn;
use serde::{Serialize, de::DeserializeOwned};

use crate::quiz::result::TestResult;

const LAST_RESULT_FILE: &str = "last_test_result.json";

/// Local JSON files under the user's data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing or unreadable files load as `None`.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.file_path(name);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("ignoring corrupt {}: {e}", path.display());
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        write_atomic(&self.file_path(name), &serde_json::to_string_pretty(data)?)
    }

    /// The most recent test result, if one was recorded.
    pub fn load_last_result(&self) -> Option<TestResult> {
        self.load(LAST_RESULT_FILE)
    }

    /// Overwrites the previously recorded result.
    pub fn save_last_result(&self, result: &TestResult) -> Result<()> {
        self.save(LAST_RESULT_FILE, result)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voice2career")
}

/// Write via a sibling `.tmp` file and rename so readers never see a partial file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
