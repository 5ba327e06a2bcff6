use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{
    CompletionData, CompletionStatus, EXPORT_VERSION, ExportData, SCHEMA_VERSION,
};

const COMPLETION_FILE: &str = "completion_status.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data dir {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing file means no data yet; a file that cannot be read or parsed
    /// is logged and treated the same way.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable {}: {e}", path.display());
                T::default()
            }),
            Err(e) => {
                log::warn!("cannot read {}: {e}", path.display());
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_completion(&self) -> CompletionStatus {
        let data: CompletionData = self.load(COMPLETION_FILE);
        if data.schema_version != SCHEMA_VERSION {
            log::warn!(
                "completion data has schema version {} (expected {SCHEMA_VERSION}), starting fresh",
                data.schema_version
            );
            return CompletionStatus::new();
        }
        data.completion_status
    }

    pub fn save_completion(&self, status: &CompletionStatus) -> Result<()> {
        self.save(COMPLETION_FILE, &CompletionData::new(status.clone()))
    }

    pub fn export_completion(&self, status: &CompletionStatus, path: &Path) -> Result<()> {
        let data = ExportData {
            patternbook_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            completion_status: status.clone(),
        };
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Read an export file. The caller decides what to do with the result;
    /// nothing on disk changes here.
    pub fn read_export(path: &Path) -> Result<CompletionStatus> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let data: ExportData = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        if data.patternbook_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.patternbook_export_version,
                EXPORT_VERSION
            );
        }
        Ok(data.completion_status)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("patternbook")
}
