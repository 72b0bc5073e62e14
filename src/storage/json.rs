//! JSON-file resume store
//!
//! One file per collection-year at
//! `{links_dir}/{Court_PDFs|Constitution_ACTs}/{name}/{year}.json`.

use crate::state::Collection;
use crate::storage::traits::{ResumeStore, StoreError, StoreResult};
use crate::storage::YearIndex;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Resume store backed by one compact JSON array per year
#[derive(Debug, Clone)]
pub struct JsonResumeStore {
    root: PathBuf,
}

impl JsonResumeStore {
    /// Creates a store rooted at the links directory
    ///
    /// Nothing is created on disk until the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding every year file of a collection
    pub fn collection_dir(&self, collection: &Collection) -> PathBuf {
        self.root
            .join(collection.kind.storage_dir())
            .join(sanitize_component(&collection.name))
    }

    /// Path of the year file for a collection-year
    pub fn year_path(&self, collection: &Collection, year: u16) -> PathBuf {
        self.collection_dir(collection).join(format!("{}.json", year))
    }
}

impl ResumeStore for JsonResumeStore {
    fn load(&self, collection: &Collection, year: u16) -> StoreResult<Option<YearIndex>> {
        let path = self.year_path(collection, year);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let urls: Vec<String> =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(Some(YearIndex::from_urls(year, urls)))
    }

    fn save(&mut self, collection: &Collection, index: &YearIndex) -> StoreResult<()> {
        let path = self.year_path(collection, index.year());
        let json = index.to_json()?;
        write_atomic(&path, json.as_bytes())?;

        tracing::info!(
            "Saved {} documents for {} year {} to {}",
            index.len(),
            collection,
            index.year(),
            path.display()
        );
        Ok(())
    }

    fn stored_years(&self, collection: &Collection) -> StoreResult<Vec<u16>> {
        let dir = self.collection_dir(collection);

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut years = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let path = entry.path();

            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            // Temp files are hidden and never parse as a year
            if let Some(year) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u16>().ok())
            {
                years.push(year);
            }
        }

        years.sort_unstable();
        Ok(years)
    }
}

/// Writes bytes to `path` so readers see either the old file or the whole new one
///
/// The content goes to a hidden temp file in the same directory, is synced,
/// then renamed over the target.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("index");
    let tmp = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

    let written = (|| {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()
    })();

    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(StoreError::io(tmp, e));
    }

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        StoreError::io(path, e)
    })?;

    if let Ok(dir) = std::fs::File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Keeps a collection name from escaping its kind directory
fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}
