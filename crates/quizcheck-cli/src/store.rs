//! JSON files under the state directory backing bookmarks and review.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use quizcheck_core::error::StoreError;
use quizcheck_core::session::ReviewItem;
use quizcheck_core::store::{BookmarkStore, ReviewStore};

const BOOKMARKS_FILE: &str = "bookmarks.json";
const REVIEW_FILE: &str = "review.json";

/// Stores `bookmarks.json` and `review.json` in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        let path = self.dir.join(name);
        std::fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }
}

impl BookmarkStore for JsonFileStore {
    fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        self.read(BOOKMARKS_FILE)
    }

    fn save(&self, ids: &BTreeSet<String>) -> Result<(), StoreError> {
        self.write(BOOKMARKS_FILE, ids)
    }
}

impl ReviewStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ReviewItem>, StoreError> {
        self.read(REVIEW_FILE)
    }

    fn save(&self, items: &[ReviewItem]) -> Result<(), StoreError> {
        self.write(REVIEW_FILE, items)
    }
}
