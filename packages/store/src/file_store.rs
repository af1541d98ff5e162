//! # Filesystem-backed key/value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists items to a
//! single JSON object on the local filesystem. It is used on desktop to keep the
//! session across app restarts, standing in for the browser's `localStorage`.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── storage.json       # {"uid": "...", "userInfo": "{...}"}
//! ```
//!
//! Writes go to `storage.json.tmp` first and are renamed into place.
//!
//! ## Platform data directories
//!
//! Use [`dirs::data_dir()`] to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/passage/` |
//! | Linux | `~/.local/share/passage/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\passage\` |

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::session::KeyValueStore;

const STORAGE_FILE: &str = "storage.json";

/// Filesystem-backed KeyValueStore for desktop persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn storage_path(&self) -> PathBuf {
        self.base.join(STORAGE_FILE)
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(self.storage_path()) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base)?;
        let tmp = self.base.join(format!("{STORAGE_FILE}.tmp"));
        std::fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        std::fs::rename(tmp, self.storage_path())?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_items()?.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.read_items()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }
}
