use crate::constants::{AUTH_KEY, AUTH_VALUE, CONTACTS_KEY, MEDICAL_KEY, STORE_FILE, THEME_KEY};
use crate::models::{EmergencyContact, MedicalInfo, ThemePreference};
use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String key-value persistence, the same shape as browser local storage
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile store, used in tests and when the data directory is unusable
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten on every change
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `storage.json` inside `dir`. A missing file is an empty store; an
    /// unparseable one is moved to `storage.json.corrupt` and replaced.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(STORE_FILE);
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    let aside = path.with_extension("json.corrupt");
                    tracing::warn!(
                        error = %e,
                        moved_to = %aside.display(),
                        "Storage file corrupt, starting empty"
                    );
                    fs::rename(&path, &aside)?;
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(FileStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        // Replace atomically so a partial write never clobbers the store
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Typed access to the four persisted values
pub struct Storage {
    store: Box<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Storage { store }
    }

    /// In-memory storage with nothing persisted
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// File-backed storage in `dir`, falling back to memory if the directory is unusable
    pub fn open(dir: &Path) -> Self {
        match FileStore::open(dir) {
            Ok(store) => {
                tracing::info!(path = %store.path().display(), "Opened storage");
                Self::new(Box::new(store))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Storage unreadable, continuing in memory");
                Self::in_memory()
            }
        }
    }

    pub fn load_authenticated(&self) -> bool {
        self.store.get(AUTH_KEY).as_deref() == Some(AUTH_VALUE)
    }

    pub fn save_authenticated(&mut self, authenticated: bool) -> Result<()> {
        if authenticated {
            self.store.set(AUTH_KEY, AUTH_VALUE)
        } else {
            self.store.remove(AUTH_KEY)
        }
    }

    pub fn load_theme(&self) -> ThemePreference {
        self.store
            .get(THEME_KEY)
            .map(|v| ThemePreference::parse(&v))
            .unwrap_or_default()
    }

    pub fn save_theme(&mut self, theme: ThemePreference) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    pub fn load_contacts(&self) -> Vec<EmergencyContact> {
        let Some(saved) = self.store.get(CONTACTS_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&saved).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load emergency contacts");
            Vec::new()
        })
    }

    pub fn save_contacts(&mut self, contacts: &[EmergencyContact]) -> Result<()> {
        let json = serde_json::to_string(contacts)?;
        self.store.set(CONTACTS_KEY, &json)
    }

    pub fn load_medical_info(&self) -> MedicalInfo {
        let Some(saved) = self.store.get(MEDICAL_KEY) else {
            return MedicalInfo::default();
        };
        serde_json::from_str(&saved).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load medical info");
            MedicalInfo::default()
        })
    }

    pub fn save_medical_info(&mut self, info: &MedicalInfo) -> Result<()> {
        let json = serde_json::to_string(info)?;
        self.store.set(MEDICAL_KEY, &json)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::in_memory()
    }
}
