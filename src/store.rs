//! File-backed source of contact bags.
//!
//! Each contact is one JSON file, `<dir>/<name>.json`, holding the contact's
//! fields with its objectives nested under `objectives`. Files are read
//! permissively: anything the models don't recognise is carried through.
//! There are no durability guarantees; `save` simply overwrites the file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::Contact;
use crate::ModelError;

const EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid contact data in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ModelError,
    },

    #[error("Failed to encode contact: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Contact not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A directory of contact files.
#[derive(Debug, Clone)]
pub struct ContactStore {
    dir: PathBuf,
}

impl ContactStore {
    /// Opens (creating if needed) the store at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads and mounts the contact stored under `name`.
    pub fn load(&self, name: &str) -> Result<Contact> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        load_path(&path)
    }

    /// Writes the contact's outbound fields to `<dir>/<name>.json`.
    pub fn save(&self, name: &str, contact: &Contact) -> Result<PathBuf> {
        let path = self.path_for(name);
        let json = serde_json::to_string_pretty(&contact.to_bag())?;
        fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Saved contact");
        Ok(path)
    }

    /// Loads every contact in the store, ordered by name.
    pub fn list(&self) -> Result<Vec<(String, Contact)>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::Io {
                    path: self.dir.clone(),
                    source,
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let contacts = paths
            .iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                load_path(path).map(|contact| (name, contact))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(dir = %self.dir.display(), count = contacts.len(), "Listed contacts");
        Ok(contacts)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }
}

/// Loads a contact from any file path.
pub fn load_path(path: &Path) -> Result<Contact> {
    let file = fs::File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(file, &path.display().to_string())
}

/// Loads a contact from a reader; `origin` names the source in errors.
pub fn load_reader(mut reader: impl Read, origin: &str) -> Result<Contact> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| StoreError::Io {
            path: PathBuf::from(origin),
            source,
        })?;
    Contact::from_json_str(&text).map_err(|source| StoreError::Parse {
        origin: origin.to_string(),
        source,
    })
}
