/*
 * The storage collaborator for the folder tree. The tree store never touches the disk
 * itself; the presenter hands it `FolderRecord` snapshots to save and asks it for all
 * records on startup.
 *
 * It includes a trait for storage operations (`FolderStorageOperations`) so the presenter
 * can be tested against mocks, and a concrete implementation (`CoreFolderStorage`) that
 * keeps a single pretty-printed JSON document in a directory (by default the per-user
 * application config directory). `InMemoryFolderStorage` stands in when no such
 * directory exists, so folders still survive within the session.
 */
use super::folder_node::FolderRecord;
use super::path_utils;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const FOLDERS_FILENAME: &str = "folders.json";
const CURRENT_DOCUMENT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoStorageDirectory,
    UnsupportedVersion(u32),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Folder storage I/O error: {e}"),
            StorageError::Serde(e) => write!(f, "Folder storage serialization error: {e}"),
            StorageError::NoStorageDirectory => {
                write!(f, "Could not determine directory for folder storage")
            }
            StorageError::UnsupportedVersion(v) => {
                write!(f, "Unsupported folder document version {v}")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub trait FolderStorageOperations: Send + Sync {
    // All records, sorted by name ascending (ties broken by id).
    fn fetch_all(&self) -> Result<Vec<FolderRecord>>;
    fn save(&self, records: &[FolderRecord]) -> Result<()>;
}

fn sort_for_fetch(records: &mut [FolderRecord]) {
    records.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

#[derive(Debug, Serialize, Deserialize)]
struct FolderDocument {
    version: u32,
    folders: Vec<FolderRecord>,
}

pub struct CoreFolderStorage {
    storage_dir: PathBuf,
}

impl CoreFolderStorage {
    pub fn new(storage_dir: PathBuf) -> Self {
        CoreFolderStorage { storage_dir }
    }

    /*
     * Creates a storage rooted in the application's local configuration directory,
     * as resolved by `path_utils::get_base_app_config_local_dir`.
     */
    pub fn for_app(app_name: &str) -> Result<Self> {
        let dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(StorageError::NoStorageDirectory)?;
        Ok(CoreFolderStorage::new(dir))
    }

    pub fn file_path(&self) -> PathBuf {
        self.storage_dir.join(FOLDERS_FILENAME)
    }

    fn ensure_storage_dir(dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            log::debug!("CoreFolderStorage: Created storage directory {dir:?}.");
        }
        Ok(())
    }
}

impl FolderStorageOperations for CoreFolderStorage {
    /*
     * Reads the folder document. A missing file is not an error; it simply means no
     * folders have been saved yet.
     */
    fn fetch_all(&self) -> Result<Vec<FolderRecord>> {
        let file_path = self.file_path();
        log::trace!("CoreFolderStorage: Fetching folders from {file_path:?}");
        if !file_path.exists() {
            log::debug!("CoreFolderStorage: {file_path:?} does not exist, starting empty.");
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let document: FolderDocument = serde_json::from_reader(reader)?;
        if document.version != CURRENT_DOCUMENT_VERSION {
            return Err(StorageError::UnsupportedVersion(document.version));
        }

        let mut records = document.folders;
        sort_for_fetch(&mut records);
        log::debug!(
            "CoreFolderStorage: Loaded {} folder record(s) from {:?}.",
            records.len(),
            file_path
        );
        Ok(records)
    }

    fn save(&self, records: &[FolderRecord]) -> Result<()> {
        Self::ensure_storage_dir(&self.storage_dir)?;
        let file_path = self.file_path();

        let document = FolderDocument {
            version: CURRENT_DOCUMENT_VERSION,
            folders: records.to_vec(),
        };
        let file = File::create(&file_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &document)?;
        log::debug!(
            "CoreFolderStorage: Saved {} folder record(s) to {:?}.",
            records.len(),
            file_path
        );
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryFolderStorage {
    records: Mutex<Vec<FolderRecord>>,
}

impl InMemoryFolderStorage {
    pub fn new() -> Self {
        InMemoryFolderStorage::default()
    }
}

impl FolderStorageOperations for InMemoryFolderStorage {
    fn fetch_all(&self) -> Result<Vec<FolderRecord>> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StorageError::Io(io::Error::other("folder record lock poisoned")))?
            .clone();
        sort_for_fetch(&mut records);
        Ok(records)
    }

    fn save(&self, records: &[FolderRecord]) -> Result<()> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| StorageError::Io(io::Error::other("folder record lock poisoned")))?;
        *stored = records.to_vec();
        log::trace!("InMemoryFolderStorage: Holding {} folder record(s).", stored.len());
        Ok(())
    }
}
