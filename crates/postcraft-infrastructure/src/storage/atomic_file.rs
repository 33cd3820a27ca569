//! Atomic JSON/TOML file operations.
//!
//! Writes go to a temporary file in the same directory, are fsynced and then
//! renamed over the target. Read-modify-write updates hold an exclusive lock.

use postcraft_core::error::{PostcraftError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// On-disk encoding of an `AtomicFile`.
pub trait FileFormat {
    fn encode<T: Serialize>(data: &T) -> Result<String>;

    fn decode<T: DeserializeOwned>(content: &str) -> Result<T>;
}

/// Pretty-printed JSON.
pub struct Json;

impl FileFormat for Json {
    fn encode<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    fn decode<T: DeserializeOwned>(content: &str) -> Result<T> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Pretty-printed TOML.
pub struct Toml;

impl FileFormat for Toml {
    fn encode<T: Serialize>(data: &T) -> Result<String> {
        Ok(toml::to_string_pretty(data)?)
    }

    fn decode<T: DeserializeOwned>(content: &str) -> Result<T> {
        Ok(toml::from_str(content)?)
    }
}

/// A handle to a file holding one serialized `T`.
pub struct AtomicFile<T, F> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> (T, F)>,
}

pub type AtomicJsonFile<T> = AtomicFile<T, Json>;
pub type AtomicTomlFile<T> = AtomicFile<T, Toml>;

impl<T, F> AtomicFile<T, F>
where
    T: Serialize + DeserializeOwned,
    F: FileFormat,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        F::decode(&content).map(Some)
    }

    /// Saves data atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        let content = F::encode(data)?;
        self.write_raw(&content)
    }

    /// Writes pre-rendered text atomically, e.g. a commented template.
    pub fn write_raw(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Performs a locked read-modify-write.
    pub fn update<U>(&self, default_value: T, f: U) -> Result<()>
    where
        U: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)
    }

    /// Deletes the file. Missing files are not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| PostcraftError::io("Path has no parent directory"))?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| PostcraftError::io("Path has no file name"))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// Exclusive lock released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| PostcraftError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
