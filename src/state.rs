// Local state: a marker folder with a single `settings.json` inside. Its
// presence is what tells the tool that this machine already registered.
//
// There is no locking. The tool runs one command per process and assumes
// nobody else touches the folder at the same time.

use crate::model::ParticipantRecord;
use log::debug;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("no registration found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("registration already exists at {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("{} does not contain a valid registration", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode registration for {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StateError {
    fn io(path: &Path, source: io::Error) -> Self {
        StateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Handle on the marker folder. Cheap to construct; nothing touches the
/// filesystem until one of the methods is called.
#[derive(Clone, Debug)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        StateStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// True when both the marker folder and the settings file are present.
    pub fn exists(&self) -> bool {
        self.dir.is_dir() && self.settings_path().is_file()
    }

    /// Fail with `AlreadyExists` if the marker folder or the settings file
    /// is already on disk.
    pub fn ensure_vacant(&self) -> Result<(), StateError> {
        let path = self.settings_path();
        if path.exists() {
            return Err(StateError::AlreadyExists(path));
        }
        if self.dir.exists() {
            return Err(StateError::AlreadyExists(self.dir.clone()));
        }
        Ok(())
    }

    /// Create the marker folder and an empty settings file. Fails when
    /// either one is already there.
    pub fn create(&self) -> Result<(), StateError> {
        self.ensure_vacant()?;
        fs::create_dir(&self.dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => StateError::AlreadyExists(self.dir.clone()),
            _ => StateError::io(&self.dir, e),
        })?;
        let path = self.settings_path();
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => StateError::AlreadyExists(path.clone()),
                _ => StateError::io(&path, e),
            })?;
        debug!("created {}", path.display());
        Ok(())
    }

    /// Serialize `record` into the settings file, replacing its contents.
    pub fn write(&self, record: &ParticipantRecord) -> Result<(), StateError> {
        let path = self.settings_path();
        let json = serde_json::to_vec(record).map_err(|source| StateError::Encode {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|e| StateError::io(&path, e))?;
        debug!("wrote registration for {} to {}", record.name, path.display());
        Ok(())
    }

    pub fn read(&self) -> Result<ParticipantRecord, StateError> {
        let path = self.settings_path();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StateError::NotFound(path)),
            Err(e) => return Err(StateError::io(&path, e)),
        };
        serde_json::from_slice(&data).map_err(|source| StateError::Parse { path, source })
    }

    /// Remove the settings file, then the folder. The folder must be empty
    /// once the file is gone.
    pub fn delete(&self) -> Result<(), StateError> {
        let path = self.settings_path();
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StateError::NotFound(path.clone()),
            _ => StateError::io(&path, e),
        })?;
        fs::remove_dir(&self.dir).map_err(|e| StateError::io(&self.dir, e))?;
        debug!("removed {}", self.dir.display());
        Ok(())
    }
}
