use std::{
    fmt::Display,
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, info, warn};

/// Logical names of the documents mensa keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Journal,
    Plans,
    Session,
    Status,
}

impl Collection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Journal => "journal.json",
            Collection::Plans => "planner.json",
            Collection::Session => "session.json",
            Collection::Status => "status.json",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Journal => write!(f, "journal"),
            Collection::Plans => write!(f, "plans"),
            Collection::Session => write!(f, "session"),
            Collection::Status => write!(f, "status"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("document doesn't exist")]
    NotFound,
    #[error("document isn't valid json: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// Interface for abstracting storage of collections.
pub trait ActivityStore {
    /// Reads the raw contents of a collection.
    fn read(&self, collection: Collection) -> impl Future<Output = Result<Vec<u8>, LoadError>>;

    /// Replaces the contents of a collection.
    fn write(&self, collection: Collection, contents: Vec<u8>) -> impl Future<Output = Result<()>>;

    fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<T, LoadError>> {
        async move {
            let contents = self.read(collection).await?;
            serde_json::from_slice(&contents).map_err(LoadError::Malformed)
        }
    }

    /// Loads a collection falling back to its default value when the document is missing or
    /// malformed. Only real I/O failures, like missing permissions, are reported.
    fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<T>> {
        async move {
            match self.load(collection).await {
                Ok(v) => Ok(v),
                Err(LoadError::NotFound) => {
                    debug!("No {collection} document yet, starting empty");
                    Ok(T::default())
                }
                Err(LoadError::Malformed(e)) => {
                    warn!("The {collection} document is malformed, treating it as empty: {e}");
                    Ok(T::default())
                }
                Err(e @ LoadError::Io(_)) => Err(e.into()),
            }
        }
    }

    /// Writes a collection as indented json.
    fn save<T: Serialize>(
        &self,
        collection: Collection,
        data: &T,
    ) -> impl Future<Output = Result<()>> {
        async move {
            let contents = serde_json::to_vec_pretty(data)?;
            self.write(collection, contents).await
        }
    }
}

/// The main realization of [ActivityStore], keeping every collection in its own file.
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&data_dir)?;

        Ok(Self { data_dir })
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    async fn read_locked(file: &mut File) -> Result<Vec<u8>, std::io::Error> {
        let mut contents = vec![];
        file.read_to_end(&mut contents).await?;
        Ok(contents)
    }

    async fn write_locked(file: &mut File, contents: &[u8]) -> Result<(), std::io::Error> {
        file.set_len(0).await?;
        file.write_all(contents).await?;
        file.flush().await?;
        Ok(())
    }
}

impl ActivityStore for JsonStore {
    async fn read(&self, collection: Collection) -> Result<Vec<u8>, LoadError> {
        let path = self.path_for(collection);
        debug!("Reading {path:?}");
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadError::NotFound),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let result = Self::read_locked(&mut file).await;
        file.unlock_async().await?;

        Ok(result?)
    }

    async fn write(&self, collection: Collection, contents: Vec<u8>) -> Result<()> {
        let path = self.path_for(collection);
        ensure_parent(&path).await?;

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await?;

        // Truncation happens under the lock, otherwise a concurrent reader could see an empty
        // document.
        file.lock_exclusive()?;
        let result = Self::write_locked(&mut file, &contents).await;
        file.unlock_async().await?;
        result?;

        info!("Saved {collection} into {path:?}");
        Ok(())
    }
}

async fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    match path.parent() {
        Some(parent) => tokio::fs::create_dir_all(parent).await,
        None => Ok(()),
    }
}
