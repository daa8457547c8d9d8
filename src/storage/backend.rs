use std::{
    fmt,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{foundation::error::FilekitResult, processing::processor::Stream};

/// What [`StorageBackend::save`] does when the target name is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conflict {
    /// Pick a fresh name (`name_1.ext`, `name_2.ext`, ...). Used for source uploads.
    Rename,
    /// Atomically replace the existing file. Used for derivatives.
    Replace,
}

/// Persistence collaborator for one collection of stored files.
///
/// Relative paths are `/`-separated and relative to the collection root. Writes must be atomic
/// per file: a reader never observes a partially written file.
pub trait StorageBackend: Send + Sync + fmt::Debug {
    /// Collection name this backend serves.
    fn collection(&self) -> &str;

    /// Prepare the collection (create directories, check credentials, ...).
    fn init(&self) -> FilekitResult<()> {
        Ok(())
    }

    /// Persist `data` under `folder/name` and return the stored file name (without folder).
    ///
    /// The backend may sanitize `name` and, with [`Conflict::Rename`], choose another one; the
    /// returned name is canonical.
    fn save(
        &self,
        data: &mut dyn Read,
        folder: Option<&str>,
        name: &str,
        conflict: Conflict,
    ) -> FilekitResult<String>;

    /// Open a stored file for reading.
    fn open(&self, rel_path: &str) -> FilekitResult<Stream>;

    /// Absolute location of `rel_path`. Pure; does not touch storage.
    fn path(&self, rel_path: &str) -> PathBuf;

    /// Public URL of `rel_path`. Pure; does not touch storage.
    fn url(&self, rel_path: &str) -> String;

    /// Whether a file exists at an absolute location returned by [`StorageBackend::path`].
    fn exists(&self, path: &Path) -> bool;
}
