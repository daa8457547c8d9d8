use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use tempfile::NamedTempFile;

use crate::{
    foundation::{
        error::{FilekitError, FilekitResult},
        names::{normalize_rel_path, secure_filename, split_ext, validate_segment},
    },
    processing::processor::Stream,
    storage::backend::{Conflict, StorageBackend},
};

/// Filesystem-backed collection: files live under `dest`, URLs under `base_url`.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    collection: String,
    dest: PathBuf,
    base_url: String,
    /// Lowercase extensions; `None` allows everything.
    allowed: Option<BTreeSet<String>>,
}

impl LocalStorage {
    /// Collection `collection` rooted at `dest`, served below `base_url`, accepting any extension.
    pub fn new(
        collection: impl Into<String>,
        dest: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            dest: dest.into(),
            base_url: base_url.into(),
            allowed: None,
        }
    }

    /// Restrict saves to the given extensions (case-insensitive). An empty list allows all.
    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self.allowed = if set.is_empty() { None } else { Some(set) };
        self
    }

    /// Root directory of the collection.
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Whether a file named `name` may be stored here.
    pub fn extension_allowed(&self, name: &str) -> bool {
        let Some(allowed) = &self.allowed else {
            return true;
        };
        match split_ext(name) {
            (_, Some(ext)) => allowed.contains(&ext.to_ascii_lowercase()),
            (_, None) => false,
        }
    }

    fn folder_dir(&self, folder: Option<&str>) -> FilekitResult<PathBuf> {
        match folder {
            Some(f) if !f.is_empty() => {
                validate_segment("storage folder", f)?;
                Ok(self.dest.join(f))
            }
            _ => Ok(self.dest.clone()),
        }
    }
}

fn suffixed(name: &str, n: u32) -> String {
    match split_ext(name) {
        (stem, Some(ext)) => format!("{stem}_{n}.{ext}"),
        (stem, None) => format!("{stem}_{n}"),
    }
}

fn write_error(path: &Path, err: io::Error) -> FilekitError {
    FilekitError::storage_write(format!("'{}': {err}", path.display()))
}

impl StorageBackend for LocalStorage {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn init(&self) -> FilekitResult<()> {
        std::fs::create_dir_all(&self.dest)
            .map_err(|e| write_error(&self.dest, e))?;
        tracing::debug!(collection = %self.collection, dest = %self.dest.display(), "collection ready");
        Ok(())
    }

    fn save(
        &self,
        data: &mut dyn Read,
        folder: Option<&str>,
        name: &str,
        conflict: Conflict,
    ) -> FilekitResult<String> {
        let basename = secure_filename(name).ok_or_else(|| {
            FilekitError::not_allowed(format!("'{name}' is not a usable file name"))
        })?;
        if !self.extension_allowed(&basename) {
            return Err(FilekitError::not_allowed(format!(
                "extension of '{basename}' is not allowed in collection '{}'",
                self.collection
            )));
        }

        let dir = self.folder_dir(folder)?;
        std::fs::create_dir_all(&dir).map_err(|e| write_error(&dir, e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| write_error(&dir, e))?;
        io::copy(data, &mut tmp).map_err(|e| write_error(tmp.path(), e))?;
        tmp.flush().map_err(|e| write_error(tmp.path(), e))?;

        match conflict {
            Conflict::Replace => {
                let target = dir.join(&basename);
                tmp.persist(&target)
                    .map_err(|e| write_error(&target, e.error))?;
                Ok(basename)
            }
            Conflict::Rename => {
                let mut candidate = basename.clone();
                let mut n = 0u32;
                loop {
                    let target = dir.join(&candidate);
                    match tmp.persist_noclobber(&target) {
                        Ok(_) => return Ok(candidate),
                        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                            tmp = e.file;
                            n += 1;
                            candidate = suffixed(&basename, n);
                        }
                        Err(e) => return Err(write_error(&target, e.error)),
                    }
                }
            }
        }
    }

    fn open(&self, rel_path: &str) -> FilekitResult<Stream> {
        let rel = normalize_rel_path(rel_path)?;
        let path = self.path(&rel);
        match File::open(&path) {
            Ok(f) => Ok(Box::new(f)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FilekitError::not_found(
                format!("'{rel}' in collection '{}'", self.collection),
            )),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("open '{}'", path.display()))
                .into()),
        }
    }

    fn path(&self, rel_path: &str) -> PathBuf {
        self.dest.join(rel_path)
    }

    fn url(&self, rel_path: &str) -> String {
        format!("{}/{rel_path}", self.base_url.trim_end_matches('/'))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

impl LocalStorage {
    /// Read a stored file completely. Mostly useful for hosts and tests.
    pub fn read(&self, rel_path: &str) -> FilekitResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.open(rel_path)?
            .read_to_end(&mut bytes)
            .with_context(|| format!("read '{rel_path}'"))?;
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/local.rs"]
mod tests;
