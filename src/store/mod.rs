//! Flat-file state persistence behind a small trait, so the pipeline can be
//! driven by test doubles instead of the real filesystem.

pub mod archive;
pub mod seen;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Named UTF-8 documents with whole-document replacement semantics.
pub trait StateStore: Send + Sync {
    /// Contents of the named document, `None` when it does not exist.
    fn read(&self, name: &str) -> Result<Option<String>>;
    /// Replace the named document. A failed write must leave any previous
    /// contents intact.
    fn write(&self, name: &str, contents: &str) -> Result<()>;
    /// Remove the named document; missing documents are not an error.
    fn remove(&self, name: &str) -> Result<()>;
}

/// Documents as files under one directory, replaced via write-then-rename.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl StateStore for FileStore {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_of(name);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn write(&self, name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating state dir {}", self.dir.display()))?;
        let path = self.path_of(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_of(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}

/// In-memory store for tests and embedders that do not want files.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Option<String>> {
        Ok(self.docs.lock().expect("store mutex poisoned").get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> Result<()> {
        self.docs
            .lock()
            .expect("store mutex poisoned")
            .insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.docs.lock().expect("store mutex poisoned").remove(name);
        Ok(())
    }
}
