use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A durable store of named byte blobs. Writes fully replace the previous
/// contents of a name; there is no append.
pub trait ByteStore {
    /// Return the full contents of `name`. Missing names fail with
    /// `io::ErrorKind::NotFound`.
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Overwrite `name` with `bytes`.
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

impl<T: ByteStore + ?Sized> ByteStore for &T {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        (**self).read(name)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        (**self).write(name, bytes)
    }
}

/// Stores each name as a file inside one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl ByteStore for FileStore {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(name))
    }

    /// Write to a temp file next to the target, sync it, then rename over the
    /// target so readers never observe a half-written file.
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(name);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(io::Error::other)?
            .as_nanos();
        let temp_path = self.dir.join(format!("{}.{}.tmp", name, nanos));

        let result = (|| -> io::Result<()> {
            let mut file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&temp_path, &path)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

/// In-process store. Handy for tests and for running the ledger without
/// touching disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
    read_only: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `name`, if any, without going through the trait.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.borrow().get(name).cloned()
    }

    pub fn insert(&self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.blobs.borrow_mut().insert(name.into(), bytes.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.blobs.borrow().contains_key(name)
    }

    /// While read-only, every write fails with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }
}

impl ByteStore for MemoryStore {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.get(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", name))
        })
    }

    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        if self.read_only.get() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "store is read-only",
            ));
        }
        self.insert(name, bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("nested"));

        store.write("loans.json", b"[]").unwrap();
        assert_eq!(store.read("loans.json").unwrap(), b"[]");

        store.write("loans.json", b"[1]").unwrap();
        assert_eq!(store.read("loans.json").unwrap(), b"[1]");
    }

    #[test]
    fn test_file_store_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());

        store.write("loans.json", b"[]").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["loans.json".to_string()]);
    }

    #[test]
    fn test_file_store_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());

        let err = store.read("loans.json").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_store_read_only() {
        let store = MemoryStore::new();
        store.write("a", b"1").unwrap();

        store.set_read_only(true);
        let err = store.write("a", b"2").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(store.get("a"), Some(b"1".to_vec()));

        store.set_read_only(false);
        store.write("a", b"2").unwrap();
        assert_eq!(store.read("a").unwrap(), b"2");
    }
}
